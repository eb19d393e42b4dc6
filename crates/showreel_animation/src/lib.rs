//! Showreel Animation System
//!
//! Easing curves, label-based timelines, and a frame scheduler.
//!
//! # Features
//!
//! - **Timelines**: Tweens placed by label offsets, overlapping freely
//! - **Tweens**: Absolute, relative and from-to values with stagger, yoyo and repeat
//! - **Easing**: Power curves, sine, and overshooting back-out
//! - **Scheduler**: A tokio frame driver plus deterministic manual ticking
//! - **Completion Signals**: Await a timeline's end instead of chaining callbacks

pub mod easing;
pub mod scheduler;
pub mod timeline;
pub mod values;

pub use easing::Easing;
pub use scheduler::{AnimatedTimeline, AnimationScheduler, SchedulerHandle, TimelineId};
pub use timeline::{Position, Repeat, Timeline, TimelineEntryId, Tween};
pub use values::{Interpolate, TweenValue};
