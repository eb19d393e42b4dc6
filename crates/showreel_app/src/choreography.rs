//! The per-cycle hero timeline
//!
//! Each cycle runs one timeline in three labelled acts. The car slides in and
//! the title assembles (`entrance`), the car breathes (`idle`), then
//! everything falls away (`exit`). Phase boundaries are not fixed times:
//! `idle` and `exit` land wherever the previous act ends, so a long title
//! pushes them later.

use showreel_animation::{Easing, Position, Timeline, Tween};
use showreel_core::{NodeId, Property};
use std::fmt;

use crate::slide::SlideParts;

pub const ENTRANCE: &str = "entrance";
pub const IDLE: &str = "idle";
pub const EXIT: &str = "exit";

/// Nodes driven by a cycle timeline
#[derive(Clone, Debug)]
pub struct CycleTargets {
    pub car_image: NodeId,
    pub reflection: NodeId,
    pub light_sweep: NodeId,
    pub meta_row: NodeId,
    /// Title character spans in reading order
    pub chars: Vec<NodeId>,
    /// Shared spotlight; tweens keep their timing when it is absent
    pub spotlight: Option<NodeId>,
}

impl CycleTargets {
    pub fn new(parts: &SlideParts, chars: &[NodeId], spotlight: Option<NodeId>) -> Self {
        Self {
            car_image: parts.car_image,
            reflection: parts.reflection,
            light_sweep: parts.light_sweep,
            meta_row: parts.meta_row,
            chars: chars.to_vec(),
            spotlight,
        }
    }
}

/// Build the timeline for one cycle
pub fn cycle_timeline(targets: &CycleTargets) -> Timeline {
    let car = [targets.car_image, targets.reflection];
    let spotlight: Vec<NodeId> = targets.spotlight.into_iter().collect();
    let chars = targets.chars.as_slice();

    let mut tl = Timeline::new();

    // Setup
    tl.set(
        &car,
        Tween::set()
            .to(Property::X, 100.0)
            .to(Property::Opacity, 0.0)
            .to(Property::Scale, 0.95),
    );
    tl.set(
        chars,
        Tween::set().to(Property::Y, 100.0).to(Property::Opacity, 0.0),
    );
    tl.set(
        &spotlight,
        Tween::set()
            .to(Property::Opacity, 0.0)
            .to(Property::Rotation, 15.0),
    );

    // Entrance
    tl.add_label(ENTRANCE);
    tl.add(
        &spotlight,
        Tween::new(2000)
            .to(Property::Opacity, 0.8)
            .to(Property::Rotation, 0.0)
            .ease(Easing::EaseOutCubic),
        Position::label(ENTRANCE),
    );
    tl.add(
        &car,
        Tween::new(2500)
            .to(Property::X, 0.0)
            .to(Property::Opacity, 1.0)
            .to(Property::Scale, 1.0)
            .ease(Easing::EaseOutQuart),
        Position::label_offset(ENTRANCE, 200),
    );
    tl.add(
        &[targets.light_sweep],
        Tween::new(1500)
            .from_to(Property::XPercent, -100.0, 100.0)
            .ease(Easing::EaseInOutCubic),
        Position::label_offset(ENTRANCE, 800),
    );
    tl.add(
        chars,
        Tween::new(1000)
            .to(Property::Y, 0.0)
            .to(Property::Opacity, 1.0)
            .stagger(50)
            .ease(Easing::BackOut(1.7)),
        Position::label_offset(ENTRANCE, 1000),
    );
    tl.add(
        &[targets.meta_row],
        Tween::new(1000)
            .to(Property::Opacity, 1.0)
            .to(Property::Y, 0.0)
            .ease(Easing::EaseOutCubic),
        Position::label_offset(ENTRANCE, 1500),
    );

    // Idle
    tl.add_label(IDLE);
    tl.add(
        &car,
        Tween::new(4000)
            .to(Property::Scale, 1.02)
            .ease(Easing::EaseInOutSine)
            .yoyo(true)
            .repeat(1),
        Position::label(IDLE),
    );

    // Exit
    tl.add_label(EXIT);
    tl.add(
        &car,
        Tween::new(1200)
            .to(Property::X, -200.0)
            .to(Property::Opacity, 0.0)
            .to(Property::Scale, 1.05)
            .ease(Easing::EaseInCubic),
        Position::label(EXIT),
    );

    let mut text: Vec<NodeId> = chars.to_vec();
    text.push(targets.meta_row);
    tl.add(
        &text,
        Tween::new(800)
            .to(Property::Y, -50.0)
            .to(Property::Opacity, 0.0)
            .stagger(20)
            .ease(Easing::EaseInCubic),
        Position::label(EXIT),
    );
    tl.add(
        &spotlight,
        Tween::new(1000).to(Property::Opacity, 0.0),
        Position::label_offset(EXIT, 500),
    );

    tl
}

/// Where a cycle is in its choreography
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    /// Slide built, timeline not yet at its first label
    Setup,
    Entrance,
    Idle,
    Exit,
    /// Timeline finished; the next cycle starts from Setup
    Complete,
}

impl CyclePhase {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            ENTRANCE => Some(CyclePhase::Entrance),
            IDLE => Some(CyclePhase::Idle),
            EXIT => Some(CyclePhase::Exit),
            _ => None,
        }
    }

    /// Phase implied by a timeline's playhead
    pub fn of(timeline: &Timeline) -> Self {
        if timeline.is_complete() {
            return CyclePhase::Complete;
        }
        timeline
            .current_label()
            .and_then(Self::from_label)
            .unwrap_or(CyclePhase::Setup)
    }

    pub fn name(self) -> &'static str {
        match self {
            CyclePhase::Setup => "setup",
            CyclePhase::Entrance => ENTRANCE,
            CyclePhase::Idle => IDLE,
            CyclePhase::Exit => EXIT,
            CyclePhase::Complete => "complete",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
