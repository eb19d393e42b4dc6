//! Animation scheduler
//!
//! Owns every active timeline and advances them each frame, writing tween
//! values into the scene. Timelines are registered through wrapper types:
//! - `AnimatedTimeline` - a timeline removed from the scheduler when dropped
//!
//! The frame driver is a tokio task started with
//! [`AnimationScheduler::start_background`]. Tests and tools can skip it and
//! advance time deterministically with [`AnimationScheduler::tick_by`].

use showreel_core::{PropertyAccess, SharedScene};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::timeline::Timeline;

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    target_fps: u32,
    time_scale: f32,
    frames: u64,
}

impl SchedulerInner {
    fn tick(&mut self, dt_ms: f32, sink: &mut dyn PropertyAccess) -> bool {
        let dt_ms = dt_ms * self.time_scale;
        self.frames += 1;

        for (_, timeline) in self.timelines.iter_mut() {
            timeline.tick(dt_ms, sink);
        }

        // Finished timelines stay registered until their wrapper drops
        self.timelines.iter().any(|(_, t)| t.is_playing())
    }
}

fn lock_inner(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The animation scheduler that ticks all active timelines
///
/// Typically held by the application and shared via `SchedulerHandle`.
///
/// # Background Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.start_background(scene.clone()); // must run inside a tokio runtime
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for the frame driver
    stop_flag: Arc<AtomicBool>,
    /// Frame driver task (if running)
    driver: Option<JoinHandle<()>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                target_fps: 60,
                time_scale: 1.0,
                frames: 0,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            driver: None,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.lock().target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.lock().target_fps
    }

    /// Multiplier applied to elapsed time on every tick
    pub fn set_time_scale(&mut self, scale: f32) {
        self.lock().time_scale = scale.max(0.0);
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        lock_inner(&self.inner)
    }

    /// Start the frame driver on the current tokio runtime
    ///
    /// Each frame locks `scene` and ticks every timeline with the elapsed
    /// time since the previous frame.
    pub fn start_background(&mut self, scene: SharedScene) {
        if self.driver.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let fps = self.target_fps();

        self.driver = Some(tokio::spawn(async move {
            let frame_duration = Duration::from_micros(1_000_000 / fps as u64);
            let mut interval = tokio::time::interval(frame_duration);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last_frame = Instant::now();

            tracing::debug!("frame driver started at {}fps", fps);

            while !stop_flag.load(Ordering::Relaxed) {
                interval.tick().await;

                let now = Instant::now();
                let dt_ms = (now - last_frame).as_secs_f32() * 1000.0;
                last_frame = now;

                let mut scene_guard = scene.lock().unwrap_or_else(PoisonError::into_inner);
                let mut state = lock_inner(&inner);
                state.tick(dt_ms, &mut *scene_guard);

                if state.frames % (fps as u64 * 10) == 0 {
                    tracing::trace!(
                        "frame {}: {} timelines registered",
                        state.frames,
                        state.timelines.len()
                    );
                }
            }

            tracing::debug!("frame driver stopped");
        }));
    }

    /// Stop the frame driver
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_background_running(&self) -> bool {
        self.driver.is_some()
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance all timelines by `dt_ms` (before time scaling)
    ///
    /// Returns true if any timeline is still playing.
    pub fn tick_by(&self, dt_ms: f32, sink: &mut dyn PropertyAccess) -> bool {
        self.lock().tick(dt_ms, sink)
    }

    pub fn has_active_animations(&self) -> bool {
        self.lock().timelines.iter().any(|(_, t)| t.is_playing())
    }

    pub fn timeline_count(&self) -> usize {
        self.lock().timelines.len()
    }

    // =========================================================================
    // Direct Timeline Access
    // =========================================================================

    pub fn add_timeline(&self, timeline: Timeline) -> TimelineId {
        self.lock().timelines.insert(timeline)
    }

    pub fn start_timeline(&self, id: TimelineId) {
        if let Some(timeline) = self.lock().timelines.get_mut(id) {
            timeline.start();
        }
    }

    pub fn stop_timeline(&self, id: TimelineId) {
        if let Some(timeline) = self.lock().timelines.get_mut(id) {
            timeline.stop();
        }
    }

    pub fn remove_timeline(&self, id: TimelineId) -> Option<Timeline> {
        self.lock().timelines.remove(id)
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that need to register timelines. It won't prevent
/// the scheduler from being dropped; operations on a dead handle no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a timeline and return its ID
    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        let inner = self.inner.upgrade()?;
        let id = lock_inner(&inner).timelines.insert(timeline);
        Some(id)
    }

    /// Check if timeline is playing
    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.is_playing()).unwrap_or(false)
    }

    pub fn start_timeline(&self, id: TimelineId) {
        self.with_timeline(id, |t| t.start());
    }

    pub fn stop_timeline(&self, id: TimelineId) {
        self.with_timeline(id, |t| t.stop());
    }

    pub fn remove_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            lock_inner(&inner).timelines.remove(id);
        }
    }

    /// Access a timeline
    ///
    /// Returns None if the scheduler is dropped or the timeline doesn't exist.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        let inner = self.inner.upgrade()?;
        let mut state = lock_inner(&inner);
        state.timelines.get_mut(id).map(f)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// A timeline registered with the scheduler for as long as this value lives
///
/// # Example
///
/// ```ignore
/// let mut timeline = AnimatedTimeline::new(handle, cycle_timeline);
/// let finished = timeline.finished();
/// timeline.start();
/// finished.await?;
/// ```
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    timeline_id: Option<TimelineId>,
}

impl AnimatedTimeline {
    pub fn new(handle: SchedulerHandle, timeline: Timeline) -> Self {
        let timeline_id = handle.register_timeline(timeline);
        if timeline_id.is_none() {
            tracing::warn!("animation scheduler is gone; timeline will never play");
        }
        Self {
            handle,
            timeline_id,
        }
    }

    pub fn id(&self) -> Option<TimelineId> {
        self.timeline_id
    }

    /// Resolves once the timeline reaches its end
    ///
    /// Install before `start()`. The receiver errors if the timeline is
    /// removed (or the scheduler dropped) before completing.
    pub fn finished(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if let Some(id) = self.timeline_id {
            self.handle.with_timeline(id, move |timeline| {
                let previous = timeline.take_on_complete();
                timeline.on_complete(move || {
                    if let Some(previous) = previous {
                        previous();
                    }
                    let _ = tx.send(());
                });
            });
        }
        rx
    }

    /// Stream of label names as the playhead reaches them
    pub fn label_events(&mut self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(id) = self.timeline_id {
            self.handle.with_timeline(id, move |timeline| {
                timeline.on_label(move |name| {
                    let _ = tx.send(name.to_string());
                });
            });
        }
        rx
    }

    pub fn start(&self) {
        if let Some(id) = self.timeline_id {
            self.handle.start_timeline(id);
        }
    }

    /// Start and immediately write the time-zero pose into `sink`
    ///
    /// Zero-duration sets and from-to starts are visible before the first
    /// frame. Labels at time zero are emitted during this call.
    pub fn start_and_render(&self, sink: &mut dyn PropertyAccess) {
        if let Some(id) = self.timeline_id {
            self.handle.with_timeline(id, |t| {
                t.start();
                t.tick(0.0, sink);
            });
        }
    }

    pub fn stop(&self) {
        if let Some(id) = self.timeline_id {
            self.handle.stop_timeline(id);
        }
    }

    pub fn pause(&self) {
        if let Some(id) = self.timeline_id {
            self.handle.with_timeline(id, |t| t.pause());
        }
    }

    pub fn resume(&self) {
        if let Some(id) = self.timeline_id {
            self.handle.with_timeline(id, |t| t.resume());
        }
    }

    pub fn is_playing(&self) -> bool {
        self.timeline_id
            .map(|id| self.handle.is_timeline_playing(id))
            .unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.timeline_id
            .and_then(|id| self.handle.with_timeline(id, |t| t.is_complete()))
            .unwrap_or(false)
    }

    /// Overall timeline progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.timeline_id
            .and_then(|id| self.handle.with_timeline(id, |t| t.progress()))
            .unwrap_or(0.0)
    }

    pub fn current_label(&self) -> Option<String> {
        self.timeline_id.and_then(|id| {
            self.handle
                .with_timeline(id, |t| t.current_label().map(str::to_string))
                .flatten()
        })
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        if let Some(id) = self.timeline_id {
            self.handle.remove_timeline(id);
        }
    }
}
