//! Timeline orchestration
//!
//! A [`Timeline`] is a schedule of [`Tween`]s over scene nodes. Each tween is
//! placed at an absolute start time computed from a [`Position`]: the current
//! end of the timeline, an absolute time, or an offset from a named label.
//! Entries overlap freely; the timeline's duration is the latest end of any
//! entry.
//!
//! ```ignore
//! let mut tl = Timeline::new();
//! tl.set(&[car], Tween::set().to(Property::X, 100.0).to(Property::Opacity, 0.0));
//! tl.add_label("entrance");
//! tl.add(
//!     &[car],
//!     Tween::new(2500).to(Property::X, 0.0).to(Property::Opacity, 1.0),
//!     Position::label_offset("entrance", 200),
//! );
//! ```
//!
//! Tweens capture their start values when the playhead first reaches them,
//! so a tween always continues from wherever earlier tweens left the node.
//! Playback only moves forward.

use showreel_core::{NodeId, Property, PropertyAccess};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::values::{Interpolate, TweenValue};

new_key_type! {
    /// Handle to an entry within a timeline
    pub struct TimelineEntryId;
}

/// How many times a tween plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Play once, then repeat this many extra times
    Count(u32),
    /// Repeat forever
    Infinite,
}

#[derive(Clone, Copy, Debug)]
struct PropertyTween {
    property: Property,
    from: Option<f32>,
    to: TweenValue,
}

/// A tween description: which properties change, how long, and how
#[derive(Clone, Debug)]
pub struct Tween {
    props: SmallVec<[PropertyTween; 4]>,
    duration_ms: u32,
    easing: Easing,
    stagger_ms: u32,
    repeat: Repeat,
    yoyo: bool,
}

impl Tween {
    /// A tween lasting `duration_ms` with the default easing
    pub fn new(duration_ms: u32) -> Self {
        Self {
            props: SmallVec::new(),
            duration_ms,
            easing: Easing::default(),
            stagger_ms: 0,
            repeat: Repeat::Count(0),
            yoyo: false,
        }
    }

    /// A zero-duration tween that applies its values instantly
    pub fn set() -> Self {
        Self::new(0)
    }

    /// Animate `property` to an absolute value
    pub fn to(mut self, property: Property, value: f32) -> Self {
        self.props.push(PropertyTween {
            property,
            from: None,
            to: TweenValue::Absolute(value),
        });
        self
    }

    /// Animate `property` by a delta from its value at tween start
    pub fn by(mut self, property: Property, delta: f32) -> Self {
        self.props.push(PropertyTween {
            property,
            from: None,
            to: TweenValue::Relative(delta),
        });
        self
    }

    /// Animate `property` between explicit values
    ///
    /// A tween whose properties all have explicit start values writes them
    /// as soon as the timeline renders, before its own start time.
    pub fn from_to(mut self, property: Property, from: f32, to: f32) -> Self {
        self.props.push(PropertyTween {
            property,
            from: Some(from),
            to: TweenValue::Absolute(to),
        });
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Delay each successive target by `stagger_ms`
    pub fn stagger(mut self, stagger_ms: u32) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    /// Repeat `count` extra times after the first play
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = Repeat::Count(count);
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    /// Play every other iteration backwards
    pub fn yoyo(mut self, enabled: bool) -> Self {
        self.yoyo = enabled;
        self
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Time from the first target's start to the last target's end, `None` if infinite
    pub fn total_span_ms(&self, target_count: usize) -> Option<f64> {
        let stagger = f64::from(self.stagger_ms) * target_count.saturating_sub(1) as f64;
        self.target_span_ms().map(|span| stagger + span)
    }

    /// Play time for a single target, `None` if infinite
    fn target_span_ms(&self) -> Option<f64> {
        match self.repeat {
            Repeat::Count(extra) => Some(f64::from(self.duration_ms) * (f64::from(extra) + 1.0)),
            Repeat::Infinite => None,
        }
    }

    fn immediate_render(&self) -> bool {
        !self.props.is_empty() && self.props.iter().all(|p| p.from.is_some())
    }

    /// Eased progress at `local_ms` into a target's play, and whether it is over
    fn sample(&self, local_ms: f64) -> (f32, bool) {
        let duration = f64::from(self.duration_ms);
        if duration <= 0.0 {
            return (self.easing.apply(1.0), true);
        }

        let (odd, t, done) = match self.repeat {
            Repeat::Count(extra) if local_ms >= duration * (f64::from(extra) + 1.0) => {
                (extra % 2 == 1, 1.0, true)
            }
            _ => {
                let iteration = (local_ms / duration).floor();
                let t = ((local_ms - iteration * duration) / duration) as f32;
                (iteration % 2.0 == 1.0, t, false)
            }
        };

        let t = if self.yoyo && odd {
            1.0 - t
        } else {
            t
        };
        (self.easing.apply(t), done)
    }
}

/// Where an entry starts
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline
    End,
    /// At an absolute time in milliseconds
    At(f64),
    /// At a label plus an offset in milliseconds
    Label { name: String, offset_ms: f64 },
}

impl Position {
    pub fn at(ms: u32) -> Self {
        Position::At(f64::from(ms))
    }

    pub fn label(name: impl Into<String>) -> Self {
        Position::Label {
            name: name.into(),
            offset_ms: 0.0,
        }
    }

    pub fn label_offset(name: impl Into<String>, offset_ms: i32) -> Self {
        Position::Label {
            name: name.into(),
            offset_ms: f64::from(offset_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrackState {
    Pending,
    Primed,
    Active,
    Done,
}

/// Per-target playback state of an entry
#[derive(Clone, Debug)]
struct Track {
    target: NodeId,
    offset_ms: f64,
    state: TrackState,
    values: SmallVec<[(Property, f32, f32); 4]>,
}

impl Track {
    fn new(target: NodeId, offset_ms: f64) -> Self {
        Self {
            target,
            offset_ms,
            state: TrackState::Pending,
            values: SmallVec::new(),
        }
    }

    fn capture(&mut self, tween: &Tween, sink: &dyn PropertyAccess) {
        self.values.clear();
        for prop in &tween.props {
            let from = match prop.from {
                Some(from) => Some(from),
                None => sink.get_property(self.target, prop.property),
            };
            // Missing target: leave this property alone
            if let Some(from) = from {
                self.values
                    .push((prop.property, from, prop.to.resolve(from)));
            }
        }
        self.state = TrackState::Active;
    }

    fn prime(&mut self, tween: &Tween, sink: &mut dyn PropertyAccess) {
        for prop in &tween.props {
            if let Some(from) = prop.from {
                sink.set_property(self.target, prop.property, from);
            }
        }
        self.state = TrackState::Primed;
    }

    fn write(&self, eased: f32, sink: &mut dyn PropertyAccess) {
        for &(property, from, to) in &self.values {
            sink.set_property(self.target, property, from.lerp(&to, eased));
        }
    }
}

struct Entry {
    tween: Tween,
    start_ms: f64,
    tracks: Vec<Track>,
}

type CompleteCallback = Box<dyn FnOnce() + Send>;
type LabelCallback = Box<dyn FnMut(&str) + Send>;

/// A schedule of overlapping tweens with named labels
///
/// Times are kept in `f64` milliseconds so a timeline that repeats forever
/// keeps frame resolution after weeks of playback.
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, Entry>,
    order: Vec<TimelineEntryId>,
    /// Sorted by time; ties keep insertion order
    labels: Vec<(String, f64)>,
    end_ms: f64,
    infinite: bool,
    time_ms: f64,
    labels_passed: usize,
    playing: bool,
    paused: bool,
    completed: bool,
    playback_rate: f32,
    on_complete: Option<CompleteCallback>,
    on_label: Option<LabelCallback>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            labels: Vec::new(),
            end_ms: 0.0,
            infinite: false,
            time_ms: 0.0,
            labels_passed: 0,
            playing: false,
            paused: false,
            completed: false,
            playback_rate: 1.0,
            on_complete: None,
            on_label: None,
        }
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Add a tween over `targets` at `position`
    ///
    /// An empty target list is allowed: the entry still occupies its time
    /// span but writes nothing.
    pub fn add(&mut self, targets: &[NodeId], tween: Tween, position: Position) -> TimelineEntryId {
        let start_ms = self.resolve(&position);
        match tween.total_span_ms(targets.len()) {
            Some(span) => self.end_ms = self.end_ms.max(start_ms + span),
            None => self.infinite = true,
        }

        let tracks = targets
            .iter()
            .enumerate()
            .map(|(i, &target)| Track::new(target, i as f64 * f64::from(tween.stagger_ms)))
            .collect();

        let id = self.entries.insert(Entry {
            tween,
            start_ms,
            tracks,
        });
        self.order.push(id);
        id
    }

    /// Apply values instantly at the current end of the timeline
    pub fn set(&mut self, targets: &[NodeId], tween: Tween) -> TimelineEntryId {
        let tween = Tween {
            duration_ms: 0,
            repeat: Repeat::Count(0),
            ..tween
        };
        self.add(targets, tween, Position::End)
    }

    /// Add a label at the current end of the timeline
    pub fn add_label(&mut self, name: impl Into<String>) -> f64 {
        let at = self.end_ms;
        self.add_label_at(name, at)
    }

    /// Add (or move) a label at an absolute time
    pub fn add_label_at(&mut self, name: impl Into<String>, at_ms: f64) -> f64 {
        let name = name.into();
        self.labels.retain(|(existing, _)| *existing != name);
        let index = self.labels.partition_point(|&(_, t)| t <= at_ms);
        self.labels.insert(index, (name, at_ms));
        at_ms
    }

    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels
            .iter()
            .find(|(label, _)| label == name)
            .map(|&(_, t)| t)
    }

    fn resolve(&mut self, position: &Position) -> f64 {
        let at = match position {
            Position::End => self.end_ms,
            Position::At(ms) => *ms,
            Position::Label { name, offset_ms } => {
                let base = match self.label_time(name) {
                    Some(t) => t,
                    None => {
                        tracing::debug!("label '{}' not found, adding it at {}ms", name, self.end_ms);
                        self.add_label(name.clone())
                    }
                };
                base + offset_ms
            }
        };
        at.max(0.0)
    }

    /// Called once when the timeline reaches its end
    ///
    /// Runs during the tick that completes the timeline, so it must not block.
    pub fn on_complete<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
    }

    pub(crate) fn take_on_complete(&mut self) -> Option<CompleteCallback> {
        self.on_complete.take()
    }

    /// Called with each label's name as the playhead reaches it
    pub fn on_label<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_label = Some(Box::new(f));
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Start (or restart) from time zero
    pub fn start(&mut self) {
        self.time_ms = 0.0;
        self.labels_passed = 0;
        self.playing = true;
        self.paused = false;
        self.completed = false;
        for entry in self.entries.values_mut() {
            for track in &mut entry.tracks {
                track.state = TrackState::Pending;
                track.values.clear();
            }
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate.max(0.0);
    }

    /// Advance by `dt_ms` and write the resulting values into `sink`
    ///
    /// Returns true while the timeline is still playing.
    pub fn tick(&mut self, dt_ms: f32, sink: &mut dyn PropertyAccess) -> bool {
        if !self.playing || self.paused {
            return self.playing;
        }

        self.time_ms += f64::from(dt_ms * self.playback_rate);
        let finished = !self.infinite && self.time_ms >= self.end_ms;
        if finished {
            self.time_ms = self.end_ms;
        }

        self.emit_labels();
        self.render(sink);

        if finished {
            self.playing = false;
            self.completed = true;
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
        self.playing
    }

    fn emit_labels(&mut self) {
        while let Some((name, at)) = self.labels.get(self.labels_passed) {
            if *at > self.time_ms {
                break;
            }
            if let Some(callback) = self.on_label.as_mut() {
                callback(name);
            }
            self.labels_passed += 1;
        }
    }

    fn render(&mut self, sink: &mut dyn PropertyAccess) {
        let time_ms = self.time_ms;
        for id in &self.order {
            let Some(entry) = self.entries.get_mut(*id) else {
                continue;
            };
            let local_ms = time_ms - entry.start_ms;
            let tween = &entry.tween;

            for track in &mut entry.tracks {
                if track.state == TrackState::Done {
                    continue;
                }

                let track_ms = local_ms - track.offset_ms;
                if track_ms < 0.0 {
                    if track.state == TrackState::Pending && tween.immediate_render() {
                        track.prime(tween, sink);
                    }
                    continue;
                }

                if matches!(track.state, TrackState::Pending | TrackState::Primed) {
                    track.capture(tween, sink);
                }

                let (eased, done) = tween.sample(track_ms);
                track.write(eased, sink);
                if done {
                    track.state = TrackState::Done;
                }
            }
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Total length, `None` if any entry repeats forever
    pub fn duration_ms(&self) -> Option<f64> {
        if self.infinite {
            None
        } else {
            Some(self.end_ms)
        }
    }

    /// Overall progress (0.0 to 1.0); always 0.0 for infinite timelines
    pub fn progress(&self) -> f32 {
        match self.duration_ms() {
            Some(d) if d > 0.0 => (self.time_ms / d).clamp(0.0, 1.0) as f32,
            Some(_) => {
                if self.completed {
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    /// Absolute start time of an entry
    pub fn entry_start_ms(&self, id: TimelineEntryId) -> Option<f64> {
        self.entries.get(id).map(|e| e.start_ms)
    }

    /// The most recent label the playhead has reached
    pub fn current_label(&self) -> Option<&str> {
        self.labels_passed
            .checked_sub(1)
            .and_then(|i| self.labels.get(i))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_core::{Element, Scene};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn scene_with(n: usize) -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new();
        let root = scene.root();
        let nodes = (0..n)
            .map(|_| scene.append(root, Element::new("div")).unwrap())
            .collect();
        (scene, nodes)
    }

    fn value(scene: &Scene, node: NodeId, property: Property) -> f32 {
        scene.get_property(node, property).unwrap()
    }

    #[test]
    fn test_label_offsets_and_duration() {
        let (_, nodes) = scene_with(1);
        let mut tl = Timeline::new();

        tl.add_label("entrance");
        let a = tl.add(&nodes, Tween::new(2000), Position::label("entrance"));
        let b = tl.add(&nodes, Tween::new(2500), Position::label_offset("entrance", 200));

        assert_eq!(tl.entry_start_ms(a), Some(0.0));
        assert_eq!(tl.entry_start_ms(b), Some(200.0));
        assert_eq!(tl.duration_ms(), Some(2700.0));

        // Labels without a position land at the current end
        assert_eq!(tl.add_label("idle"), 2700.0);
    }

    #[test]
    fn test_unknown_label_is_created_at_end() {
        let (_, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(1000), Position::End);

        let id = tl.add(&nodes, Tween::new(500), Position::label_offset("later", 250));

        assert_eq!(tl.label_time("later"), Some(1000.0));
        assert_eq!(tl.entry_start_ms(id), Some(1250.0));
    }

    #[test]
    fn test_stagger_extends_span() {
        let (_, nodes) = scene_with(6);
        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(1000).stagger(50), Position::at(1000));
        assert_eq!(tl.duration_ms(), Some(2250.0));
    }

    #[test]
    fn test_yoyo_repeat_span_and_return() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &nodes,
            Tween::new(4000)
                .to(Property::Scale, 1.02)
                .ease(Easing::EaseInOutSine)
                .yoyo(true)
                .repeat(1),
            Position::End,
        );
        assert_eq!(tl.duration_ms(), Some(8000.0));

        tl.start();
        tl.tick(4000.0, &mut scene);
        assert!((value(&scene, nodes[0], Property::Scale) - 1.02).abs() < 1e-4);

        tl.tick(4000.0, &mut scene);
        assert!((value(&scene, nodes[0], Property::Scale) - 1.0).abs() < 1e-4);
        assert!(tl.is_complete());
    }

    #[test]
    fn test_to_captures_value_lazily() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.set(&nodes, Tween::set().to(Property::X, 100.0));
        tl.add(
            &nodes,
            Tween::new(1000).to(Property::X, 0.0).ease(Easing::Linear),
            Position::at(500),
        );

        tl.start();
        tl.tick(250.0, &mut scene);
        assert_eq!(value(&scene, nodes[0], Property::X), 100.0);

        tl.tick(750.0, &mut scene);
        assert!((value(&scene, nodes[0], Property::X) - 50.0).abs() < 1e-3);

        tl.tick(1000.0, &mut scene);
        assert_eq!(value(&scene, nodes[0], Property::X), 0.0);
    }

    #[test]
    fn test_relative_values() {
        let (mut scene, nodes) = scene_with(1);
        scene.set_property(nodes[0], Property::Y, 300.0);

        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(1000).by(Property::Y, -100.0), Position::End);
        tl.start();
        tl.tick(1000.0, &mut scene);

        assert_eq!(value(&scene, nodes[0], Property::Y), 200.0);
    }

    #[test]
    fn test_from_to_renders_before_start() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &nodes,
            Tween::new(1500).from_to(Property::XPercent, -100.0, 100.0),
            Position::at(800),
        );

        tl.start();
        tl.tick(16.0, &mut scene);
        assert_eq!(value(&scene, nodes[0], Property::XPercent), -100.0);

        tl.tick(3000.0, &mut scene);
        assert_eq!(value(&scene, nodes[0], Property::XPercent), 100.0);
    }

    #[test]
    fn test_missing_target_keeps_timing() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &[],
            Tween::new(2000).to(Property::Opacity, 0.8),
            Position::End,
        );
        tl.add(&nodes, Tween::new(500).to(Property::X, 10.0), Position::End);

        assert_eq!(tl.duration_ms(), Some(2500.0));
        tl.start();
        assert!(!tl.tick(5000.0, &mut scene));
        assert_eq!(value(&scene, nodes[0], Property::X), 10.0);
    }

    #[test]
    fn test_removed_target_is_noop() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(500).to(Property::X, 10.0), Position::End);
        scene.remove(nodes[0]);

        tl.start();
        assert!(!tl.tick(1000.0, &mut scene));
    }

    #[test]
    fn test_completion_fires_once() {
        let (mut scene, nodes) = scene_with(1);
        let count = Arc::new(AtomicUsize::new(0));
        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(100).to(Property::X, 1.0), Position::End);

        let counter = Arc::clone(&count);
        tl.on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tl.start();
        tl.tick(50.0, &mut scene);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tl.tick(100.0, &mut scene);
        tl.tick(100.0, &mut scene);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(tl.is_complete());
        assert_eq!(tl.progress(), 1.0);
    }

    #[test]
    fn test_labels_emitted_in_order() {
        let (mut scene, nodes) = scene_with(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tl = Timeline::new();
        tl.add_label("entrance");
        tl.add(&nodes, Tween::new(1000), Position::End);
        tl.add_label("idle");
        tl.add(&nodes, Tween::new(1000), Position::End);
        tl.add_label("exit");
        tl.add(&nodes, Tween::new(1000), Position::End);

        let sink = Arc::clone(&seen);
        tl.on_label(move |name| sink.lock().unwrap().push(name.to_string()));

        tl.start();
        tl.tick(10.0, &mut scene);
        assert_eq!(tl.current_label(), Some("entrance"));
        tl.tick(2500.0, &mut scene);
        assert_eq!(tl.current_label(), Some("exit"));

        assert_eq!(*seen.lock().unwrap(), vec!["entrance", "idle", "exit"]);
    }

    #[test]
    fn test_later_entries_win_on_overlap() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &nodes,
            Tween::new(1000).to(Property::Opacity, 0.0).ease(Easing::Linear),
            Position::at(0),
        );
        tl.add(
            &nodes,
            Tween::new(1000).to(Property::Opacity, 0.5).ease(Easing::Linear),
            Position::at(500),
        );

        tl.start();
        tl.tick(2000.0, &mut scene);
        assert_eq!(value(&scene, nodes[0], Property::Opacity), 0.5);
    }

    #[test]
    fn test_infinite_timeline_never_completes() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &nodes,
            Tween::new(1000).by(Property::Y, -100.0).yoyo(true).repeat_forever(),
            Position::at(0),
        );
        assert_eq!(tl.duration_ms(), None);

        tl.start();
        for _ in 0..100 {
            assert!(tl.tick(333.0, &mut scene));
        }
        let y = value(&scene, nodes[0], Property::Y);
        assert!((-100.0..=0.0).contains(&y));
    }

    #[test]
    fn test_forever_timeline_keeps_frame_resolution() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(
            &nodes,
            Tween::new(1000)
                .by(Property::Y, -100.0)
                .ease(Easing::Linear)
                .yoyo(true)
                .repeat_forever(),
            Position::at(0),
        );

        tl.start();
        // About six days of playback
        tl.tick(5.4e8, &mut scene);
        let t0 = tl.time_ms();
        for _ in 0..30 {
            tl.tick(16.67, &mut scene);
        }

        let advanced = tl.time_ms() - t0;
        assert!((advanced - 500.1).abs() < 1e-3, "advanced {advanced}");
        let y = value(&scene, nodes[0], Property::Y);
        assert!((y + 50.01).abs() < 0.05, "y = {y}");
    }

    #[test]
    fn test_pause_and_playback_rate() {
        let (mut scene, nodes) = scene_with(1);
        let mut tl = Timeline::new();
        tl.add(&nodes, Tween::new(1000), Position::End);

        tl.start();
        tl.pause();
        tl.tick(500.0, &mut scene);
        assert_eq!(tl.time_ms(), 0.0);

        tl.resume();
        tl.set_playback_rate(2.0);
        tl.tick(250.0, &mut scene);
        assert_eq!(tl.time_ms(), 500.0);
    }
}
