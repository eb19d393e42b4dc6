//! Ambient dust particles
//!
//! A fixed set of slowly drifting specks behind the stage. Each particle
//! gets its own endlessly repeating timeline; none of them ever complete
//! and nothing else waits on them.

use showreel_animation::{AnimatedTimeline, Easing, Position, SchedulerHandle, Timeline, Tween};
use showreel_core::{Element, NodeId, Property, Scene, SceneError, VisualState};

pub const PARTICLE_CLASS: &str = "particle";

/// Particle field tuning
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSettings {
    pub count: usize,
    /// Frame the initial positions are drawn from
    pub width: f32,
    pub height: f32,
    /// Fixed seed for reproducible fields
    pub seed: Option<u64>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: 30,
            width: 1920.0,
            height: 1080.0,
            seed: None,
        }
    }
}

/// The spawned field; dropping it stops every particle timeline
pub struct ParticleField {
    particles: Vec<NodeId>,
    timelines: Vec<AnimatedTimeline>,
}

impl ParticleField {
    /// Create `settings.count` particles under `container` and start them drifting
    ///
    /// Takes the locked scene and registers timelines with the scheduler
    /// while holding it.
    pub fn spawn(
        scene: &mut Scene,
        container: NodeId,
        handle: &SchedulerHandle,
        settings: &ParticleSettings,
    ) -> Result<Self, SceneError> {
        let mut rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let rand = |rng: &mut fastrand::Rng, a: f32, b: f32| a + (b - a) * rng.f32();

        let mut particles = Vec::with_capacity(settings.count);
        let mut timelines = Vec::with_capacity(settings.count);

        for _ in 0..settings.count {
            let pose = VisualState {
                x: rand(&mut rng, 0.0, settings.width),
                y: rand(&mut rng, 0.0, settings.height),
                scale: rand(&mut rng, 0.5, 1.0),
                opacity: rand(&mut rng, 0.1, 0.4),
                ..VisualState::default()
            };
            let particle = scene.append(
                container,
                Element::new("div").class(PARTICLE_CLASS).visual(pose),
            )?;

            let duration_ms = rand(&mut rng, 10_000.0, 20_000.0) as u32;
            let drift = Tween::new(duration_ms)
                .by(Property::Y, -100.0)
                .by(Property::X, rand(&mut rng, -25.0, 25.0))
                .to(Property::Rotation, rand(&mut rng, 0.0, 360.0))
                .ease(Easing::EaseInOutSine)
                .yoyo(true)
                .repeat_forever();

            let mut timeline = Timeline::new();
            timeline.add(&[particle], drift, Position::End);

            let timeline = AnimatedTimeline::new(handle.clone(), timeline);
            timeline.start();

            particles.push(particle);
            timelines.push(timeline);
        }

        tracing::debug!("spawned {} ambient particles", particles.len());

        Ok(Self {
            particles,
            timelines,
        })
    }

    pub fn particles(&self) -> &[NodeId] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether every particle timeline is still running
    pub fn is_animating(&self) -> bool {
        self.timelines.iter().all(AnimatedTimeline::is_playing)
    }
}
