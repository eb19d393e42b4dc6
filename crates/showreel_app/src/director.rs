//! The cycle loop
//!
//! Every cycle clears the render container, builds the slide for the
//! selected product, splits its title and plays the cycle timeline to the
//! end. Completion of one cycle is the only thing that starts the next.
//!
//! # Locking
//!
//! The frame driver locks the scene and then the scheduler. Everything here
//! follows the same order, and the scene lock is never held across an
//! `.await`.

use showreel_animation::{AnimatedTimeline, SchedulerHandle};
use showreel_core::{CatalogStore, NodeId, Property, PropertyAccess, Scene, SharedScene, SplitText};
use std::sync::{Arc, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::choreography::{cycle_timeline, CyclePhase, CycleTargets};
use crate::error::{Result, ShowreelError};
use crate::slide::build_slide;

fn lock(scene: &SharedScene) -> MutexGuard<'_, Scene> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Receives every phase transition with a view of the scene
///
/// Called with the scene locked, so it must not block.
pub trait CycleObserver: Send {
    fn on_phase(&mut self, cycle: u64, phase: CyclePhase, scene: &Scene);
}

impl<F> CycleObserver for F
where
    F: FnMut(u64, CyclePhase, &Scene) + Send,
{
    fn on_phase(&mut self, cycle: u64, phase: CyclePhase, scene: &Scene) {
        self(cycle, phase, scene)
    }
}

/// How a single cycle ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// The batch for this index was empty; nothing was rendered
    EmptyBatch,
}

/// Why the loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The configured cycle limit was reached
    CycleLimit,
    /// There was nothing to show
    EmptyCatalog,
    /// Shutdown was requested
    Shutdown,
}

/// Result of a showreel run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles_completed: u64,
    pub stop_reason: StopReason,
}

pub struct Director {
    scene: SharedScene,
    scheduler: SchedulerHandle,
    catalog: Arc<CatalogStore>,
    container: NodeId,
    spotlight_class: String,
    max_cycles: Option<u64>,
    observer: Option<Box<dyn CycleObserver>>,
}

impl Director {
    pub fn new(
        scene: SharedScene,
        scheduler: SchedulerHandle,
        catalog: Arc<CatalogStore>,
        container: NodeId,
    ) -> Self {
        Self {
            scene,
            scheduler,
            catalog,
            container,
            spotlight_class: "spotlight-beam".to_string(),
            max_cycles: None,
            observer: None,
        }
    }

    pub fn with_spotlight_class(mut self, class: impl Into<String>) -> Self {
        self.spotlight_class = class.into();
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn CycleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run cycles from index 0 until a stop condition
    ///
    /// Shutdown and the cycle limit are checked between cycles; a running
    /// cycle always plays to the end.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> Result<RunSummary> {
        let mut index: u64 = 0;

        let stop_reason = loop {
            if *shutdown.borrow() {
                break StopReason::Shutdown;
            }
            if self.max_cycles.is_some_and(|max| index >= max) {
                break StopReason::CycleLimit;
            }

            match self.run_cycle(index).await? {
                CycleOutcome::Completed => index += 1,
                CycleOutcome::EmptyBatch => {
                    tracing::warn!("cycle {}: batch is empty, stopping", index);
                    break StopReason::EmptyCatalog;
                }
            }
        };

        tracing::info!("director stopped after {} cycles ({:?})", index, stop_reason);
        Ok(RunSummary {
            cycles_completed: index,
            stop_reason,
        })
    }

    /// Play one full cycle for `index`
    pub async fn run_cycle(&mut self, index: u64) -> Result<CycleOutcome> {
        let (split, timeline, mut labels, mut finished) = {
            let mut scene = lock(&self.scene);
            scene.clear_children(self.container)?;

            let Some(product) = self.catalog.batch(index).into_iter().next() else {
                return Ok(CycleOutcome::EmptyBatch);
            };
            tracing::info!("cycle {}: {}", index, product.name);

            let parts = build_slide(&mut scene, &product, index)?;
            if let Err(e) = scene.append_child(self.container, parts.root) {
                scene.remove(parts.root);
                return Err(e.into());
            }
            scene.set_property(parts.root, Property::AutoAlpha, 1.0);

            let split = SplitText::split(&self.scene, &mut scene, parts.title)?;
            let root = scene.root();
            let spotlight = scene.query_class(root, &self.spotlight_class);
            if spotlight.is_none() {
                tracing::debug!("no .{} element; spotlight tweens are no-ops", self.spotlight_class);
            }

            let targets = CycleTargets::new(&parts, split.chars(), spotlight);
            let mut timeline =
                AnimatedTimeline::new(self.scheduler.clone(), cycle_timeline(&targets));
            let labels = timeline.label_events();
            let finished = timeline.finished();
            // Initial pose lands before anything observes the slide
            timeline.start_and_render(&mut *scene);

            if let Some(observer) = self.observer.as_mut() {
                observer.on_phase(index, CyclePhase::Setup, &scene);
            }
            (split, timeline, labels, finished)
        };

        let completed = loop {
            tokio::select! {
                biased;

                Some(label) = labels.recv() => {
                    if let Some(phase) = CyclePhase::from_label(&label) {
                        self.phase_changed(index, phase);
                    }
                }
                result = &mut finished => break result.is_ok(),
            }
        };

        // Labels reached on the final frame
        while let Ok(label) = labels.try_recv() {
            if let Some(phase) = CyclePhase::from_label(&label) {
                self.phase_changed(index, phase);
            }
        }

        if !completed {
            drop(timeline);
            split.revert();
            return Err(ShowreelError::SchedulerStopped(index));
        }

        self.phase_changed(index, CyclePhase::Complete);
        drop(timeline);
        split.revert();

        tracing::info!("cycle {} complete", index);
        Ok(CycleOutcome::Completed)
    }

    fn phase_changed(&mut self, index: u64, phase: CyclePhase) {
        tracing::debug!("cycle {}: {}", index, phase);
        if let Some(observer) = self.observer.as_mut() {
            let scene = lock(&self.scene);
            observer.on_phase(index, phase, &scene);
        }
    }
}
