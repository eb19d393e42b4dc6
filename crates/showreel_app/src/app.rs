//! Showreel application entry point

use showreel_animation::AnimationScheduler;
use showreel_core::{CatalogStore, SharedScene};
use std::sync::{Arc, PoisonError};
use tokio::sync::watch;

use crate::config::ShowreelConfig;
use crate::director::{CycleObserver, Director, RunSummary, StopReason};
use crate::error::{Result, ShowreelError};
use crate::loader::CatalogLoader;
use crate::particles::{ParticleField, ParticleSettings};

/// The showreel application
///
/// Owns the scheduler and frame driver for the duration of [`run`](Self::run).
///
/// # Example
///
/// ```ignore
/// let scene = Scene::new().into_shared();
/// HostPage::new(&config).build(&mut scene.lock().unwrap())?;
///
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let summary = ShowreelApp::new(config, scene).run(shutdown_rx).await?;
/// ```
pub struct ShowreelApp {
    config: ShowreelConfig,
    scene: SharedScene,
    observer: Option<Box<dyn CycleObserver>>,
}

impl ShowreelApp {
    pub fn new(config: ShowreelConfig, scene: SharedScene) -> Self {
        Self {
            config,
            scene,
            observer: None,
        }
    }

    /// Receive phase transitions of every cycle
    pub fn with_observer(mut self, observer: impl CycleObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &ShowreelConfig {
        &self.config
    }

    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    /// Start the page: particles, catalog load, then the cycle loop
    ///
    /// Returns when the cycle limit is reached or `shutdown` turns true. With
    /// an empty catalog the app idles (particles only) until shutdown.
    /// Must run inside a tokio runtime.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<RunSummary> {
        let Self {
            config,
            scene,
            observer,
        } = self;
        config.validate()?;

        let (container, ambient) = {
            let scene = scene.lock().unwrap_or_else(PoisonError::into_inner);
            let root = scene.root();
            (
                scene.find_by_id(&config.container_id),
                scene.query_class(root, &config.ambient_class),
            )
        };
        let Some(container) = container else {
            tracing::error!("render container #{} not found", config.container_id);
            return Err(ShowreelError::MissingContainer(config.container_id.clone()));
        };

        let mut scheduler = AnimationScheduler::new();
        scheduler.set_target_fps(config.fps);
        scheduler.set_time_scale(config.time_scale);
        scheduler.start_background(Arc::clone(&scene));

        let _particles = match ambient {
            Some(ambient) => {
                let settings = ParticleSettings {
                    count: config.particle_count,
                    width: config.reference_width,
                    height: config.reference_height,
                    seed: config.seed,
                };
                let mut scene = scene.lock().unwrap_or_else(PoisonError::into_inner);
                Some(ParticleField::spawn(
                    &mut scene,
                    ambient,
                    &scheduler.handle(),
                    &settings,
                )?)
            }
            None => {
                tracing::debug!("no .{} container; ambient particles disabled", config.ambient_class);
                None
            }
        };

        let catalog = Arc::new(CatalogStore::new());
        CatalogLoader::from_location(&config.products_url)
            .load_into(&catalog)
            .await;

        let summary = if catalog.is_empty() {
            tracing::info!("catalog is empty; showreel is idle");
            idle_until_shutdown(&mut shutdown).await;
            RunSummary {
                cycles_completed: 0,
                stop_reason: StopReason::EmptyCatalog,
            }
        } else {
            let mut director = Director::new(
                Arc::clone(&scene),
                scheduler.handle(),
                Arc::clone(&catalog),
                container,
            )
            .with_spotlight_class(config.spotlight_class.as_str())
            .with_max_cycles(config.max_cycles);
            if let Some(observer) = observer {
                director = director.with_observer(observer);
            }

            let summary = director.run(shutdown.clone()).await?;
            if summary.stop_reason == StopReason::EmptyCatalog {
                idle_until_shutdown(&mut shutdown).await;
            }
            summary
        };

        scheduler.stop_background();
        Ok(summary)
    }
}

/// Resolve once shutdown is requested or its sender is gone
async fn idle_until_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}
