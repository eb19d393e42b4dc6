//! Showreel Application
//!
//! A looping hero-product showcase. The catalog is loaded once, then one
//! product per cycle is rendered into the stage and taken through a scripted
//! entrance, idle and exit before the next product takes its place. A field
//! of dust particles drifts behind everything.
//!
//! # Example
//!
//! ```ignore
//! use showreel_app::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ShowreelConfig::default();
//!     let scene = Scene::new().into_shared();
//!     HostPage::new(&config).build(&mut scene.lock().unwrap())?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     ShowreelApp::new(config, scene).run(shutdown_rx).await?;
//!     Ok(())
//! }
//! ```

mod app;
pub mod choreography;
pub mod config;
pub mod director;
mod error;
pub mod host;
pub mod loader;
pub mod particles;
pub mod slide;


pub use app::ShowreelApp;
pub use choreography::{cycle_timeline, CyclePhase, CycleTargets};
pub use config::ShowreelConfig;
pub use director::{CycleObserver, CycleOutcome, Director, RunSummary, StopReason};
pub use error::{LoadError, Result, ShowreelError};
pub use host::{HostNodes, HostPage};
pub use loader::{cache_busted, CatalogLoader, CatalogSource};
pub use particles::{ParticleField, ParticleSettings};
pub use slide::{build_slide, SlideParts};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::ShowreelApp;
    pub use crate::config::ShowreelConfig;
    pub use crate::director::{CycleObserver, RunSummary, StopReason};
    pub use crate::error::{Result, ShowreelError};
    pub use crate::host::HostPage;

    pub use showreel_core::{Product, Scene, SharedScene};
}
