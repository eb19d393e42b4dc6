//! Configuration file handling
//!
//! Settings come from `showreel.toml` in the working directory (or the file
//! given with `--config`), then command-line flags are applied on top.

use anyhow::{Context, Result};
use showreel_app::ShowreelConfig;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "showreel.toml";

/// Command-line values that take precedence over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub products: Option<String>,
    pub fps: Option<u32>,
    pub time_scale: Option<f32>,
    pub cycles: Option<u64>,
    pub seed: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut ShowreelConfig) {
        if let Some(products) = &self.products {
            config.products_url = products.clone();
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(time_scale) = self.time_scale {
            config.time_scale = time_scale;
        }
        if let Some(cycles) = self.cycles {
            config.max_cycles = Some(cycles);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

/// Load from an explicit path; the file must exist
pub fn load_from_file(path: &Path) -> Result<ShowreelConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load from `dir/showreel.toml`, falling back to defaults when absent
pub fn load_from_dir(dir: &Path) -> Result<ShowreelConfig> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        load_from_file(&path)
    } else {
        Ok(ShowreelConfig::default())
    }
}

/// Resolve the effective configuration
pub fn resolve(explicit: Option<&Path>, overrides: &Overrides) -> Result<ShowreelConfig> {
    let mut config = match explicit {
        Some(path) => load_from_file(path)?,
        None => load_from_dir(Path::new("."))?,
    };
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
