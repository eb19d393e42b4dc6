//! Showreel configuration
//!
//! Every field has a default, so an empty `showreel.toml` (or none at all)
//! reproduces the stock page: `products.json`, the `products-container`
//! render target, and 30 dust particles over a 1920x1080 frame.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowreelError};

/// Application configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShowreelConfig {
    /// Catalog location: an http(s) URL, a `file://` URL, or a path
    pub products_url: String,
    /// Id of the render container
    pub container_id: String,
    /// Class of the ambient particle container
    pub ambient_class: String,
    /// Class of the shared spotlight element
    pub spotlight_class: String,
    pub particle_count: usize,
    /// Reference frame for particle placement
    pub reference_width: f32,
    pub reference_height: f32,
    /// Frame driver rate
    pub fps: u32,
    /// Playback speed multiplier
    pub time_scale: f32,
    /// Seed for the particle field; random when absent
    pub seed: Option<u64>,
    /// Stop after this many cycles; runs forever when absent
    pub max_cycles: Option<u64>,
}

impl Default for ShowreelConfig {
    fn default() -> Self {
        Self {
            products_url: "products.json".to_string(),
            container_id: "products-container".to_string(),
            ambient_class: "dust-particles".to_string(),
            spotlight_class: "spotlight-beam".to_string(),
            particle_count: 30,
            reference_width: 1920.0,
            reference_height: 1080.0,
            fps: 60,
            time_scale: 1.0,
            seed: None,
            max_cycles: None,
        }
    }
}

impl ShowreelConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ShowreelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(ShowreelError::Config("fps must be at least 1".to_string()));
        }
        if !(self.time_scale > 0.0) || !self.time_scale.is_finite() {
            return Err(ShowreelError::Config(format!(
                "time_scale must be a positive number, got {}",
                self.time_scale
            )));
        }
        if self.container_id.is_empty() {
            return Err(ShowreelError::Config(
                "container_id must not be empty".to_string(),
            ));
        }
        if self.reference_width <= 0.0 || self.reference_height <= 0.0 {
            return Err(ShowreelError::Config(
                "reference frame must have a positive size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ShowreelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShowreelConfig::default());
        assert_eq!(config.particle_count, 30);
        assert_eq!(config.products_url, "products.json");
    }

    #[test]
    fn test_partial_override() {
        let config = ShowreelConfig::from_toml_str(
            r#"
            products_url = "https://example.com/products.json"
            time_scale = 4.0
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.products_url, "https://example.com/products.json");
        assert_eq!(config.time_scale, 4.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.container_id, "products-container");
    }

    #[test]
    fn test_validation() {
        assert!(ShowreelConfig::from_toml_str("fps = 0").is_err());
        assert!(ShowreelConfig::from_toml_str("time_scale = 0.0").is_err());
        assert!(ShowreelConfig::from_toml_str("time_scale = -1.0").is_err());
        assert!(ShowreelConfig::from_toml_str("container_id = \"\"").is_err());
        assert!(ShowreelConfig::from_toml_str("fps = \"fast\"").is_err());
    }
}
