//! The host document the showreel renders into

use showreel_core::{Element, NodeId, Scene, SceneError};

use crate::config::ShowreelConfig;

/// Builder for the stage markup:
/// `body > div.stage > [div.spotlight-beam, div.dust-particles, div#products-container]`
///
/// Each part can be left out, mostly so tests can exercise the degraded paths.
#[derive(Clone, Debug)]
pub struct HostPage {
    spotlight_class: Option<String>,
    ambient_class: Option<String>,
    container_id: Option<String>,
}

/// Ids of the nodes a [`HostPage`] created
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostNodes {
    pub stage: NodeId,
    pub spotlight: Option<NodeId>,
    pub ambient: Option<NodeId>,
    pub container: Option<NodeId>,
}

impl HostPage {
    pub fn new(config: &ShowreelConfig) -> Self {
        Self {
            spotlight_class: Some(config.spotlight_class.clone()),
            ambient_class: Some(config.ambient_class.clone()),
            container_id: Some(config.container_id.clone()),
        }
    }

    pub fn without_spotlight(mut self) -> Self {
        self.spotlight_class = None;
        self
    }

    pub fn without_ambient(mut self) -> Self {
        self.ambient_class = None;
        self
    }

    pub fn without_container(mut self) -> Self {
        self.container_id = None;
        self
    }

    /// Append the stage under the scene root
    pub fn build(&self, scene: &mut Scene) -> Result<HostNodes, SceneError> {
        let root = scene.root();
        let stage = scene.append(root, Element::new("div").class("stage"))?;

        let spotlight = match &self.spotlight_class {
            Some(class) => Some(scene.append(stage, Element::new("div").class(class.as_str()))?),
            None => None,
        };
        let ambient = match &self.ambient_class {
            Some(class) => Some(scene.append(stage, Element::new("div").class(class.as_str()))?),
            None => None,
        };
        let container = match &self.container_id {
            Some(id) => Some(scene.append(stage, Element::new("div").id(id.as_str()))?),
            None => None,
        };

        Ok(HostNodes {
            stage,
            spotlight,
            ambient,
            container,
        })
    }
}

impl Default for HostPage {
    fn default() -> Self {
        Self::new(&ShowreelConfig::default())
    }
}
