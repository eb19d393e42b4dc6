//! Animatable visual properties
//!
//! Every scene node carries a [`VisualState`]. The animation engine reads and
//! writes it one scalar [`Property`] at a time through [`PropertyAccess`], so
//! it never needs to know what a node is.

use std::fmt;

use crate::scene::NodeId;

/// A scalar visual property that tweens can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal translation in pixels
    X,
    /// Vertical translation in pixels
    Y,
    /// Horizontal translation as a percentage of the node's own width
    XPercent,
    /// Opacity (0.0 to 1.0)
    Opacity,
    /// Uniform scale factor
    Scale,
    /// Rotation in degrees
    Rotation,
    /// Opacity coupled with visibility: zero hides the node, anything else shows it
    AutoAlpha,
}

impl Property {
    /// CSS-like name used in serialized output and logs
    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::XPercent => "xPercent",
            Property::Opacity => "opacity",
            Property::Scale => "scale",
            Property::Rotation => "rotation",
            Property::AutoAlpha => "autoAlpha",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The visual pose of a single node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub x: f32,
    pub y: f32,
    pub x_percent: f32,
    pub opacity: f32,
    pub scale: f32,
    pub rotation: f32,
    pub visible: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            opacity: 1.0,
            scale: 1.0,
            rotation: 0.0,
            visible: true,
        }
    }
}

impl VisualState {
    /// A pose that starts hidden (opacity 0, not visible)
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            visible: false,
            ..Self::default()
        }
    }

    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::XPercent => self.x_percent,
            Property::Opacity => self.opacity,
            Property::Scale => self.scale,
            Property::Rotation => self.rotation,
            Property::AutoAlpha => {
                if self.visible {
                    self.opacity
                } else {
                    0.0
                }
            }
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::XPercent => self.x_percent = value,
            Property::Opacity => self.opacity = value,
            Property::Scale => self.scale = value,
            Property::Rotation => self.rotation = value,
            Property::AutoAlpha => {
                self.opacity = value;
                self.visible = value > 0.0;
            }
        }
    }

    /// Render as an inline CSS declaration list, empty for the default pose
    pub fn to_css(&self) -> String {
        if *self == Self::default() {
            return String::new();
        }

        let mut decls = Vec::new();
        if !self.visible {
            decls.push("visibility:hidden".to_string());
        }
        if (self.opacity - 1.0).abs() > f32::EPSILON {
            decls.push(format!("opacity:{}", round3(self.opacity)));
        }

        let mut transforms = Vec::new();
        if self.x_percent != 0.0 {
            transforms.push(format!("translateX({}%)", round3(self.x_percent)));
        }
        if self.x != 0.0 || self.y != 0.0 {
            transforms.push(format!(
                "translate({}px,{}px)",
                round3(self.x),
                round3(self.y)
            ));
        }
        if self.rotation != 0.0 {
            transforms.push(format!("rotate({}deg)", round3(self.rotation)));
        }
        if (self.scale - 1.0).abs() > f32::EPSILON {
            transforms.push(format!("scale({})", round3(self.scale)));
        }
        if !transforms.is_empty() {
            decls.push(format!("transform:{}", transforms.join(" ")));
        }

        decls.join(";")
    }
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

/// Read/write access to node properties
///
/// Implemented by [`crate::Scene`]. Writes to nodes that no longer exist
/// return `false` and are otherwise ignored.
pub trait PropertyAccess {
    /// Current value of a property, `None` if the node does not exist
    fn get_property(&self, node: NodeId, property: Property) -> Option<f32>;

    /// Set a property, returning whether the node exists
    fn set_property(&mut self, node: NodeId, property: Property, value: f32) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_alpha_couples_visibility() {
        let mut state = VisualState::hidden();
        assert_eq!(state.get(Property::AutoAlpha), 0.0);

        state.set(Property::AutoAlpha, 1.0);
        assert!(state.visible);
        assert_eq!(state.opacity, 1.0);

        state.set(Property::AutoAlpha, 0.0);
        assert!(!state.visible);
    }

    #[test]
    fn test_hidden_node_reports_zero_auto_alpha() {
        let mut state = VisualState::default();
        state.visible = false;
        assert_eq!(state.get(Property::Opacity), 1.0);
        assert_eq!(state.get(Property::AutoAlpha), 0.0);
    }

    #[test]
    fn test_css_output() {
        assert_eq!(VisualState::default().to_css(), "");

        let mut state = VisualState::default();
        state.set(Property::X, 100.0);
        state.set(Property::Opacity, 0.0);
        state.set(Property::Scale, 0.95);
        assert_eq!(
            state.to_css(),
            "opacity:0;transform:translate(100px,0px) scale(0.95)"
        );
    }
}
