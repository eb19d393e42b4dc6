//! Showreel Core
//!
//! The foundational pieces shared by the animation engine and the app:
//!
//! - **Scene Tree**: a retained element/text tree addressed by [`NodeId`]
//! - **Visual Properties**: per-node pose and the [`PropertyAccess`] seam
//!   the animation engine writes through
//! - **Split Text**: per-character decomposition with guaranteed revert
//! - **Catalog**: the product store and batch selection
//!
//! # Example
//!
//! ```rust
//! use showreel_core::{Element, Property, PropertyAccess, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.root();
//! let title = scene
//!     .append(root, Element::new("h2").class("product-name").text("Model X"))
//!     .unwrap();
//!
//! scene.set_property(title, Property::Opacity, 0.5);
//! assert_eq!(scene.get_property(title, Property::Opacity), Some(0.5));
//! assert_eq!(scene.text_content(title), "Model X");
//! ```

pub mod catalog;
pub mod scene;
pub mod split;
pub mod style;

pub use catalog::{get_batch, CatalogStore, Product, BATCH_SIZE};
pub use scene::{Element, Node, NodeId, NodeKind, Scene, SceneError, SharedScene};
pub use split::{SplitText, CHAR_CLASS};
pub use style::{Property, PropertyAccess, VisualState};
