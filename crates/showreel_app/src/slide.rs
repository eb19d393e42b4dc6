//! Slide construction
//!
//! A slide is the subtree for one hero product:
//!
//! ```text
//! div.product-slide#slide-<index>
//!   div.car-container
//!     div.car-image-wrapper
//!       img.car-image  img.car-reflection  div.light-sweep-overlay
//!   div.info-container
//!     h2.product-name
//!     div.product-meta-row
//!       div.product-price  div.separator  span  div.separator  span ...
//! ```
//!
//! Catalog strings are stored as text and attribute data only. They are
//! escaped on serialization and never interpreted as markup.

use showreel_core::{Element, NodeId, Product, Scene, SceneError, VisualState};

pub const SLIDE_CLASS: &str = "product-slide";
pub const SEPARATOR_CLASS: &str = "separator";

/// Node ids of the parts of a slide the choreography animates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideParts {
    pub root: NodeId,
    pub car_image: NodeId,
    pub reflection: NodeId,
    pub light_sweep: NodeId,
    pub title: NodeId,
    pub meta_row: NodeId,
    pub price: NodeId,
    pub tags: Vec<NodeId>,
}

/// Build a detached slide for `product`
///
/// The slide starts hidden; the caller attaches it and makes it visible.
pub fn build_slide(
    scene: &mut Scene,
    product: &Product,
    index: u64,
) -> Result<SlideParts, SceneError> {
    let root = scene.create(
        Element::new("div")
            .class(SLIDE_CLASS)
            .id(format!("slide-{index}"))
            .visual(VisualState::hidden()),
    );

    let car_container = scene.append(root, Element::new("div").class("car-container"))?;
    let wrapper = scene.append(car_container, Element::new("div").class("car-image-wrapper"))?;
    let car_image = scene.append(
        wrapper,
        Element::new("img")
            .class("car-image")
            .attr("src", product.image_url.as_str())
            .attr("alt", product.name.as_str()),
    )?;
    let reflection = scene.append(
        wrapper,
        Element::new("img")
            .class("car-reflection")
            .attr("src", product.image_url.as_str())
            .attr("alt", ""),
    )?;
    let light_sweep = scene.append(wrapper, Element::new("div").class("light-sweep-overlay"))?;

    let info = scene.append(root, Element::new("div").class("info-container"))?;
    let title = scene.append(
        info,
        Element::new("h2")
            .class("product-name")
            .text(product.name.as_str()),
    )?;
    let meta_row = scene.append(
        info,
        Element::new("div").class("product-meta-row").visual(VisualState {
            opacity: 0.0,
            y: 20.0,
            ..VisualState::default()
        }),
    )?;
    let price = scene.append(
        meta_row,
        Element::new("div")
            .class("product-price")
            .text(product.price.as_str()),
    )?;
    scene.append(meta_row, Element::new("div").class(SEPARATOR_CLASS))?;

    let mut tags = Vec::new();
    for (i, tag) in product.meta_tags().into_iter().enumerate() {
        if i > 0 {
            scene.append(meta_row, Element::new("div").class(SEPARATOR_CLASS))?;
        }
        tags.push(scene.append(meta_row, Element::new("span").text(tag))?);
    }

    Ok(SlideParts {
        root,
        car_image,
        reflection,
        light_sweep,
        title,
        meta_row,
        price,
        tags,
    })
}
