//! Retained scene tree
//!
//! A minimal document model: elements with a tag, id, classes and
//! attributes, plus text nodes. Nodes live in a slotmap and are addressed by
//! [`NodeId`]; removed nodes leave stale ids behind that simply resolve to
//! `None`.
//!
//! Text and attribute values are stored as data and escaped on
//! serialization, so content coming from the catalog can never introduce
//! new nodes.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::style::{Property, PropertyAccess, VisualState};

new_key_type! {
    pub struct NodeId;
}

/// Scene shared between the director and the frame driver
pub type SharedScene = Arc<Mutex<Scene>>;

/// Errors from scene mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("text nodes cannot have children")]
    TextParent,

    #[error("cannot append node {child:?} into its own subtree")]
    Cycle { child: NodeId },
}

/// Description of an element to create
///
/// ```ignore
/// let slide = scene.create(Element::new("div").class("product-slide").id("slide-0"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    visual: VisualState,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Give the element a single text child
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Initial visual pose
    pub fn visual(mut self, visual: VisualState) -> Self {
        self.visual = visual;
        self
    }
}

/// What a node is
#[derive(Clone, Debug)]
pub enum NodeKind {
    Element {
        tag: String,
        id: Option<String>,
        classes: SmallVec<[String; 2]>,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

/// A node in the scene
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub visual: VisualState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, visual: VisualState) -> Self {
        Self {
            kind,
            visual,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { id, .. } => id.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        match &self.kind {
            NodeKind::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeKind::Text(_) => false,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The scene tree, rooted at a `body` element
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(
            NodeKind::Element {
                tag: "body".to_string(),
                id: None,
                classes: SmallVec::new(),
                attrs: Vec::new(),
            },
            VisualState::default(),
        ));
        Self { nodes, root }
    }

    /// Wrap into a [`SharedScene`]
    pub fn into_shared(self) -> SharedScene {
        Arc::new(Mutex::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn visual(&self, id: NodeId) -> Option<&VisualState> {
        self.nodes.get(id).map(|n| &n.visual)
    }

    pub fn visual_mut(&mut self, id: NodeId) -> Option<&mut VisualState> {
        self.nodes.get_mut(id).map(|n| &mut n.visual)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a detached element (and its text child, if any)
    pub fn create(&mut self, element: Element) -> NodeId {
        let Element {
            tag,
            id,
            classes,
            attrs,
            text,
            visual,
        } = element;

        let node = self.nodes.insert(Node::new(
            NodeKind::Element {
                tag,
                id,
                classes,
                attrs,
            },
            visual,
        ));

        if let Some(text) = text {
            let text_node = self.create_text(text);
            self.link(node, text_node);
        }

        node
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(
            NodeKind::Text(text.into()),
            VisualState::default(),
        ))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or(SceneError::NodeNotFound(parent))?;
        if parent_node.is_text() {
            return Err(SceneError::TextParent);
        }
        if !self.nodes.contains_key(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { child });
        }

        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    /// Create an element and append it to `parent` in one step
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId, SceneError> {
        let node = self.create(element);
        if let Err(e) = self.append_child(parent, node) {
            self.remove(node);
            return Err(e);
        }
        Ok(node)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Unlink a node from its parent, keeping it alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    /// Detach a node and free it along with its whole subtree
    ///
    /// Returns the number of nodes freed. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.nodes.contains_key(id) {
            return 0;
        }
        self.detach(id);

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                freed += 1;
            }
        }
        freed
    }

    /// Free every child subtree of `id`
    pub fn clear_children(&mut self, id: NodeId) -> Result<usize, SceneError> {
        let children = self
            .nodes
            .get(id)
            .map(|n| n.children.clone())
            .ok_or(SceneError::NodeNotFound(id))?;

        let freed = children.into_iter().map(|child| self.remove(child)).sum();
        Ok(freed)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the node is connected to the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Pre-order traversal of a subtree, including `scope` itself
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First attached element with the given id
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.nodes[n].element_id() == Some(id))
    }

    /// First element in `scope` (inclusive) carrying `class`
    pub fn query_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| self.nodes[n].has_class(class))
    }

    /// All elements in `scope` (inclusive) carrying `class`, in document order
    pub fn query_class_all(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.nodes[n].has_class(class))
            .collect()
    }

    /// Element children of `id` with the given tag
    pub fn children_with_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.nodes.get(c).and_then(|n| n.tag()) == Some(tag))
            .collect()
    }

    /// Concatenated text of every text node in the subtree
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.nodes[n].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize a subtree as HTML, with the visual state as inline style
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&html_escape::encode_text(text));
            }
            NodeKind::Element {
                tag,
                id: element_id,
                classes,
                attrs,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    push_attr(out, "class", &classes.join(" "));
                }
                if let Some(element_id) = element_id {
                    push_attr(out, "id", element_id);
                }
                for (name, value) in attrs {
                    push_attr(out, name, value);
                }
                let css = node.visual.to_css();
                if !css.is_empty() {
                    push_attr(out, "style", &css);
                }

                if is_void(tag) {
                    out.push_str(">");
                    return;
                }
                out.push('>');
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "meta" | "link")
}

impl PropertyAccess for Scene {
    fn get_property(&self, node: NodeId, property: Property) -> Option<f32> {
        self.visual(node).map(|v| v.get(property))
    }

    fn set_property(&mut self, node: NodeId, property: Property, value: f32) -> bool {
        match self.visual_mut(node) {
            Some(visual) => {
                visual.set(property, value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.root();
        let container = scene
            .append(root, Element::new("div").id("products-container"))
            .unwrap();
        let slide = scene
            .append(
                container,
                Element::new("div").class("product-slide").id("slide-0"),
            )
            .unwrap();
        scene
            .append(slide, Element::new("h2").class("product-name").text("Model X"))
            .unwrap();
        (scene, container, slide)
    }

    #[test]
    fn test_queries() {
        let (scene, container, slide) = sample();

        assert_eq!(scene.find_by_id("products-container"), Some(container));
        assert_eq!(scene.query_class(container, "product-slide"), Some(slide));

        let title = scene.query_class(slide, "product-name").unwrap();
        assert_eq!(scene.text_content(title), "Model X");
        assert!(scene.is_attached(title));
    }

    #[test]
    fn test_find_by_id_ignores_detached_nodes() {
        let mut scene = Scene::new();
        scene.create(Element::new("div").id("floating"));
        assert_eq!(scene.find_by_id("floating"), None);
    }

    #[test]
    fn test_clear_children_frees_subtrees() {
        let (mut scene, container, slide) = sample();
        let before = scene.len();

        let freed = scene.clear_children(container).unwrap();

        // slide + h2 + text
        assert_eq!(freed, 3);
        assert_eq!(scene.len(), before - 3);
        assert!(scene.children(container).is_empty());
        assert!(!scene.contains(slide));
        assert!(scene.node(slide).is_none());
    }

    #[test]
    fn test_append_moves_node() {
        let (mut scene, container, slide) = sample();
        let other = scene
            .append(scene.root(), Element::new("div").class("other"))
            .unwrap();

        scene.append_child(other, slide).unwrap();

        assert!(scene.children(container).is_empty());
        assert_eq!(scene.children(other), &[slide]);
        assert_eq!(scene.parent(slide), Some(other));
    }

    #[test]
    fn test_append_rejects_cycles_and_text_parents() {
        let (mut scene, container, slide) = sample();
        assert_eq!(
            scene.append_child(slide, container),
            Err(SceneError::Cycle { child: container })
        );

        let text = scene.create_text("hi");
        let div = scene.create(Element::new("div"));
        assert_eq!(scene.append_child(text, div), Err(SceneError::TextParent));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut scene = Scene::new();
        let root = scene.root();
        assert_eq!(scene.remove(root), 0);
        assert!(scene.contains(root));
    }

    #[test]
    fn test_html_escapes_content() {
        let mut scene = Scene::new();
        let node = scene.create(
            Element::new("img")
                .class("car-image")
                .attr("src", "/x.png\" onerror=\"alert(1)")
                .attr("alt", "<b>"),
        );
        let heading = scene.create(Element::new("h2").text("<script>alert(1)</script>"));

        let img = scene.to_html(node);
        assert!(!img.contains("\" onerror"));
        assert!(img.starts_with("<img class=\"car-image\""));

        let h2 = scene.to_html(heading);
        assert_eq!(h2, "<h2>&lt;script&gt;alert(1)&lt;/script&gt;</h2>");
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let (mut scene, container, slide) = sample();
        scene.clear_children(container).unwrap();

        assert!(!scene.set_property(slide, Property::Opacity, 0.5));
        assert_eq!(scene.get_property(slide, Property::Opacity), None);
        assert_eq!(scene.to_html(slide), "");
    }
}
