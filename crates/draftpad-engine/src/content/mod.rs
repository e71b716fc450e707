/*!
 * # Content Arena
 *
 * The editable content of a draft lives in a [`ContentTree`]: an arena of
 * nodes addressed by [`NodeId`]s. Nothing outside the tree holds references
 * into it; selections and anchors hold `(NodeId, offset)` pairs that are
 * validated against the arena whenever they are used.
 *
 * ## Identity Rules
 *
 * - Node slots are **never reused** within a tree. A removed node's id stays
 *   dead forever, so a stale id is detected instead of silently pointing at
 *   some other node.
 * - Every tree carries a process-unique [`TreeId`]. Replacing the whole
 *   content (load, clear) creates a new tree, and positions captured against
 *   the old one are recognisably foreign.
 *
 * ## Offsets
 *
 * A [`Position`] follows the boundary-point convention of editing surfaces:
 * for a text node the offset counts characters, for the root or an element
 * it counts children. Widgets are leaves without offsets.
 *
 * ## Module Structure
 *
 * - **`sink`**: builds a tree from `draftpad-markup` events
 * - **`serialize`**: tree → markup, tree → plain text
 * - **`edit`**: position ordering, text insertion, range deletion
 * - **`widget`**: the inline image widget value type
 */

pub mod edit;
pub mod serialize;
pub mod sink;
pub mod widget;

use std::sync::atomic::{AtomicU64, Ordering};

use draftpad_markup::{Attribute, is_void_element};

pub use widget::{ImageWidget, WidgetId};

/// Zero-width placeholder written after every widget.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Block-level elements. Export flattens these into paragraphs and plain
/// text rendering puts line breaks around them.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

pub fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

/// Stable index of a node inside one [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Process-unique identity of a content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A boundary point in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Text(String),
    Element {
        tag: String,
        attributes: Vec<Attribute>,
    },
    Widget(ImageWidget),
}

impl NodeKind {
    pub fn element(tag: &str) -> Self {
        NodeKind::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn text(text: &str) -> Self {
        NodeKind::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed content tree. Slot 0 is always the root.
#[derive(Debug, Clone)]
pub struct ContentTree {
    id: TreeId,
    nodes: Vec<Option<Node>>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create a tree holding only an empty root
    pub fn new() -> Self {
        Self {
            id: TreeId::fresh(),
            nodes: vec![Some(Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            })],
        }
    }

    /// Parse snapshot markup into a new tree
    pub fn parse(markup: &str) -> Self {
        sink::build(draftpad_markup::parse(markup))
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.children(self.root()).is_empty()
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.get_mut(id).map(|node| &mut node.kind)
    }

    pub(crate) fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn widget(&self, id: NodeId) -> Option<&ImageWidget> {
        match self.kind(id)? {
            NodeKind::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    /// Largest valid offset for a position in `id`, or `None` for nodes that
    /// cannot hold a position (widgets, void elements, dead ids).
    pub fn offset_limit(&self, id: NodeId) -> Option<usize> {
        let node = self.get(id)?;
        match &node.kind {
            NodeKind::Text(text) => Some(text.chars().count()),
            NodeKind::Element { tag, .. } if is_void_element(tag) => None,
            NodeKind::Root | NodeKind::Element { .. } => Some(node.children.len()),
            NodeKind::Widget(_) => None,
        }
    }

    /// Widgets and void elements: leaves that are edited as one unit.
    pub fn is_atomic(&self, id: NodeId) -> bool {
        match self.kind(id) {
            Some(NodeKind::Widget(_)) => true,
            Some(NodeKind::Element { tag, .. }) => is_void_element(tag),
            _ => false,
        }
    }

    /// The point after the last child of the root.
    pub fn end_position(&self) -> Position {
        Position::new(self.root(), self.children(self.root()).len())
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        let index = self.children(parent).len();
        self.insert(parent, index, kind)
    }

    /// Insert a new node at `index` among the children of `parent`. The
    /// index is clamped to the child count.
    pub fn insert(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> Option<NodeId> {
        match self.kind(parent)? {
            NodeKind::Root | NodeKind::Element { .. } => {}
            NodeKind::Text(_) | NodeKind::Widget(_) => return None,
        }

        let id = NodeId(u32::try_from(self.nodes.len()).ok()?);
        self.nodes.push(Some(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        }));

        let children = &mut self.get_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, id);
        Some(id)
    }

    /// Detach `id` from its parent and free its whole subtree. The root
    /// cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|&child| child != id);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Drop every child of `id` while keeping `id` itself.
    pub(crate) fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    /// Child indexes leading from the root to `id`.
    pub fn path(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        if !self.contains(current) {
            return None;
        }
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current)?);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// All live descendants of `id` (excluding `id`) in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Concatenated text of all text descendants. Widgets contribute nothing.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// Every widget in document order.
    pub fn widgets(&self) -> Vec<(NodeId, &ImageWidget)> {
        self.descendants(self.root())
            .into_iter()
            .filter_map(|node| self.widget(node).map(|widget| (node, widget)))
            .collect()
    }

    pub fn find_widget(&self, widget_id: &WidgetId) -> Option<NodeId> {
        self.widgets()
            .into_iter()
            .find(|(_, widget)| &widget.id == widget_id)
            .map(|(node, _)| node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_tree_has_only_root() {
        let tree = ContentTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.end_position(), Position::new(tree.root(), 0));
    }

    #[test]
    fn trees_get_distinct_ids() {
        assert_ne!(ContentTree::new().id(), ContentTree::new().id());
    }

    #[test]
    fn insert_clamps_index_and_rejects_leaf_parents() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        let a = tree.append(root, NodeKind::text("a")).unwrap();
        let b = tree.insert(root, 99, NodeKind::text("b")).unwrap();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.insert(a, 0, NodeKind::text("x")), None);
    }

    #[test]
    fn removed_ids_stay_dead() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        let div = tree.append(root, NodeKind::element("div")).unwrap();
        let text = tree.append(div, NodeKind::text("hello")).unwrap();

        assert!(tree.remove(div));
        assert!(!tree.contains(div));
        assert!(!tree.contains(text));

        let fresh = tree.append(root, NodeKind::text("new")).unwrap();
        assert_ne!(fresh, div);
        assert_ne!(fresh, text);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        assert!(!tree.remove(root));
        assert!(tree.contains(root));
    }

    #[test]
    fn path_and_descendants_follow_document_order() {
        let tree = ContentTree::parse("<p>a<b>b</b></p>c");
        let root = tree.root();
        let order: Vec<String> = tree
            .descendants(root)
            .into_iter()
            .filter_map(|id| tree.text(id).map(str::to_string))
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);

        let p = tree.children(root)[0];
        let bold = tree.children(p)[1];
        assert_eq!(tree.path(bold), Some(vec![0, 1]));
        assert_eq!(tree.path(root), Some(vec![]));
    }

    #[test]
    fn offset_limit_counts_chars_or_children() {
        let tree = ContentTree::parse("<p>héllo<br></p>");
        let p = tree.children(tree.root())[0];
        let text = tree.children(p)[0];
        assert_eq!(tree.offset_limit(text), Some(5));
        assert_eq!(tree.offset_limit(p), Some(2));
        let br = tree.children(p)[1];
        assert_eq!(tree.offset_limit(br), None);
        assert!(tree.is_atomic(br));
    }

    #[test]
    fn text_content_skips_widgets() {
        let tree = ContentTree::parse(concat!(
            "<p>before ",
            r#"<span class="image-widget" data-widget-id="w"><img src="data:," width="1" height="1">"#,
            r#"<button class="image-delete">×</button></span>"#,
            " after</p>"
        ));
        assert_eq!(tree.text_content(tree.root()), "before  after");
        assert_eq!(tree.widgets().len(), 1);
        assert!(tree.find_widget(&WidgetId::from("w")).is_some());
    }
}
