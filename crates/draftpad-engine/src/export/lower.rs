//! Phase 1 of export: flatten the loosely structured content tree into an
//! ordered list of text and image blocks.

use crate::content::sink::{attribute, dimension};
use crate::content::{ContentTree, NodeId, NodeKind, ZERO_WIDTH_SPACE, is_block_element};

/// One output block before images are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Image {
        src: String,
        /// Declared size, 0 where not declared
        width: u32,
        height: u32,
    },
}

/// Walk `tree` depth first with an explicit stack and classify each node.
pub fn lower(tree: &ContentTree) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut stack: Vec<NodeId> = vec![tree.root()];

    while let Some(node) = stack.pop() {
        let Some(kind) = tree.kind(node) else {
            continue;
        };
        match kind {
            NodeKind::Text(text) => {
                blocks.extend(text.lines().filter_map(clean).map(Block::Text));
            }
            NodeKind::Widget(widget) => blocks.push(Block::Image {
                src: widget.src.clone(),
                width: widget.width,
                height: widget.height,
            }),
            NodeKind::Element { tag, attributes } if tag == "img" => blocks.push(Block::Image {
                src: attribute(attributes, "src").unwrap_or_default().to_string(),
                width: dimension(attributes, "width"),
                height: dimension(attributes, "height"),
            }),
            NodeKind::Root => stack.extend(tree.children(node).iter().rev()),
            NodeKind::Element { tag, .. } if is_block_element(tag) => {
                stack.extend(tree.children(node).iter().rev());
            }
            NodeKind::Element { .. } => {
                if let Some(text) = clean(&tree.text_content(node)) {
                    blocks.push(Block::Text(text));
                }
            }
        }
    }

    blocks
}

/// Strip zero-width placeholders and surrounding whitespace. Empty results
/// are dropped.
fn clean(text: &str) -> Option<String> {
    let stripped: String = text.chars().filter(|&c| c != ZERO_WIDTH_SPACE).collect();
    let trimmed = stripped.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
