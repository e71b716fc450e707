/*!
 * # Selection Anchors
 *
 * A [`SelectionAnchor`] is a detached copy of the selection taken right
 * before the content is re-read. After the surface re-renders, the anchor is
 * restored onto the tree. Because node ids are never reused, an anchor whose
 * nodes were removed in between is detected as stale instead of landing on
 * unrelated content.
 *
 * Restoration is best effort:
 *
 * - a valid anchor restores the exact selection;
 * - a stale or missing anchor collapses the selection to the end of the
 *   content.
 */

use std::cmp::Ordering;

use crate::content::{ContentTree, Position, TreeId};
use crate::editing::surface::EditSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionAnchor {
    pub tree: TreeId,
    pub start: Position,
    pub end: Position,
}

/// Which path [`restore`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restoration {
    Exact,
    FellBackToEnd,
}

/// Why an anchor no longer fits the tree it is restored onto.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaleAnchor {
    #[error("anchor belongs to another content tree")]
    DifferentTree,
    #[error("anchored node is no longer in the tree")]
    Detached,
    #[error("anchored offset {offset} is out of range")]
    OffsetOutOfRange { offset: usize },
    #[error("anchor start lies after its end")]
    Reversed,
}

impl SelectionAnchor {
    /// Capture the live selection of `surface`.
    ///
    /// Returns `None` when there is no selection, when it is outside the
    /// editable region, or when it points at nodes that are not in the tree.
    /// Positions on widgets move to the gap after the widget. A backwards
    /// selection is stored in document order.
    pub fn capture(surface: &EditSurface) -> Option<Self> {
        let selection = surface.local_selection()?;
        let tree = &surface.tree;
        let mut start = tree.normalize_position(selection.start)?;
        let mut end = tree.normalize_position(selection.end)?;
        if tree.compare_positions(start, end)? == Ordering::Greater {
            std::mem::swap(&mut start, &mut end);
        }
        Some(Self {
            tree: tree.id(),
            start,
            end,
        })
    }

    /// Check the anchor against `tree`.
    pub fn validate(&self, tree: &ContentTree) -> Result<(), StaleAnchor> {
        if self.tree != tree.id() {
            return Err(StaleAnchor::DifferentTree);
        }
        for position in [self.start, self.end] {
            let limit = tree
                .offset_limit(position.node)
                .ok_or(StaleAnchor::Detached)?;
            if position.offset > limit {
                return Err(StaleAnchor::OffsetOutOfRange {
                    offset: position.offset,
                });
            }
        }
        match tree.compare_positions(self.start, self.end) {
            Some(Ordering::Greater) => Err(StaleAnchor::Reversed),
            Some(_) => Ok(()),
            None => Err(StaleAnchor::Detached),
        }
    }
}

/// Put the selection back from `anchor`, falling back to the end of the
/// content when the anchor is missing or stale. Never fails.
pub fn restore(surface: &mut EditSurface, anchor: Option<&SelectionAnchor>) -> Restoration {
    match anchor.map(|anchor| (anchor, anchor.validate(&surface.tree))) {
        Some((anchor, Ok(()))) => {
            surface.set_selection(anchor.start, anchor.end);
            Restoration::Exact
        }
        Some((_, Err(stale))) => {
            log::warn!("Selection restore fell back to end of content: {stale}");
            surface.set_caret(surface.tree.end_position());
            Restoration::FellBackToEnd
        }
        None => {
            surface.set_caret(surface.tree.end_position());
            Restoration::FellBackToEnd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ImageWidget, NodeKind, WidgetId};
    use pretty_assertions::assert_eq;

    fn surface(markup: &str) -> EditSurface {
        EditSurface::new(ContentTree::parse(markup))
    }

    #[test]
    fn capture_without_selection_is_none() {
        assert_eq!(SelectionAnchor::capture(&surface("hello")), None);
    }

    #[test]
    fn capture_outside_editable_region_is_none() {
        let mut s = surface("hello");
        let other = ContentTree::new();
        s.selection = Some(crate::editing::surface::Selection::collapsed(
            other.id(),
            other.end_position(),
        ));
        assert_eq!(SelectionAnchor::capture(&s), None);
    }

    #[test]
    fn capture_orders_backwards_selection() {
        let mut s = surface("hello");
        let text = s.tree.children(s.tree.root())[0];
        s.set_selection(Position::new(text, 4), Position::new(text, 1));
        let anchor = SelectionAnchor::capture(&s).unwrap();
        assert_eq!(anchor.start, Position::new(text, 1));
        assert_eq!(anchor.end, Position::new(text, 4));
    }

    #[test]
    fn capture_moves_widget_positions_after_the_widget() {
        let mut s = EditSurface::default();
        let root = s.tree.root();
        let widget = s
            .tree
            .append(
                root,
                NodeKind::Widget(ImageWidget {
                    id: WidgetId::from("w"),
                    src: String::new(),
                    width: 0,
                    height: 0,
                }),
            )
            .unwrap();
        s.set_caret(Position::new(widget, 0));
        let anchor = SelectionAnchor::capture(&s).unwrap();
        assert_eq!(anchor.start, Position::new(root, 1));
    }

    #[test]
    fn restore_valid_anchor_is_exact() {
        let mut s = surface("hello world");
        let text = s.tree.children(s.tree.root())[0];
        s.set_selection(Position::new(text, 2), Position::new(text, 5));
        let anchor = SelectionAnchor::capture(&s);

        s.selection = None;
        assert_eq!(restore(&mut s, anchor.as_ref()), Restoration::Exact);
        let selection = s.selection.unwrap();
        assert_eq!(selection.start, Position::new(text, 2));
        assert_eq!(selection.end, Position::new(text, 5));
    }

    #[test]
    fn restore_after_anchored_node_removed_lands_at_end() {
        let mut s = surface("<p>first</p><p>second</p>");
        let root = s.tree.root();
        let first = s.tree.children(root)[0];
        let text = s.tree.children(first)[0];
        s.set_caret(Position::new(text, 3));
        let anchor = SelectionAnchor::capture(&s).unwrap();

        s.tree.remove(first);
        assert_eq!(anchor.validate(&s.tree), Err(StaleAnchor::Detached));
        assert_eq!(restore(&mut s, Some(&anchor)), Restoration::FellBackToEnd);
        assert_eq!(s.selection.unwrap().caret(), Position::new(root, 1));
    }

    #[test]
    fn restore_after_text_shrank_lands_at_end() {
        let mut s = surface("hello");
        let text = s.tree.children(s.tree.root())[0];
        s.set_caret(Position::new(text, 5));
        let anchor = SelectionAnchor::capture(&s).unwrap();

        s.tree.delete_backward(Position::new(text, 5));
        s.tree.delete_backward(Position::new(text, 4));
        assert_eq!(
            anchor.validate(&s.tree),
            Err(StaleAnchor::OffsetOutOfRange { offset: 5 })
        );
        assert_eq!(restore(&mut s, Some(&anchor)), Restoration::FellBackToEnd);
    }

    #[test]
    fn restore_onto_replaced_tree_lands_at_end() {
        let mut s = surface("hello");
        s.set_caret(s.tree.end_position());
        let anchor = SelectionAnchor::capture(&s).unwrap();

        s.replace_tree(ContentTree::parse("other"));
        assert_eq!(anchor.validate(&s.tree), Err(StaleAnchor::DifferentTree));
        assert_eq!(restore(&mut s, Some(&anchor)), Restoration::FellBackToEnd);
        assert_eq!(s.selection.unwrap().tree, s.tree.id());
    }

    #[test]
    fn restore_without_anchor_lands_at_end() {
        let mut s = surface("<p>a</p><p>b</p>");
        assert_eq!(restore(&mut s, None), Restoration::FellBackToEnd);
        assert_eq!(s.selection.unwrap().caret(), s.tree.end_position());
    }
}
