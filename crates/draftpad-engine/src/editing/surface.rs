use crate::content::{ContentTree, Position, TreeId};

/// A live selection as the surface reports it.
///
/// `tree` records which content tree the positions were taken from. A
/// selection from another tree lies outside this editable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub tree: TreeId,
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn collapsed(tree: TreeId, at: Position) -> Self {
        Self {
            tree,
            start: at,
            end: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The point where typed input goes
    pub fn caret(&self) -> Position {
        self.end
    }
}

/// The editable region: the content tree plus the live selection on it.
#[derive(Debug, Clone, Default)]
pub struct EditSurface {
    pub tree: ContentTree,
    pub selection: Option<Selection>,
}

impl EditSurface {
    pub fn new(tree: ContentTree) -> Self {
        Self {
            tree,
            selection: None,
        }
    }

    /// Replace the whole content. The selection is dropped, since it
    /// belongs to the old tree.
    pub fn replace_tree(&mut self, tree: ContentTree) {
        self.tree = tree;
        self.selection = None;
    }

    /// Collapse the selection to `at` in the current tree
    pub fn set_caret(&mut self, at: Position) {
        self.selection = Some(Selection::collapsed(self.tree.id(), at));
    }

    pub fn set_selection(&mut self, start: Position, end: Position) {
        self.selection = Some(Selection {
            tree: self.tree.id(),
            start,
            end,
        });
    }

    /// Select from the start of the content to its end
    pub fn select_all(&mut self) {
        let root = self.tree.root();
        self.set_selection(Position::new(root, 0), self.tree.end_position());
    }

    /// The selection if it belongs to the current tree
    pub fn local_selection(&self) -> Option<Selection> {
        self.selection.filter(|s| s.tree == self.tree.id())
    }
}
