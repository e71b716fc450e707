//! Structural edits on a [`ContentTree`]: ordering positions, inserting text,
//! deleting ranges.
//!
//! Positions are compared through an **order key**: the child-index path of
//! the position's node followed by its offset. Lexicographic order on keys is
//! document order, e.g. for a text node at path `[2]`:
//!
//! ```text
//! (root, 2)  → [2]       before the text node
//! (text, 3)  → [2, 3]    inside it
//! (root, 3)  → [3]       after it
//! ```

use std::cmp::Ordering;

use draftpad_markup::is_void_element;

use crate::content::{ContentTree, NodeId, NodeKind, Position};

impl ContentTree {
    /// True when `position` addresses a live node with an in-range offset.
    pub fn is_valid_position(&self, position: Position) -> bool {
        self.offset_limit(position.node)
            .is_some_and(|limit| position.offset <= limit)
    }

    /// Map a position onto a widget or void element to the gap right after
    /// it, and reject positions that are not valid.
    pub fn normalize_position(&self, position: Position) -> Option<Position> {
        if self.is_atomic(position.node) {
            let parent = self.parent(position.node)?;
            let index = self.index_in_parent(position.node)?;
            return Some(Position::new(parent, index + 1));
        }
        self.is_valid_position(position).then_some(position)
    }

    fn order_key(&self, position: Position) -> Option<Vec<usize>> {
        let mut key = self.path(position.node)?;
        key.push(position.offset);
        Some(key)
    }

    /// Document order of two positions, `None` if either is invalid.
    pub fn compare_positions(&self, a: Position, b: Position) -> Option<Ordering> {
        if !self.is_valid_position(a) || !self.is_valid_position(b) {
            return None;
        }
        Some(self.order_key(a)?.cmp(&self.order_key(b)?))
    }

    /// Insert `text` at `at` and return the caret position right after it.
    ///
    /// Text typed next to an existing text node extends that node; otherwise
    /// a new text node is created.
    pub fn insert_text(&mut self, at: Position, text: &str) -> Option<Position> {
        let at = self.normalize_position(at)?;
        let inserted = text.chars().count();

        if let Some(existing) = self.text_mut(at.node) {
            let byte = byte_offset(existing, at.offset);
            existing.insert_str(byte, text);
            return Some(Position::new(at.node, at.offset + inserted));
        }

        let children = self.children(at.node);
        let before = at.offset.checked_sub(1).and_then(|i| children.get(i)).copied();
        let after = children.get(at.offset).copied();

        if let Some(before) = before
            && let Some(existing) = self.text_mut(before)
        {
            let end = existing.chars().count();
            existing.push_str(text);
            return Some(Position::new(before, end + inserted));
        }
        if let Some(after) = after
            && let Some(existing) = self.text_mut(after)
        {
            existing.insert_str(0, text);
            return Some(Position::new(after, inserted));
        }

        let node = self.insert(at.node, at.offset, NodeKind::text(text))?;
        Some(Position::new(node, inserted))
    }

    /// Split the text node `id` at char `offset`. The left part stays in
    /// `id`; the right part becomes a new following sibling, whose id is
    /// returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        let text = self.text_mut(id)?;
        let byte = byte_offset(text, offset);
        let right = text.split_off(byte);
        self.insert(parent, index + 1, NodeKind::Text(right))
    }

    /// Delete everything between `start` and `end` (in either order) and
    /// return the collapsed caret.
    ///
    /// Nodes lying entirely inside the range are removed whole, so a widget
    /// is either kept or removed, never split. Text nodes that are only
    /// partly covered lose just the covered characters. The node holding the
    /// start position always survives, which keeps the returned caret valid.
    pub fn delete_range(&mut self, start: Position, end: Position) -> Option<Position> {
        let mut start = self.normalize_position(start)?;
        let mut end = self.normalize_position(end)?;
        if self.compare_positions(start, end)? == Ordering::Greater {
            std::mem::swap(&mut start, &mut end);
        }
        let start_key = self.order_key(start)?;
        let end_key = self.order_key(end)?;
        if start_key == end_key {
            return Some(start);
        }

        let mut removals = Vec::new();
        let mut trims = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            let Some(base) = self.path(node) else {
                continue;
            };
            for (index, &child) in self.children(node).iter().enumerate() {
                let mut before = base.clone();
                before.push(index);
                let mut after = base.clone();
                after.push(index + 1);

                if end_key <= before || start_key >= after {
                    continue;
                }
                if start_key <= before && end_key >= after {
                    removals.push(child);
                } else if let Some(text) = self.text(child) {
                    let from = if start.node == child { start.offset } else { 0 };
                    let to = if end.node == child {
                        end.offset
                    } else {
                        text.chars().count()
                    };
                    trims.push((child, from, to));
                } else {
                    stack.push(child);
                }
            }
        }

        for (node, from, to) in trims {
            if let Some(text) = self.text_mut(node) {
                let from_byte = byte_offset(text, from);
                let to_byte = byte_offset(text, to);
                text.replace_range(from_byte..to_byte, "");
            }
        }
        for node in removals {
            self.remove(node);
        }

        Some(start)
    }

    /// Delete one unit before a collapsed caret: a character, a void element,
    /// an empty element, or a whole widget. Returns the new caret.
    pub fn delete_backward(&mut self, at: Position) -> Option<Position> {
        let mut at = self.normalize_position(at)?;

        loop {
            if let Some(text) = self.text_mut(at.node) {
                if at.offset > 0 {
                    let from = byte_offset(text, at.offset - 1);
                    let to = byte_offset(text, at.offset);
                    text.replace_range(from..to, "");
                    return Some(Position::new(at.node, at.offset - 1));
                }
                // At the start of a text node: continue from the gap before it
                let parent = self.parent(at.node)?;
                at = Position::new(parent, self.index_in_parent(at.node)?);
            }

            if at.offset == 0 {
                // At the start of an element: step out, dropping it when empty
                let Some(parent) = self.parent(at.node) else {
                    return Some(at);
                };
                let index = self.index_in_parent(at.node)?;
                if self.children(at.node).is_empty() {
                    self.remove(at.node);
                }
                at = Position::new(parent, index);
                continue;
            }
            let previous = self.children(at.node)[at.offset - 1];
            match self.kind(previous)? {
                NodeKind::Text(text) if text.is_empty() => {
                    self.remove(previous);
                    at = Position::new(at.node, at.offset - 1);
                }
                NodeKind::Text(text) => {
                    at = Position::new(previous, text.chars().count());
                }
                NodeKind::Widget(_) => {
                    self.remove(previous);
                    return Some(Position::new(at.node, at.offset - 1));
                }
                NodeKind::Element { tag, .. } if is_void_element(tag) => {
                    self.remove(previous);
                    return Some(Position::new(at.node, at.offset - 1));
                }
                NodeKind::Element { .. } if self.children(previous).is_empty() => {
                    self.remove(previous);
                    at = Position::new(at.node, at.offset - 1);
                }
                NodeKind::Element { .. } => {
                    at = Position::new(previous, self.children(previous).len());
                }
                NodeKind::Root => return Some(at),
            }
        }
    }
}

/// Byte index of the char at `offset`, clamped to the end of `text`.
fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
