/*!
 * # Content Mutation Coordinator
 *
 * [`Editor`] owns the edit surface, the canonical [`ContentSnapshot`] and the
 * deferred work around them. Every content change goes through
 * [`Editor::on_mutated`], which:
 *
 * 1. captures the selection as an anchor
 * 2. serializes the tree into a fresh snapshot and replaces the old one
 * 3. schedules the selection restore for the next tick
 * 4. re-arms the debounced persistence write
 *
 * No pass runs while an input-method composition is open. Ending the
 * composition defers exactly one pass to the next [`Editor::tick`].
 *
 * ## Tick Order
 *
 * A tick stands for the next scheduling turn after a re-render. It first
 * runs the restore a previous pass scheduled, then the deferred composition
 * pass (whose restore waits for the following tick), then any persistence
 * write whose quiet period has elapsed.
 */

use std::rc::Rc;

use crate::content::{ContentTree, Position, WidgetId};
use crate::editing::anchors::{Restoration, SelectionAnchor, restore};
use crate::editing::patch::Patch;
use crate::editing::scheduler::{Clock, Debouncer, RestoreQueue};
use crate::editing::surface::EditSurface;
use crate::editing::widgets::{ClipboardItem, paste_image, remove_widget};
use crate::host::{ClipboardWriter, ConfirmPrompt, CopyMethod, Notifier, copy_content};
use crate::io::{DraftStore, StoredDraft};

pub const DEFAULT_STORAGE_KEY: &str = "draftpad-content";
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const CLEAR_PROMPT: &str = "Clear all content? This cannot be undone.";

/// The canonical serialized content. Replaced wholesale on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentSnapshot {
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub debounce_ms: u64,
    pub storage_key: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// What a paste did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteOutcome {
    pub widgets: Vec<WidgetId>,
    /// Image items that could not be decoded
    pub skipped: usize,
    pub inserted_text: bool,
    pub patch: Option<Patch>,
}

/// What one tick ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub restored: Option<Restoration>,
    pub pass: Option<Patch>,
    pub saved: bool,
}

/// The composed range of an open composition
#[derive(Debug, Clone, Copy)]
struct Composition {
    start: Position,
    end: Position,
}

pub struct Editor {
    surface: EditSurface,
    snapshot: ContentSnapshot,
    version: u64,
    store: Box<dyn DraftStore>,
    clock: Rc<dyn Clock>,
    options: EditorOptions,
    restores: RestoreQueue,
    persist: Debouncer<ContentSnapshot>,
    composition: Option<Composition>,
    finalize_pending: bool,
}

impl Editor {
    /// Open the editor on the draft stored under the configured key.
    ///
    /// A missing draft starts empty. An unreadable or corrupt one is logged
    /// and also starts empty.
    pub fn open(store: Box<dyn DraftStore>, clock: Rc<dyn Clock>, options: EditorOptions) -> Self {
        let stored = match store.get(&options.storage_key) {
            Ok(Some(json)) => match StoredDraft::from_json(&json) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    log::warn!("Ignoring corrupt stored draft: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read stored draft: {e}");
                None
            }
        };

        let (tree, timestamp) = match stored {
            Some(draft) => (ContentTree::parse(&draft.content), draft.timestamp),
            None => (ContentTree::new(), clock.now_ms()),
        };
        let mut surface = EditSurface::new(tree);
        surface.set_caret(surface.tree.end_position());
        let snapshot = ContentSnapshot {
            content: surface.tree.to_markup(),
            timestamp,
        };

        Self {
            surface,
            snapshot,
            version: 0,
            store,
            clock,
            persist: Debouncer::new(options.debounce_ms),
            options,
            restores: RestoreQueue::default(),
            composition: None,
            finalize_pending: false,
        }
    }

    pub fn surface(&self) -> &EditSurface {
        &self.surface
    }

    pub fn tree(&self) -> &ContentTree {
        &self.surface.tree
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    /// True while a persistence write is waiting for its quiet period
    pub fn has_unsaved_changes(&self) -> bool {
        self.persist.is_armed()
    }

    pub fn plain_text(&self) -> String {
        self.surface.tree.plain_text()
    }

    /// The single coordinator pass. Returns `None` while composing.
    pub fn on_mutated(&mut self) -> Option<Patch> {
        if self.is_composing() {
            log::debug!("Skipping coordinator pass during composition");
            return None;
        }

        let anchor = SelectionAnchor::capture(&self.surface);
        let now = self.clock.now_ms();
        self.snapshot = ContentSnapshot {
            content: self.surface.tree.to_markup(),
            timestamp: now,
        };
        self.version += 1;
        let restore_generation = self.restores.schedule(anchor);
        self.persist.arm(self.snapshot.clone(), now);

        log::debug!(
            "Coordinator pass v{} ({} bytes, restore #{restore_generation})",
            self.version,
            self.snapshot.content.len()
        );
        Some(Patch {
            version: self.version,
            restore_generation,
        })
    }

    // An explicit selection from the user supersedes any pending restore
    pub fn set_selection(&mut self, start: Position, end: Position) {
        self.restores.cancel();
        self.surface.set_selection(start, end);
    }

    pub fn set_caret(&mut self, at: Position) {
        self.restores.cancel();
        self.surface.set_caret(at);
    }

    pub fn select_all(&mut self) {
        self.restores.cancel();
        self.surface.select_all();
    }

    /// Delete the selected range if there is one and return the caret left
    /// behind. Without a usable selection the caret is the end of content.
    fn collapse_selection(&mut self) -> Option<Position> {
        let tree = &mut self.surface.tree;
        let at = match self.surface.selection.filter(|s| s.tree == tree.id()) {
            Some(selection) if selection.is_collapsed() => tree.normalize_position(selection.start),
            Some(selection) => tree.delete_range(selection.start, selection.end),
            None => None,
        };
        at.or_else(|| Some(tree.end_position()))
    }

    /// Type `text` over the selection.
    pub fn type_text(&mut self, text: &str) -> Option<Patch> {
        if text.is_empty() {
            return None;
        }
        let at = self.collapse_selection()?;
        let caret = self.surface.tree.insert_text(at, text)?;
        self.surface.set_caret(caret);
        self.on_mutated()
    }

    /// Backspace: deletes the selection, or one unit before the caret.
    pub fn delete_backward(&mut self) -> Option<Patch> {
        let selection = self.surface.local_selection()?;
        let caret = if selection.is_collapsed() {
            self.surface.tree.delete_backward(selection.start)?
        } else {
            self.surface
                .tree
                .delete_range(selection.start, selection.end)?
        };
        self.surface.set_caret(caret);
        self.on_mutated()
    }

    pub fn composition_start(&mut self) {
        self.restores.cancel();
        if let Some(at) = self.collapse_selection() {
            self.surface.set_caret(at);
            self.composition = Some(Composition { start: at, end: at });
        }
    }

    /// Replace the composed text with `text`. No pass runs.
    pub fn composition_update(&mut self, text: &str) {
        let Some(composition) = self.composition else {
            return;
        };
        let tree = &mut self.surface.tree;
        let Some(start) = tree.delete_range(composition.start, composition.end) else {
            log::warn!("Composition range went stale, dropping composed text");
            return;
        };
        let updated = if text.is_empty() {
            Composition { start, end: start }
        } else {
            let Some(end) = tree.insert_text(start, text) else {
                return;
            };
            let composed = text.chars().count();
            Composition {
                start: Position::new(end.node, end.offset - composed),
                end,
            }
        };
        self.composition = Some(updated);
        self.surface.set_caret(updated.end);
    }

    /// Commit `text` and close the composition. The coordinator pass runs on
    /// the next tick.
    pub fn composition_end(&mut self, text: &str) {
        if self.composition.is_none() {
            return;
        }
        self.composition_update(text);
        self.composition = None;
        self.finalize_pending = true;
    }

    /// Paste clipboard items at the selection. Images become widgets, plain
    /// text is typed, every other type is ignored. At most one pass runs.
    pub fn paste(&mut self, items: &[ClipboardItem]) -> PasteOutcome {
        let mut outcome = PasteOutcome::default();
        for item in items {
            if item.is_image() {
                match paste_image(&mut self.surface, item) {
                    Ok(id) => outcome.widgets.push(id),
                    Err(e) => {
                        log::warn!("Skipping pasted {} item: {e}", item.mime_type);
                        outcome.skipped += 1;
                    }
                }
            } else if item.mime_type == "text/plain" {
                let text = String::from_utf8_lossy(&item.data);
                if text.is_empty() {
                    continue;
                }
                if let Some(at) = self.collapse_selection()
                    && let Some(caret) = self.surface.tree.insert_text(at, &text)
                {
                    self.surface.set_caret(caret);
                    outcome.inserted_text = true;
                }
            } else {
                log::debug!("Ignoring pasted {} item", item.mime_type);
            }
        }

        if !outcome.widgets.is_empty() || outcome.inserted_text {
            outcome.patch = self.on_mutated();
        }
        outcome
    }

    /// The delete affordance of a widget
    pub fn delete_widget(&mut self, id: &WidgetId) -> Option<Patch> {
        if !remove_widget(&mut self.surface, id) {
            return None;
        }
        self.on_mutated()
    }

    /// Empty the draft after the user confirms.
    pub fn clear(&mut self, prompt: &mut dyn ConfirmPrompt) -> Option<Patch> {
        if !prompt.confirm(CLEAR_PROMPT) {
            return None;
        }
        self.composition = None;
        self.finalize_pending = false;
        self.surface.replace_tree(ContentTree::new());
        self.on_mutated()
    }

    /// Copy the snapshot markup and its plain-text rendering.
    pub fn copy(
        &self,
        clipboard: &mut dyn ClipboardWriter,
        notifier: &mut dyn Notifier,
    ) -> Option<CopyMethod> {
        copy_content(clipboard, notifier, &self.snapshot.content, &self.plain_text())
    }

    /// Run the deferred work due at this turn.
    pub fn tick(&mut self) -> TickReport {
        let restored = self
            .restores
            .take()
            .map(|pending| restore(&mut self.surface, pending.anchor.as_ref()));

        let pass = if std::mem::take(&mut self.finalize_pending) {
            self.on_mutated()
        } else {
            None
        };

        let saved = match self.persist.poll(self.clock.now_ms()) {
            Some(snapshot) => self.write(snapshot),
            None => false,
        };

        TickReport {
            restored,
            pass,
            saved,
        }
    }

    /// Write any pending snapshot now, ignoring the debounce delay.
    ///
    /// A failed write keeps the snapshot pending, so
    /// [`has_unsaved_changes`](Self::has_unsaved_changes) stays true and a
    /// later tick retries it.
    pub fn flush(&mut self) -> bool {
        match self.persist.take() {
            Some(snapshot) => self.write(snapshot),
            None => false,
        }
    }

    fn write(&mut self, snapshot: ContentSnapshot) -> bool {
        let draft = StoredDraft {
            content: snapshot.content.clone(),
            timestamp: snapshot.timestamp,
        };
        let result = draft
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.store
                    .set(&self.options.storage_key, &json)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save draft: {e}");
                self.persist.arm(snapshot, self.clock.now_ms());
                false
            }
        }
    }
}
