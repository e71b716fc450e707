/*!
 * # Editing Core
 *
 * The editable side of a draft: a surface holding the content tree and the
 * live selection, and the coordinator that keeps the canonical snapshot in
 * step with it.
 *
 * ## Architecture Overview
 *
 * ### 1. Explicit Editor Context
 * - All state lives in one [`Editor`] value the host owns. There is no
 *   global surface.
 * - Hosts feed discrete events into it: typing, composition, paste, widget
 *   deletion, clear and scheduler ticks.
 *
 * ### 2. Single Choke Point
 * - Every content change ends in [`Editor::on_mutated`].
 * - The snapshot it produces is always the serialization of the live tree.
 *
 * ### 3. Anchors Survive Foreign Mutations
 * - The selection is captured as a [`SelectionAnchor`] before each pass and
 *   restored on the next tick.
 * - Stale anchors are detected through the arena's never-reused ids and
 *   fall back to the end of the content.
 *
 * ### 4. Widgets Are Atomic
 * - Pasted images become widget leaves followed by a zero-width re-entry
 *   point. They are deleted as one unit.
 *
 * ## Module Structure
 *
 * - **`surface`**: `EditSurface` and `Selection`
 * - **`anchors`**: capture, validation and best-effort restore
 * - **`scheduler`**: restore queue, debouncer, clocks
 * - **`widgets`**: building and splicing image widgets
 * - **`coordinator`**: the `Editor` context
 * - **`patch`**: what one coordinator pass produced
 */

pub mod anchors;
pub mod coordinator;
pub mod patch;
pub mod scheduler;
pub mod surface;
pub mod widgets;

pub use anchors::{Restoration, SelectionAnchor, StaleAnchor, restore};
pub use coordinator::{ContentSnapshot, Editor, EditorOptions, PasteOutcome, TickReport};
pub use patch::Patch;
pub use scheduler::{Clock, Debouncer, ManualClock, RestoreQueue, SystemClock};
pub use surface::{EditSurface, Selection};
pub use widgets::{ClipboardItem, WidgetError};
