//! Inline image widgets: building one from a pasted image and splicing it
//! into the content at the selection.

use std::io::Cursor;

use base64::Engine;
use image::ImageReader;

use crate::content::{ImageWidget, NodeKind, Position, WidgetId, ZERO_WIDTH_SPACE};
use crate::editing::anchors::SelectionAnchor;
use crate::editing::surface::EditSurface;

/// One entry of a paste payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("clipboard item is not an image: {0}")]
    NotAnImage(String),
    #[error("unrecognised image data")]
    UnknownFormat,
    #[error("could not read image header: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not read image data: {0}")]
    Io(#[from] std::io::Error),
    #[error("widget could not be inserted at the selection")]
    NotInserted,
}

/// Natural pixel size of encoded image bytes.
pub fn decode_dimensions(data: &[u8]) -> Result<(u32, u32), WidgetError> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(WidgetError::UnknownFormat);
    }
    Ok(reader.into_dimensions()?)
}

/// Build a widget for a pasted image item with a fresh id.
pub fn build_widget(item: &ClipboardItem) -> Result<ImageWidget, WidgetError> {
    if !item.is_image() {
        return Err(WidgetError::NotAnImage(item.mime_type.clone()));
    }
    let (width, height) = decode_dimensions(&item.data)?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&item.data);
    Ok(ImageWidget {
        id: WidgetId::generate(),
        src: format!("data:{};base64,{payload}", item.mime_type),
        width,
        height,
    })
}

/// Splice `widget` into the content.
///
/// A valid `anchor` first has its selected range deleted and the widget goes
/// where that range started. Without a usable anchor the widget is appended
/// at the end. The widget is followed by a zero-width space and a space, and
/// the caret is left after both.
pub fn insert_widget(
    surface: &mut EditSurface,
    anchor: Option<&SelectionAnchor>,
    widget: ImageWidget,
) -> Option<Position> {
    let tree = &mut surface.tree;
    let at = match anchor.filter(|anchor| anchor.validate(tree).is_ok()) {
        Some(anchor) => tree.delete_range(anchor.start, anchor.end)?,
        None => tree.end_position(),
    };

    let (parent, index) = match tree.text(at.node).map(|text| text.chars().count()) {
        Some(_) if at.offset == 0 => (tree.parent(at.node)?, tree.index_in_parent(at.node)?),
        Some(len) if at.offset >= len => {
            (tree.parent(at.node)?, tree.index_in_parent(at.node)? + 1)
        }
        Some(_) => {
            tree.split_text(at.node, at.offset)?;
            (tree.parent(at.node)?, tree.index_in_parent(at.node)? + 1)
        }
        None => (at.node, at.offset),
    };

    tree.insert(parent, index, NodeKind::Widget(widget))?;
    let sentinel = tree.insert(parent, index + 1, NodeKind::Text(format!("{ZERO_WIDTH_SPACE} ")))?;

    let caret = Position::new(sentinel, 2);
    surface.set_caret(caret);
    Some(caret)
}

/// Decode a pasted image and insert it at the live selection.
pub fn paste_image(surface: &mut EditSurface, item: &ClipboardItem) -> Result<WidgetId, WidgetError> {
    let widget = build_widget(item)?;
    let id = widget.id.clone();
    let anchor = SelectionAnchor::capture(surface);
    insert_widget(surface, anchor.as_ref(), widget).ok_or(WidgetError::NotInserted)?;
    Ok(id)
}

/// Remove exactly the widget node with `id`. Surrounding text, sentinels
/// included, is left alone.
pub fn remove_widget(surface: &mut EditSurface, id: &WidgetId) -> bool {
    match surface.tree.find_widget(id) {
        Some(node) => surface.tree.remove(node),
        None => false,
    }
}
