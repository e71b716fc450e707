use uuid::Uuid;

/// Class marking the wrapper element of an inline image widget in markup.
pub const WIDGET_CLASS: &str = "image-widget";
/// Class of the delete affordance inside a widget.
pub const DELETE_CLASS: &str = "image-delete";
/// Attribute carrying the widget id.
pub const WIDGET_ID_ATTRIBUTE: &str = "data-widget-id";

/// Unique identifier of an inline image widget.
///
/// Generated from a UUIDv7, so ids are time-ordered with a random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn generate() -> Self {
        Self(format!("img-{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One pasted image, embedded as an atomic leaf of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageWidget {
    pub id: WidgetId,
    /// Self-contained `data:` URI holding the image bytes
    pub src: String,
    /// Natural pixel width (0 when unknown)
    pub width: u32,
    /// Natural pixel height (0 when unknown)
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let ids: HashSet<WidgetId> = (0..1000).map(|_| WidgetId::generate()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.as_str().starts_with("img-")));
    }
}
