//! Sink for converting markup events into a [`ContentTree`].

use draftpad_markup::{Attribute, Event};

use crate::content::widget::{WIDGET_CLASS, WIDGET_ID_ATTRIBUTE};
use crate::content::{ContentTree, ImageWidget, NodeId, NodeKind, WidgetId};

/// Build a tree from a balanced event sequence.
///
/// Widget wrappers (`<span class="image-widget">` containing an `<img>`) are
/// collapsed into single [`NodeKind::Widget`] leaves once the generic tree
/// has been built.
pub fn build(events: Vec<Event>) -> ContentTree {
    let mut tree = ContentTree::new();
    let mut open = vec![tree.root()];

    for event in events {
        let Some(&parent) = open.last() else {
            break;
        };
        match event {
            Event::Start { name, attributes } => {
                let kind = NodeKind::Element {
                    tag: name,
                    attributes,
                };
                if let Some(id) = tree.append(parent, kind) {
                    open.push(id);
                }
            }
            Event::Text(text) => {
                tree.append(parent, NodeKind::Text(text));
            }
            Event::Finish => {
                // The root is never popped
                if open.len() > 1 {
                    open.pop();
                }
            }
        }
    }

    collapse_widgets(&mut tree);
    tree
}

fn collapse_widgets(tree: &mut ContentTree) {
    let candidates: Vec<NodeId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| is_widget_wrapper(tree, id))
        .collect();

    for wrapper in candidates {
        // A nested wrapper may already have been dropped with its outer one
        if !tree.contains(wrapper) {
            continue;
        }
        let Some(widget) = widget_from_wrapper(tree, wrapper) else {
            continue;
        };
        tree.clear_children(wrapper);
        if let Some(node) = tree.kind_mut(wrapper) {
            *node = NodeKind::Widget(widget);
        }
    }
}

fn is_widget_wrapper(tree: &ContentTree, id: NodeId) -> bool {
    match tree.kind(id) {
        Some(NodeKind::Element { attributes, .. }) => attribute(attributes, "class")
            .is_some_and(|class| class.split_ascii_whitespace().any(|c| c == WIDGET_CLASS)),
        _ => false,
    }
}

fn widget_from_wrapper(tree: &ContentTree, wrapper: NodeId) -> Option<ImageWidget> {
    let NodeKind::Element {
        attributes: wrapper_attributes,
        ..
    } = tree.kind(wrapper)?
    else {
        return None;
    };

    let img_attributes = tree
        .descendants(wrapper)
        .into_iter()
        .find_map(|id| match tree.kind(id) {
            Some(NodeKind::Element { tag, attributes }) if tag == "img" => Some(attributes),
            _ => None,
        })?;

    let id = attribute(wrapper_attributes, WIDGET_ID_ATTRIBUTE)
        .filter(|id| !id.is_empty())
        .map(WidgetId::from)
        .unwrap_or_else(WidgetId::generate);

    Some(ImageWidget {
        id,
        src: attribute(img_attributes, "src").unwrap_or_default().to_string(),
        width: dimension(img_attributes, "width"),
        height: dimension(img_attributes, "height"),
    })
}

pub(crate) fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}

/// Read a pixel dimension attribute, accepting a trailing `px`. Missing or
/// malformed values read as 0.
pub(crate) fn dimension(attributes: &[Attribute], name: &str) -> u32 {
    attribute(attributes, name)
        .map(|value| value.trim().trim_end_matches("px"))
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WIDGET: &str = concat!(
        r#"<span class="image-widget" contenteditable="false" data-widget-id="img-1">"#,
        r#"<img src="data:image/png;base64,AAAA" width="120" height="80">"#,
        r#"<button class="image-delete" type="button">×</button></span>"#,
    );

    #[test]
    fn builds_nested_elements_and_text() {
        let tree = ContentTree::parse("<div>one<br>two</div>");
        let root = tree.root();
        let div = tree.children(root)[0];
        assert!(matches!(tree.kind(div), Some(NodeKind::Element { tag, .. }) if tag == "div"));
        assert_eq!(tree.children(div).len(), 3);
        assert_eq!(tree.text(tree.children(div)[2]), Some("two"));
    }

    #[test]
    fn collapses_widget_wrapper_into_leaf() {
        let tree = ContentTree::parse(&format!("a{WIDGET}b"));
        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 3);

        let widget = tree.widget(children[1]).unwrap();
        assert_eq!(widget.id, WidgetId::from("img-1"));
        assert_eq!(widget.src, "data:image/png;base64,AAAA");
        assert_eq!((widget.width, widget.height), (120, 80));
        assert!(tree.children(children[1]).is_empty());
    }

    #[test]
    fn wrapper_without_image_stays_an_element() {
        let tree = ContentTree::parse(r#"<span class="image-widget">text</span>"#);
        let span = tree.children(tree.root())[0];
        assert!(matches!(tree.kind(span), Some(NodeKind::Element { .. })));
        assert_eq!(tree.text_content(span), "text");
    }

    #[test]
    fn wrapper_without_id_gets_a_generated_one() {
        let tree = ContentTree::parse(r#"<span class="image-widget"><img src="x"></span>"#);
        let (_, widget) = tree.widgets()[0];
        assert!(widget.id.as_str().starts_with("img-"));
        assert_eq!((widget.width, widget.height), (0, 0));
    }

    #[test]
    fn dimension_accepts_px_suffix() {
        let attributes = vec![Attribute::new("width", "300px"), Attribute::new("height", "x")];
        assert_eq!(dimension(&attributes, "width"), 300);
        assert_eq!(dimension(&attributes, "height"), 0);
        assert_eq!(dimension(&attributes, "missing"), 0);
    }
}
