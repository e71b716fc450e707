//! Serializing a [`ContentTree`] back to snapshot markup and to plain text.

use draftpad_markup::{MarkupWriter, attribute_pairs};

use crate::content::widget::{DELETE_CLASS, WIDGET_CLASS, WIDGET_ID_ATTRIBUTE};
use crate::content::{ContentTree, ImageWidget, NodeId, NodeKind, ZERO_WIDTH_SPACE, is_block_element};

impl ContentTree {
    /// Serialize the tree to markup. Parsing the result yields an equivalent
    /// tree (same structure, widgets and text).
    pub fn to_markup(&self) -> String {
        let mut writer = MarkupWriter::new();
        for &child in self.children(self.root()) {
            self.write_node(&mut writer, child);
        }
        writer.finish()
    }

    fn write_node(&self, writer: &mut MarkupWriter, id: NodeId) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => writer.text(text),
            Some(NodeKind::Widget(widget)) => write_widget(writer, widget),
            Some(NodeKind::Element { tag, attributes }) => {
                writer.open(tag, attribute_pairs(attributes));
                for &child in self.children(id) {
                    self.write_node(writer, child);
                }
                writer.close(tag);
            }
            Some(NodeKind::Root) | None => {}
        }
    }

    /// Plain-text rendering used as the clipboard fallback.
    ///
    /// Block elements and `<br>` become line breaks, widgets and zero-width
    /// placeholders are dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out, self.root());
        out.trim_end_matches('\n').to_string()
    }

    fn push_plain(&self, out: &mut String, id: NodeId) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => {
                out.extend(text.chars().filter(|&c| c != ZERO_WIDTH_SPACE));
            }
            Some(NodeKind::Element { tag, .. }) if tag == "br" => out.push('\n'),
            Some(NodeKind::Element { tag, .. }) if is_block_element(tag) => {
                break_line(out);
                for &child in self.children(id) {
                    self.push_plain(out, child);
                }
                break_line(out);
            }
            Some(NodeKind::Root | NodeKind::Element { .. }) => {
                for &child in self.children(id) {
                    self.push_plain(out, child);
                }
            }
            Some(NodeKind::Widget(_)) | None => {}
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn write_widget(writer: &mut MarkupWriter, widget: &ImageWidget) {
    writer.open(
        "span",
        [
            ("class", WIDGET_CLASS),
            ("contenteditable", "false"),
            (WIDGET_ID_ATTRIBUTE, widget.id.as_str()),
        ],
    );
    let width = widget.width.to_string();
    let height = widget.height.to_string();
    writer.open(
        "img",
        [
            ("src", widget.src.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ],
    );
    writer.close("img");
    writer.open("button", [("class", DELETE_CLASS), ("type", "button")]);
    writer.text("×");
    writer.close("button");
    writer.close("span");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::WidgetId;
    use pretty_assertions::assert_eq;

    fn tree_with_widget() -> ContentTree {
        let mut tree = ContentTree::new();
        let root = tree.root();
        tree.append(root, NodeKind::text("before "));
        tree.append(
            root,
            NodeKind::Widget(ImageWidget {
                id: WidgetId::from("img-7"),
                src: "data:image/png;base64,AAAA".to_string(),
                width: 30,
                height: 20,
            }),
        );
        tree.append(root, NodeKind::text("\u{200B} after"));
        tree
    }

    #[test]
    fn widget_markup_has_wrapper_image_and_delete_button() {
        let markup = tree_with_widget().to_markup();
        assert_eq!(
            markup,
            concat!(
                "before ",
                r#"<span class="image-widget" contenteditable="false" data-widget-id="img-7">"#,
                r#"<img src="data:image/png;base64,AAAA" width="30" height="20">"#,
                r#"<button class="image-delete" type="button">×</button></span>"#,
                "\u{200B} after",
            )
        );
    }

    #[test]
    fn markup_reparses_to_equivalent_tree() {
        let tree = tree_with_widget();
        let reparsed = ContentTree::parse(&tree.to_markup());
        assert_eq!(reparsed.to_markup(), tree.to_markup());
        assert_eq!(reparsed.widgets()[0].1, tree.widgets()[0].1);
    }

    #[test]
    fn text_is_escaped() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        tree.append(root, NodeKind::text("a <b> & c"));
        let markup = tree.to_markup();
        assert!(!markup.contains("<b>"));
        assert_eq!(ContentTree::parse(&markup).text_content(root), "a <b> & c");
    }

    #[test]
    fn plain_text_breaks_blocks_and_drops_widgets() {
        let tree = ContentTree::parse("<div>one</div><div>two<br>three</div>");
        assert_eq!(tree.plain_text(), "one\ntwo\nthree");

        assert_eq!(tree_with_widget().plain_text(), "before  after");
    }
}
