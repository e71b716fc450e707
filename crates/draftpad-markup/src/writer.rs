//! Serializing markup.
//!
//! [`MarkupWriter`] is the inverse of [`parse`](crate::parse): feeding the
//! events of a parse back through it reproduces equivalent markup, with text
//! and attribute values escaped.

use crate::is_void_element;
use crate::tag::Attribute;

#[derive(Debug, Default)]
pub struct MarkupWriter {
    out: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `<name attr="value" ...>`.
    pub fn open<'a, I>(&mut self, name: &str, attributes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attributes {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            html_escape::encode_double_quoted_attribute_to_string(value, &mut self.out);
            self.out.push('"');
        }
        self.out.push('>');
    }

    /// Write `</name>`, or nothing for void elements.
    pub fn close(&mut self, name: &str) {
        if is_void_element(name) {
            return;
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    pub fn text(&mut self, text: &str) {
        html_escape::encode_text_to_string(text, &mut self.out);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Borrow an attribute list in the shape [`MarkupWriter::open`] takes.
pub fn attribute_pairs(attributes: &[Attribute]) -> impl Iterator<Item = (&str, &str)> {
    attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, parse};
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_text_and_attributes() {
        let mut writer = MarkupWriter::new();
        writer.open("span", [("title", "say \"hi\" & <go>")]);
        writer.text("1 < 2 & 3");
        writer.close("span");

        let out = writer.finish();
        assert!(out.starts_with("<span title=\""));
        assert!(out.contains("&quot;hi&quot;"));
        assert!(out.ends_with(">1 &lt; 2 &amp; 3</span>"));
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let mut writer = MarkupWriter::new();
        writer.open("br", []);
        writer.close("br");
        assert_eq!(writer.finish(), "<br>");
    }

    #[test]
    fn reparsing_written_markup_gives_the_same_events() {
        let events = parse(r#"<p class="a&amp;b">x &lt; y<br>z</p>"#);

        let mut writer = MarkupWriter::new();
        let mut open = Vec::new();
        for event in &events {
            match event {
                Event::Start { name, attributes } => {
                    writer.open(name, attribute_pairs(attributes));
                    open.push(name.clone());
                }
                Event::Text(text) => writer.text(text),
                Event::Finish => {
                    if let Some(name) = open.pop() {
                        writer.close(&name);
                    }
                }
            }
        }

        assert_eq!(parse(&writer.finish()), events);
    }
}
