//! # Parser - Balancing Token Streams into Events
//!
//! Content snapshots come from an editing surface, so the parser cannot
//! assume well-formed input. It is tolerant in the same way browsers are for
//! the small subset of markup a draft contains:
//!
//! - **Void elements** (`img`, `br`, `hr`, ...) never take children; they
//!   are finished immediately even without a `/>`.
//! - **Unmatched end tags** are ignored.
//! - **Misnested end tags** close every element opened after the matching
//!   one, innermost first.
//! - **Unclosed elements** are finished at end of input.
//! - **Comments and declarations** are dropped.
//!
//! The result is always a balanced [`Event`] sequence.
//!
//! ```
//! use draftpad_markup::{parse, Event};
//!
//! let events = parse("<b>bold<i>both</b>");
//! assert_eq!(events.last(), Some(&Event::Finish));
//! ```

pub mod event;

use crate::is_void_element;
use crate::lexer::{TokenKind, lex};
use crate::tag::{parse_end_tag, parse_start_tag};
use event::Event;

/// Parse markup into a balanced event sequence.
pub fn parse(input: &str) -> Vec<Event> {
    let mut parser = Parser::default();

    for token in lex(input) {
        match token.kind {
            TokenKind::StartTag => {
                let tag = parse_start_tag(token.text);
                let void = is_void_element(&tag.name);
                parser.events.push(Event::Start {
                    name: tag.name.clone(),
                    attributes: tag.attributes,
                });
                if void || tag.self_closing {
                    parser.events.push(Event::Finish);
                } else {
                    parser.open.push(tag.name);
                }
            }
            TokenKind::EndTag => parser.close(&parse_end_tag(token.text)),
            TokenKind::Text => {
                parser.text(&html_escape::decode_html_entities(token.text));
            }
            TokenKind::Lt => parser.text("<"),
            TokenKind::Comment | TokenKind::Declaration => {}
        }
    }

    parser.finish()
}

#[derive(Default)]
struct Parser {
    events: Vec<Event>,
    /// Names of the currently open elements, outermost first
    open: Vec<String>,
}

impl Parser {
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Event::Text(previous)) = self.events.last_mut() {
            previous.push_str(text);
        } else {
            self.events.push(Event::Text(text.to_string()));
        }
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.open.iter().rposition(|open| open == name) else {
            return;
        };
        for _ in depth..self.open.len() {
            self.events.push(Event::Finish);
        }
        self.open.truncate(depth);
    }

    fn finish(mut self) -> Vec<Event> {
        for _ in 0..self.open.len() {
            self.events.push(Event::Finish);
        }
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Attribute;
    use pretty_assertions::assert_eq;

    fn start_with(name: &str, attributes: &[(&str, &str)]) -> Event {
        Event::Start {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute::new(*k, *v))
                .collect(),
        }
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse(""), vec![]);
    }

    #[test]
    fn parse_plain_text_decodes_entities() {
        assert_eq!(parse("a &lt; b &amp; c"), vec![Event::text("a < b & c")]);
    }

    #[test]
    fn parse_void_element_finishes_immediately() {
        assert_eq!(
            parse("one<br>two"),
            vec![
                Event::text("one"),
                Event::start("br"),
                Event::Finish,
                Event::text("two"),
            ]
        );
    }

    #[test]
    fn parse_nested_elements() {
        assert_eq!(
            parse(r#"<div class="x"><p>hi</p></div>"#),
            vec![
                start_with("div", &[("class", "x")]),
                Event::start("p"),
                Event::text("hi"),
                Event::Finish,
                Event::Finish,
            ]
        );
    }

    #[test]
    fn parse_ignores_unmatched_end_tag() {
        assert_eq!(parse("a</p>b"), vec![Event::text("ab")]);
    }

    #[test]
    fn parse_misnested_end_tag_closes_inner_elements() {
        assert_eq!(
            parse("<b>1<i>2</b>3"),
            vec![
                Event::start("b"),
                Event::text("1"),
                Event::start("i"),
                Event::text("2"),
                Event::Finish,
                Event::Finish,
                Event::text("3"),
            ]
        );
    }

    #[test]
    fn parse_closes_unclosed_elements_at_end() {
        assert_eq!(
            parse("<div><span>x"),
            vec![
                Event::start("div"),
                Event::start("span"),
                Event::text("x"),
                Event::Finish,
                Event::Finish,
            ]
        );
    }

    #[test]
    fn parse_drops_comments_and_merges_text_around_them() {
        assert_eq!(parse("a<!-- c -->b"), vec![Event::text("ab")]);
    }

    #[test]
    fn parse_stray_lt_is_text() {
        assert_eq!(parse("1 < 2"), vec![Event::text("1 < 2")]);
    }

    #[test]
    fn parse_self_closing_non_void_element() {
        assert_eq!(
            parse("<span/>x"),
            vec![Event::start("span"), Event::Finish, Event::text("x")]
        );
    }
}
