//! # Parser Events
//!
//! The parser does not build a tree. It emits a **flat, balanced sequence**
//! of events that a consumer (the engine's content sink) turns into whatever
//! tree it owns:
//!
//! ```text
//! <p>one<br>two</p>
//!
//! Start(p)
//!   Text("one")
//!   Start(br)
//!   Finish          ← void elements finish immediately
//!   Text("two")
//! Finish
//! ```
//!
//! Every `Start` is matched by exactly one `Finish`, whatever the input
//! looked like.

use crate::tag::Attribute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open an element.
    Start {
        name: String,
        attributes: Vec<Attribute>,
    },

    /// Character data with references already decoded. Consecutive text is
    /// always merged into one event.
    Text(String),

    /// Close the most recently opened element.
    Finish,
}

impl Event {
    /// Create a start event with no attributes.
    pub fn start(name: &str) -> Self {
        Event::Start {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn text(text: &str) -> Self {
        Event::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_start_creation() {
        assert_eq!(
            Event::start("p"),
            Event::Start {
                name: "p".to_string(),
                attributes: vec![]
            }
        );
    }
}
