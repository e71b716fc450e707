//! # draftpad-markup
//!
//! A small, tolerant reader and writer for the markup that draftpad stores as
//! its content snapshot: text mixed with a handful of elements (`p`, `div`,
//! `br`, `span`, `img`, ...) and inline image widgets.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → (engine sink) → ContentTree
//!               (Logos)         (balancing)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! [Logos] splits input into start tags, end tags, comments, declarations
//! and text. Nothing is discarded at this stage.
//!
//! ### 2. Tag splitting ([`tag`] module)
//!
//! Start-tag tokens are split into a lowercased name and decoded attributes.
//!
//! ### 3. Parser ([`parser`] module)
//!
//! The parser balances the token stream and emits a flat sequence of
//! [`Event`]s. Malformed input still produces a balanced sequence.
//!
//! ### 4. Writer ([`writer`] module)
//!
//! [`MarkupWriter`] serializes back to markup with escaping.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Quick Start
//!
//! ```
//! use draftpad_markup::{parse, Event};
//!
//! let events = parse("hello<br>world");
//! assert_eq!(events[0], Event::Text("hello".to_string()));
//! assert_eq!(events.len(), 4);
//! ```

pub mod lexer;
pub mod parser;
pub mod tag;
pub mod writer;

pub use parser::event::Event;
pub use parser::parse;
pub use tag::Attribute;
pub use writer::{MarkupWriter, attribute_pairs};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}
