//! # Lexer - Tokenizing Snapshot Markup
//!
//! This module breaks markup into coarse tokens using the [Logos] lexer
//! generator. A whole start tag (name plus attributes) is a single token;
//! the [`tag`](crate::tag) module splits it up afterwards.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Input that does not
//! form a tag (a stray `<`, an unterminated `<div`) falls back to text:
//!
//! ```
//! use draftpad_markup::lexer::lex;
//!
//! let input = "a < b <p>c</p>";
//! let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->`
    #[regex(r"<!--([^-]|-[^-]|--[^>])*-->")]
    Comment,

    /// `<!DOCTYPE html>` and similar declarations
    #[regex(r"<![A-Za-z][^>]*>")]
    Declaration,

    /// `<name attr="value" ...>` or `<name ... />`
    #[regex(r#"<[A-Za-z][A-Za-z0-9:-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    StartTag,

    /// `</name>`
    #[regex(r"</[A-Za-z][A-Za-z0-9:-]*[ \t\r\n]*>")]
    EndTag,

    /// A `<` that does not begin a tag
    #[token("<")]
    Lt,

    /// Character data between tags
    #[regex(r"[^<]+")]
    Text,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Logos error means nothing matched at this position - treat as text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token { kind, text });
    }

    tokens
}
