//! Splitting a start-tag token into its name and attributes.

use std::borrow::Cow;

/// A single `name="value"` pair on an element. Names are lowercased and
/// values have their character references decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<name ... />`
    pub self_closing: bool,
}

/// Parse the text of a [`TokenKind::StartTag`](crate::lexer::TokenKind::StartTag) token.
///
/// The lexer guarantees the token starts with `<` followed by a letter and
/// ends with `>`, so this never fails; malformed attribute soup is read as
/// well as it can be.
pub fn parse_start_tag(token: &str) -> StartTag {
    let inner = token
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(token);
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    let mut attributes = Vec::new();
    let mut rest = &inner[name_end..];

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let key_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw, remaining) = split_value(after_eq);
            rest = remaining;
            decode(raw).into_owned()
        } else {
            String::new()
        };

        if !key.is_empty() && !attributes.iter().any(|a: &Attribute| a.name == key) {
            attributes.push(Attribute { name: key, value });
        }
    }

    StartTag {
        name,
        attributes,
        self_closing,
    }
}

/// Read the tag name out of an end-tag token such as `</span >`.
pub fn parse_end_tag(token: &str) -> String {
    token
        .trim_start_matches("</")
        .trim_end_matches('>')
        .trim_end()
        .to_ascii_lowercase()
}

/// Split a (possibly quoted) attribute value from the remaining input.
fn split_value(input: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(body) = input.strip_prefix(quote) {
            return match body.find(quote) {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            };
        }
    }
    let end = input
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn decode(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}
