/// A strictly structured document: paragraphs in order, each holding either
/// text runs or exactly one image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortableDocument {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    Text(Vec<TextRun>),
    Image(SizedImage),
}

impl Paragraph {
    /// A paragraph with a single run of `text`
    pub fn text(text: impl Into<String>) -> Self {
        Paragraph::Text(vec![TextRun { text: text.into() }])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
}

/// Image bytes ready to embed, with their export size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedImage {
    /// PNG-encoded image data
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}
