//! Typed display payload.
//!
//! Responses are modeled as ordered blocks instead of markup strings. The
//! engine produces payloads; materializing them into terminal text is the
//! frontend's job. User-supplied text is sanitized before it enters a block,
//! so a payload is always safe to hand to a renderer as-is.

use crate::ExternalLink;

/// One visual block of an assistant (or user) message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    /// Plain paragraph text.
    Paragraph(String),
    /// Emphasized lead line, e.g. a condition description.
    Emphasis(String),
    /// A labeled line: `label: text`.
    Labeled { label: &'static str, text: String },
    /// A headed bullet list, order preserved.
    Bullets { heading: &'static str, items: Vec<String> },
    /// A headed list of external references.
    Links {
        heading: &'static str,
        links: Vec<ExternalLink>,
    },
}

/// An ordered sequence of display blocks making up one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayPayload {
    blocks: Vec<DisplayBlock>,
}

impl DisplayPayload {
    #[must_use]
    pub fn new(blocks: Vec<DisplayBlock>) -> Self {
        Self { blocks }
    }

    /// A payload consisting of a single paragraph.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![DisplayBlock::Paragraph(text.into())],
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[DisplayBlock] {
        &self.blocks
    }

    /// Flatten the payload to plain text, one line per paragraph/list item.
    ///
    /// Used by tests and by contexts that cannot render structure (log
    /// output). The frontend renders blocks directly and does not use this.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            match block {
                DisplayBlock::Paragraph(text) | DisplayBlock::Emphasis(text) => {
                    out.push_str(text);
                }
                DisplayBlock::Labeled { label, text } => {
                    out.push_str(label);
                    out.push_str(": ");
                    out.push_str(text);
                }
                DisplayBlock::Bullets { heading, items } => {
                    out.push_str(heading);
                    for item in items {
                        out.push_str("\n- ");
                        out.push_str(item);
                    }
                }
                DisplayBlock::Links { heading, links } => {
                    out.push_str(heading);
                    for link in links {
                        out.push_str("\n- ");
                        out.push_str(link.name);
                        out.push_str(" (");
                        out.push_str(link.url);
                        out.push(')');
                    }
                }
            }
        }
        out
    }
}
