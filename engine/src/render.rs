//! Response rendering: match outcome to typed display payload.

use mediq_types::{DisplayBlock, DisplayPayload, ExternalLink, sanitize_terminal_text};

use crate::matcher::MatchResult;

/// Trusted references offered when nothing matches. Display-only.
pub const EXTERNAL_LINKS: [ExternalLink; 4] = [
    ExternalLink {
        name: "WebMD.com",
        url: "https://www.webmd.com/",
    },
    ExternalLink {
        name: "MedlinePlus.gov",
        url: "https://medlineplus.gov/",
    },
    ExternalLink {
        name: "Drugs.com",
        url: "https://www.drugs.com/",
    },
    ExternalLink {
        name: "rxlist.com",
        url: "https://www.rxlist.com/",
    },
];

/// Convert a match outcome into a display payload. Pure.
///
/// `original_query` is only used for the fallback apology; it is sanitized
/// before it is echoed back.
#[must_use]
pub fn render(result: &MatchResult<'_>, original_query: &str) -> DisplayPayload {
    match result {
        MatchResult::Condition { record, .. } => DisplayPayload::new(vec![
            DisplayBlock::Emphasis(record.description.clone()),
            DisplayBlock::Labeled {
                label: "Treatment",
                text: record.treatment.clone(),
            },
            DisplayBlock::Labeled {
                label: "Common Medications",
                text: record.medications.clone(),
            },
            DisplayBlock::Bullets {
                heading: "When to Seek Medical Attention",
                items: record.seek_attention.clone(),
            },
        ]),
        MatchResult::Symptom(text) => DisplayPayload::paragraph(*text),
        MatchResult::NoMatch => {
            let query = sanitize_terminal_text(original_query);
            DisplayPayload::new(vec![
                DisplayBlock::Paragraph(format!(
                    "I don't have specific information for \"{query}\"."
                )),
                DisplayBlock::Links {
                    heading: "You can try these trusted resources",
                    links: EXTERNAL_LINKS.to_vec(),
                },
            ])
        }
    }
}
