//! Knowledge-base record shapes.

use serde::{Deserialize, Serialize};

/// One knowledge-base entry describing a medical condition.
///
/// Immutable once loaded; the knowledge store owns every record for the
/// lifetime of the session. The four fields are required by the document
/// shape; nothing beyond presence is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    pub description: String,
    pub treatment: String,
    pub medications: String,
    /// Warning signs, in document order. Rendered as a bulleted list with
    /// order preserved.
    pub seek_attention: Vec<String>,
}

/// A named external reference, rendered in fallback responses.
///
/// The link is display-only; nothing in the application ever fetches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalLink {
    pub name: &'static str,
    pub url: &'static str,
}
