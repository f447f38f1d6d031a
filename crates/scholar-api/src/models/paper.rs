//! Paper record returned by the HTTP endpoint.

use serde::{Deserialize, Serialize};

use super::{Authors, PubYear, RawPublication};

/// Fallback title.
pub const NO_TITLE: &str = "No title";

/// Fallback for both authors and year.
pub const UNKNOWN: &str = "Unknown";

/// Fallback link.
pub const NO_LINK: &str = "No link";

/// Five-field normalized publication record.
///
/// Every field is always present; missing upstream data is replaced by a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Title, or `"No title"`.
    pub title: String,

    /// Authors in their upstream shape, or `"Unknown"`.
    pub authors: Authors,

    /// Publication year in its upstream shape, or `"Unknown"`.
    pub year: PubYear,

    /// Publication URL, or `"No link"`.
    pub link: String,

    /// Citation count, or 0.
    pub citations: u64,
}

impl From<RawPublication> for PaperRecord {
    fn from(raw: RawPublication) -> Self {
        Self {
            title: raw.bib.title.unwrap_or_else(|| NO_TITLE.to_string()),
            authors: raw.bib.author.unwrap_or_else(|| Authors::from(UNKNOWN)),
            year: raw.bib.pub_year.unwrap_or_else(|| PubYear::from(UNKNOWN)),
            link: raw.pub_url.unwrap_or_else(|| NO_LINK.to_string()),
            citations: raw.num_citations.unwrap_or(0),
        }
    }
}

/// Response body for a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PapersResponse {
    /// Up to five records in upstream order.
    pub papers: Vec<PaperRecord>,
}
