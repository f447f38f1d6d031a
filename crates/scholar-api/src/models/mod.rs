//! Data models for upstream publications and the records served to callers.
//!
//! Upstream models use `#[serde(default)]` for every field so partial
//! results deserialize cleanly.

mod paper;
mod publication;

pub use paper::{NO_LINK, NO_TITLE, PaperRecord, PapersResponse, UNKNOWN};
pub use publication::{Authors, Bib, PubYear, RawPublication};
