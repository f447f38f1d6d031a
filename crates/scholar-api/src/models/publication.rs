//! Raw publication model as produced by the search capability.

use serde::{Deserialize, Serialize};

/// A publication as returned by the upstream search.
///
/// Every field is optional; the handler substitutes fallbacks when mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPublication {
    /// Bibliographic group (title, authors, year).
    #[serde(default)]
    pub bib: Bib,

    /// Publication URL.
    #[serde(default)]
    pub pub_url: Option<String>,

    /// Number of citations.
    #[serde(default)]
    pub num_citations: Option<u64>,
}

/// Bibliographic fields of a publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bib {
    /// Publication title.
    #[serde(default)]
    pub title: Option<String>,

    /// Author or authors.
    #[serde(default)]
    pub author: Option<Authors>,

    /// Publication year.
    #[serde(default)]
    pub pub_year: Option<PubYear>,
}

/// Authors are either a single display string or a list of names.
///
/// The shape is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    /// Single string, e.g. `"A Vaswani and N Shazeer"`.
    Single(String),
    /// One entry per author.
    List(Vec<String>),
}

impl From<&str> for Authors {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for Authors {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Publication year, either numeric or free text such as `"NA"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PubYear {
    /// Numeric year.
    Number(i64),
    /// Textual year.
    Text(String),
}

impl From<i64> for PubYear {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PubYear {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
