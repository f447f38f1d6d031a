//! Fuzzing library for scholar-api.
//!
//! Targets the two places untrusted upstream data enters the crate: Scholar
//! results-page HTML and publication JSON.
//!
//! # Usage
//!
//! ```bash
//! cd crates/scholar-fuzz
//! cargo +nightly fuzz run fuzz_results_page -- -max_total_time=60
//! ```

pub use scholar_api::client::parse;
pub use scholar_api::models;
