//! Scholar API
//!
//! A small HTTP service that looks up a research field on Google Scholar and
//! returns the top five publications as JSON.
//!
//! # Features
//!
//! - **One route**: `GET /api/scholar?field=<text>`
//! - **Lazy upstream**: results are streamed page by page and never more than
//!   five are pulled
//! - **Pluggable search**: the handler talks to a [`SearchCapability`], so tests
//!   and alternative backends can stand in for Google Scholar
//!
//! # Example
//!
//! ```no_run
//! use scholar_api::{Config, GoogleScholarClient, ScholarServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = GoogleScholarClient::new(config)?;
//!
//!     ScholarServer::with_client(client).run_http(([127, 0, 0, 1], 5001).into()).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod papers;
pub mod server;

pub use client::{GoogleScholarClient, PublicationStream, SearchCapability};
pub use config::Config;
pub use error::{ApiError, ClientError};
pub use server::ScholarServer;
