//! Upstream academic search.
//!
//! [`SearchCapability`] is the seam between the HTTP handler and whatever
//! performs the lookup. [`GoogleScholarClient`] is the shipped implementation:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Fixed delay before each results-page request
//! - Lazy pagination: later pages are only fetched when the stream is polled

mod middleware;
pub mod parse;

use std::pin::Pin;
use std::time::Duration;

use async_stream::try_stream;
use futures::Stream;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::RawPublication;

pub use parse::{ResultsPage, parse_results_page};

/// Lazy, finite-or-unbounded sequence of publications for one search.
pub type PublicationStream = Pin<Box<dyn Stream<Item = ClientResult<RawPublication>> + Send>>;

/// Something that can search for publications by free-text query.
#[async_trait::async_trait]
pub trait SearchCapability: Send + Sync {
    /// Start a search.
    ///
    /// Errors raised while starting the search are returned here; errors while
    /// iterating are yielded by the stream.
    async fn search_pubs(&self, query: &str) -> ClientResult<PublicationStream>;
}

/// Google Scholar HTML client.
#[derive(Clone)]
pub struct GoogleScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Scholar base URL, also used to resolve relative links.
    base_url: Url,

    /// Results endpoint.
    search_url: Url,

    /// Interface language (`hl`).
    language: String,

    /// Delay before each page request.
    page_delay: Duration,
}

impl GoogleScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = middleware::build_http_client(&config)?;
        let base_url = Url::parse(&config.scholar_url)?;
        let search_url = Url::parse(&format!("{}/scholar", config.scholar_url))?;

        Ok(Self {
            client,
            base_url,
            search_url,
            language: config.language,
            page_delay: config.page_delay,
        })
    }

    /// Scholar base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the results URL for `query` starting at result offset `start`.
    #[must_use]
    pub fn results_url(&self, query: &str, start: usize) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("hl", &self.language);
            pairs.append_pair("q", query);
            pairs.append_pair("as_sdt", "0,5");
            if start > 0 {
                pairs.append_pair("start", &start.to_string());
            }
        }
        url
    }

    /// Fetch and parse one results page.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, a block page,
    /// or unrecognized markup.
    pub async fn fetch_page(&self, query: &str, start: usize) -> ClientResult<ResultsPage> {
        tokio::time::sleep(self.page_delay).await;

        let url = self.results_url(query, start);
        tracing::debug!(%url, start, "Fetching Scholar results page");

        let response = self.client.get(url).send().await?;
        let response = self.handle_response(response).await?;

        if response.url().path().starts_with("/sorry") {
            return Err(ClientError::blocked("redirected to unusual-traffic interstitial"));
        }

        let body = response.text().await?;
        let page = parse_results_page(&body, &self.base_url)?;

        tracing::debug!(count = page.publications.len(), has_next = page.has_next, "Parsed results page");
        Ok(page)
    }

    /// Handle upstream response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            403 => Err(ClientError::blocked(format!("status {status}"))),
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

#[async_trait::async_trait]
impl SearchCapability for GoogleScholarClient {
    async fn search_pubs(&self, query: &str) -> ClientResult<PublicationStream> {
        let first = self.fetch_page(query, 0).await?;
        Ok(Box::pin(paginate(self.clone(), query.to_string(), first)))
    }
}

/// Yield the buffered page, then fetch following pages on demand.
fn paginate(
    client: GoogleScholarClient,
    query: String,
    first: ResultsPage,
) -> impl Stream<Item = ClientResult<RawPublication>> + Send {
    try_stream! {
        let mut page = first;
        let mut start = 0;

        loop {
            let ResultsPage { publications, has_next } = page;
            let count = publications.len();

            for publication in publications {
                yield publication;
            }

            if count == 0 || !has_next {
                break;
            }

            start += count;
            page = client.fetch_page(&query, start).await?;
        }
    }
}

impl std::fmt::Debug for GoogleScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleScholarClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
