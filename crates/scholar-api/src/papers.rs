//! Top-paper lookup: the operation behind `GET /api/scholar`.

use futures::{StreamExt, TryStreamExt};

use crate::client::SearchCapability;
use crate::config::server::MAX_PAPERS;
use crate::error::ClientResult;
use crate::models::PaperRecord;

/// Search for `field` and map the first [`MAX_PAPERS`] results.
///
/// Pulls at most five items from the result stream, in upstream order.
/// A shorter stream is not an error. Any error fails the whole lookup.
pub async fn fetch_papers(
    search: &dyn SearchCapability,
    field: &str,
) -> ClientResult<Vec<PaperRecord>> {
    search
        .search_pubs(field)
        .await?
        .take(MAX_PAPERS)
        .map_ok(PaperRecord::from)
        .try_collect()
        .await
}
