//! Paginated listing of remote collections

use std::future::Future;

use tracing::debug;

use ci_sync_runtime::api_client::Page;
use ci_sync_runtime::config::MAX_BATCH_SIZE;
use ci_sync_runtime::error::ApiError;

/// Fetch every page of a collection, starting at page 1.
///
/// `fetch_page` is called with `(page, per_page)`. Pages are requested until
/// the `X-Total-Pages` count is reached, or, when the API sends no count,
/// until a page comes back shorter than `per_page`. An empty page always ends
/// the listing.
///
/// Items are returned in page order, then in the order the API returned them
/// within each page. Any failed page aborts the listing and the items gathered
/// so far are dropped.
pub async fn fetch_all<T, F, Fut>(per_page: u32, mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let per_page = per_page.clamp(1, MAX_BATCH_SIZE);
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let Page {
            items: batch,
            total_pages,
        } = fetch_page(page, per_page).await?;

        let fetched = batch.len();
        if fetched == 0 {
            break;
        }
        items.extend(batch);

        let more = match total_pages {
            Some(total) => page < total,
            None => fetched >= per_page as usize,
        };
        if !more {
            break;
        }
        page += 1;
    }

    debug!(pages = page, count = items.len(), "listing complete");
    Ok(items)
}

#[cfg(test)]
#[path = "paginate_tests.rs"]
mod tests;
