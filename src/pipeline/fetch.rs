//! Cursor-following retrieval.
//!
//! Both remote capabilities page their results the same way: each response
//! carries `has_more` and `next_cursor`, and the next request passes the
//! cursor back. [`drain`] follows that chain to the end and concatenates the
//! pages in delivery order. Any failed request, or a page that claims more
//! results without a cursor, aborts the whole drain; a partial collection is
//! never returned.

use crate::error::SyncError;
use crate::model::{Block, Page, Paginated};
use crate::store::RemoteStore;
use std::future::Future;
use tracing::{debug, warn};

/// Fetch every row of a collection.
pub async fn query_all<S: RemoteStore + ?Sized>(
    store: &S,
    collection_id: &str,
) -> Result<Vec<Page>, SyncError> {
    drain(collection_id, move |cursor| async move {
        store.query(collection_id, cursor.as_deref()).await
    })
    .await
}

/// Fetch every top-level content block of a page body.
pub async fn list_all_blocks<S: RemoteStore + ?Sized>(
    store: &S,
    page_id: &str,
) -> Result<Vec<Block>, SyncError> {
    drain(page_id, move |cursor| async move {
        store.list_blocks(page_id, cursor.as_deref()).await
    })
    .await
}

async fn drain<T, F, Fut>(source: &str, mut next_page: F) -> Result<Vec<T>, SyncError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, SyncError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut requests = 0usize;

    loop {
        let page = next_page(cursor.take()).await?;
        requests += 1;
        debug!(
            "{}: page {} delivered {} items (has_more: {})",
            source,
            requests,
            page.results.len(),
            page.has_more
        );
        items.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                warn!(
                    "{}: has_more without next_cursor after {} pages",
                    source, requests
                );
                return Err(SyncError::Decode {
                    endpoint: source.to_string(),
                    detail: format!("has_more without next_cursor after {requests} pages"),
                });
            }
        }
    }

    Ok(items)
}
