//! Progress-callback trait for per-collection sync events.
//!
//! Inject an [`Arc<dyn SyncProgressCallback>`] via
//! [`crate::config::SyncConfigBuilder::progress_callback`] to receive events
//! as the pipeline works through each collection. The CLI uses it to drive a
//! terminal progress display; library users can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use notion2site::{Collection, SyncProgressCallback};
//! use std::path::Path;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     records: AtomicUsize,
//! }
//!
//! impl SyncProgressCallback for CountingCallback {
//!     fn on_collection_complete(&self, _c: Collection, records: usize, _path: &Path) {
//!         self.records.fetch_add(records, Ordering::SeqCst);
//!     }
//! }
//! ```

use crate::config::Collection;
use std::path::Path;
use std::sync::Arc;

/// Called by the sync pipeline as it processes each collection.
///
/// Events arrive in order from a single task. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait SyncProgressCallback: Send + Sync {
    /// Called once before the first collection is queried.
    fn on_sync_start(&self, total_collections: usize) {
        let _ = total_collections;
    }

    /// Called before a collection is queried.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the run
    /// * `total` — number of collections in the run
    fn on_collection_start(&self, index: usize, total: usize, collection: Collection) {
        let _ = (index, total, collection);
    }

    /// Called after the body of one page has been fetched and flattened.
    ///
    /// Only collections with long-form bodies (projects, CV sections) emit it.
    fn on_body_fetched(&self, collection: Collection, page_num: usize, total_pages: usize) {
        let _ = (collection, page_num, total_pages);
    }

    /// Called after a collection's record file has been written.
    fn on_collection_complete(&self, collection: Collection, records: usize, path: &Path) {
        let _ = (collection, records, path);
    }

    /// Called after the typeset document has been written.
    fn on_document_written(&self, path: &Path, lines: usize) {
        let _ = (path, lines);
    }

    /// Called once at the end of a successful run.
    fn on_sync_complete(&self, total_records: usize, warnings: usize) {
        let _ = (total_records, warnings);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SyncProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SyncConfig`].
pub type ProgressCallback = Arc<dyn SyncProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started: AtomicUsize,
        bodies: AtomicUsize,
        records: AtomicUsize,
    }

    impl SyncProgressCallback for TrackingCallback {
        fn on_collection_start(&self, _index: usize, _total: usize, _c: Collection) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_body_fetched(&self, _c: Collection, _page: usize, _total: usize) {
            self.bodies.fetch_add(1, Ordering::SeqCst);
        }

        fn on_collection_complete(&self, _c: Collection, records: usize, _path: &Path) {
            self.records.fetch_add(records, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_sync_start(7);
        cb.on_collection_start(1, 7, Collection::Publications);
        cb.on_body_fetched(Collection::Projects, 1, 3);
        cb.on_collection_complete(Collection::Publications, 12, Path::new("data/x.json"));
        cb.on_document_written(Path::new("cv/cv.tex"), 80);
        cb.on_sync_complete(12, 0);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_collection_start(1, 2, Collection::Projects);
        tracker.on_body_fetched(Collection::Projects, 1, 2);
        tracker.on_body_fetched(Collection::Projects, 2, 2);
        tracker.on_collection_complete(Collection::Projects, 2, Path::new("p.json"));

        assert_eq!(tracker.started.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.bodies.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.records.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_sync_start(7);
        cb.on_collection_start(3, 7, Collection::Team);
    }
}
