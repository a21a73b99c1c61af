//! Sync entry points.
//!
//! A run walks the seven collections in a fixed order, one at a time:
//! drain the collection, fetch page bodies where the collection has them,
//! normalise and sort, then write `data/<collection>.json`. Once every
//! collection is in memory the CV is composed and written.
//!
//! Any remote or I/O failure aborts the run. Files written for earlier
//! collections stay in place and the failing collection's file is left as it
//! was. Every file is written to a temporary path and renamed into place, so
//! no reader ever sees a half-written file.

use crate::config::{Collection, SyncConfig};
use crate::error::SyncError;
use crate::model::Page;
use crate::output::{Catalog, SyncOutput, SyncStats};
use crate::pipeline::assemble::{render_cv, sort_by_date_desc, sort_by_order, sort_publications};
use crate::pipeline::blocks::flatten_blocks;
use crate::pipeline::fetch::{list_all_blocks, query_all};
use crate::pipeline::normalize;
use crate::progress::{NoopProgressCallback, ProgressCallback};
use crate::store::{NotionClient, RemoteStore};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Mirror every collection and regenerate the CV.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(SyncError)` for fatal errors only:
/// - the client cannot be built from the configuration
/// - any query or block listing fails
/// - an output file cannot be written
///
/// Content anomalies are reported in `output.stats.warnings` instead.
pub async fn sync(config: &SyncConfig) -> Result<SyncOutput, SyncError> {
    let client = NotionClient::new(config)?;
    sync_with_store(&client, config).await
}

/// Run the pipeline against any [`RemoteStore`].
pub async fn sync_with_store<S: RemoteStore + ?Sized>(
    store: &S,
    config: &SyncConfig,
) -> Result<SyncOutput, SyncError> {
    let total_start = Instant::now();
    let progress: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));
    let total = Collection::ALL.len();

    info!("Starting sync into {}", config.output_dir.display());
    progress.on_sync_start(total);

    let mut catalog = Catalog::default();
    let mut stats = SyncStats::default();

    for (idx, collection) in Collection::ALL.into_iter().enumerate() {
        progress.on_collection_start(idx + 1, total, collection);
        info!("[{}/{}] {}...", idx + 1, total, collection.label());

        let pages = query_all(store, config.collection_id(collection)?).await?;
        debug!("{}: {} rows", collection, pages.len());

        let (records, path) = match collection {
            Collection::Publications => {
                catalog.publications = pages.iter().map(normalize::publication).collect();
                sort_publications(&mut catalog.publications);
                write_records(config, collection, &catalog.publications).await?
            }
            Collection::News => {
                catalog.news = pages.iter().map(normalize::news_item).collect();
                sort_by_date_desc(&mut catalog.news, |n| n.date.as_str());
                write_records(config, collection, &catalog.news).await?
            }
            Collection::Team => {
                catalog.team = pages.iter().map(normalize::team_member).collect();
                write_records(config, collection, &catalog.team).await?
            }
            Collection::Honors => {
                catalog.honors = pages.iter().map(normalize::honor).collect();
                sort_by_date_desc(&mut catalog.honors, |h| h.date_raw.as_str());
                write_records(config, collection, &catalog.honors).await?
            }
            Collection::Education => {
                catalog.education = pages.iter().map(normalize::education_entry).collect();
                sort_by_order(&mut catalog.education, |e| e.order);
                write_records(config, collection, &catalog.education).await?
            }
            Collection::Projects => {
                let bodies = fetch_bodies(store, collection, &pages, &progress).await?;
                catalog.projects = pages
                    .iter()
                    .zip(&bodies)
                    .map(|(page, body)| normalize::project(page, body))
                    .collect();
                sort_by_order(&mut catalog.projects, |p| p.order);
                write_records(config, collection, &catalog.projects).await?
            }
            Collection::CvOnly => {
                let bodies = fetch_bodies(store, collection, &pages, &progress).await?;
                catalog.cv_sections = pages
                    .iter()
                    .zip(&bodies)
                    .map(|(page, body)| normalize::cv_section(page, body))
                    .collect();
                sort_by_order(&mut catalog.cv_sections, |s| s.order);
                write_records(config, collection, &catalog.cv_sections).await?
            }
        };

        info!("  Wrote {} items to {}", records, path.display());
        progress.on_collection_complete(collection, records, &path);
        stats.records.insert(collection, records);
        stats.files_written.push(path);
    }

    // ── CV document ──────────────────────────────────────────────────────
    let generated_on = chrono::Local::now().date_naive();
    let cv = render_cv(&catalog, &config.cv, generated_on);
    let cv_path = config.cv_path();
    write_atomic(&cv_path, cv.text.clone().into_bytes()).await?;
    let cv_lines = cv.text.lines().count();
    info!("Generated CV: {} ({} lines)", cv_path.display(), cv_lines);
    progress.on_document_written(&cv_path, cv_lines);

    stats.files_written.push(cv_path.clone());
    stats.cv_path = Some(cv_path);
    stats.warnings = cv.warnings;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    let total_records = catalog.total_records();
    info!(
        "Sync complete: {} records, {} warnings, {}ms",
        total_records,
        stats.warnings.len(),
        stats.total_duration_ms
    );
    progress.on_sync_complete(total_records, stats.warnings.len());

    Ok(SyncOutput {
        catalog,
        cv_document: cv.text,
        stats,
    })
}

/// Synchronous wrapper around [`sync`].
///
/// Creates a temporary tokio runtime internally.
pub fn sync_blocking(config: &SyncConfig) -> Result<SyncOutput, SyncError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SyncError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(sync(config))
}

/// Fetch and flatten the body of every page, in row order.
async fn fetch_bodies<S: RemoteStore + ?Sized>(
    store: &S,
    collection: Collection,
    pages: &[Page],
    progress: &ProgressCallback,
) -> Result<Vec<String>, SyncError> {
    let mut bodies = Vec::with_capacity(pages.len());
    for (n, page) in pages.iter().enumerate() {
        let blocks = list_all_blocks(store, &page.id).await?;
        debug!("{}: page {} has {} blocks", collection, page.id, blocks.len());
        bodies.push(flatten_blocks(&blocks));
        progress.on_body_fetched(collection, n + 1, pages.len());
    }
    Ok(bodies)
}

/// Serialise `records` as a pretty JSON array into the data directory.
async fn write_records<T: Serialize>(
    config: &SyncConfig,
    collection: Collection,
    records: &[T],
) -> Result<(usize, PathBuf), SyncError> {
    let mut json = serde_json::to_string_pretty(records).map_err(|e| SyncError::Serialize {
        collection: collection.key().to_string(),
        source: e,
    })?;
    json.push('\n');

    let path = config.data_dir().join(collection.file_name());
    write_atomic(&path, json.into_bytes()).await?;
    Ok((records.len(), path))
}

/// Atomic write: write to a temp file in the target directory, then rename
/// it over `path`.
async fn write_atomic(path: &Path, contents: Vec<u8>) -> Result<(), SyncError> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist_atomic(&target, &contents))
        .await
        .map_err(|e| SyncError::Internal(format!("Write task failed: {}", e)))?
}

fn persist_atomic(path: &Path, contents: &[u8]) -> Result<(), SyncError> {
    let fail = |e: std::io::Error| SyncError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(fail)?;

    // Opened like a plain write: the file keeps the umask-derived mode.
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .make_in(parent, |p| {
            std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(p)
        })
        .map_err(fail)?;
    tmp.write_all(contents).map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
