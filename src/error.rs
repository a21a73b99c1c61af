//! Error types for the notion2site library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`SyncError`] — **Fatal**: the run cannot proceed (credential missing,
//!   a remote query failed, an output file could not be written). Returned
//!   as `Err(SyncError)` from the top-level `sync*` functions. No partial
//!   data is written for the collection that failed.
//!
//! * [`SectionWarning`] — **Absorbed**: the content had an unexpected shape
//!   (a CV section nobody filled in yet). The run continues with defaults and
//!   the warning is reported in [`crate::output::SyncStats::warnings`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the notion2site library.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The store credential is absent or blank.
    #[error(
        "Notion API key not found.\n\
Set NOTION_API_KEY in the environment, pass --api-key, or add \"storeCredential\" to the config file."
    )]
    MissingCredential,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The JSON configuration file could not be read or parsed.
    #[error("Failed to read config file '{path}': {detail}")]
    ConfigRead { path: PathBuf, detail: String },

    // ── Remote store errors ───────────────────────────────────────────────
    /// A database query returned a non-success status.
    #[error("Query of collection '{collection}' failed with HTTP {status}: {detail}")]
    QueryFailed {
        collection: String,
        status: u16,
        detail: String,
    },

    /// Listing the block children of a page returned a non-success status.
    #[error("Listing blocks of page '{page_id}' failed with HTTP {status}: {detail}")]
    BlocksFailed {
        page_id: String,
        status: u16,
        detail: String,
    },

    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("HTTP request to the Notion API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a body we could not decode.
    #[error("Unexpected response from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialising records to JSON failed.
    #[error("Failed to serialise {collection} records: {source}")]
    Serialize {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal content anomaly.
///
/// Never aborts the run; the affected part of the output is omitted or
/// filled with defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum SectionWarning {
    /// A CV section listed in the layout has no matching record.
    #[error("CV section '{section}' has no record; omitted from the document")]
    MissingSection { section: String },

    /// A CV section exists but its body is empty.
    #[error("CV section '{section}' is empty")]
    EmptySection { section: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_mentions_env_var() {
        let msg = SyncError::MissingCredential.to_string();
        assert!(msg.contains("NOTION_API_KEY"), "got: {msg}");
    }

    #[test]
    fn query_failed_display() {
        let e = SyncError::QueryFailed {
            collection: "publications".into(),
            status: 401,
            detail: "unauthorized".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("publications"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn blocks_failed_display() {
        let e = SyncError::BlocksFailed {
            page_id: "abc123".into(),
            status: 404,
            detail: "object_not_found".into(),
        };
        assert!(e.to_string().contains("abc123"));
    }

    #[test]
    fn missing_section_display() {
        let w = SectionWarning::MissingSection {
            section: "Patents".into(),
        };
        assert!(w.to_string().contains("Patents"));
    }
}
