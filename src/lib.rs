//! # notion2site
//!
//! Mirror a Notion workspace into the data files of a static site and a
//! typeset LaTeX CV.
//!
//! ## Why this crate?
//!
//! A research group keeps its publications, news, team, honors, education,
//! projects and CV-only sections in Notion databases because that is where
//! people actually edit them. The site generator wants flat JSON files and
//! the CV wants LaTeX. Long-form content (project write-ups, CV sections)
//! lives in page bodies as rich-text blocks, so the interesting work is
//! recovering structure from that text: subtopics with images and captions,
//! header lines that hang over bullet lists, inline bold, reserved LaTeX
//! characters.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Notion databases
//!  │
//!  ├─ 1. Fetch      follow pagination cursors (rows and page bodies)
//!  ├─ 2. Normalise  property bags → typed records, total extractors
//!  ├─ 3. Flatten    body blocks → `### ` / `- ` / `**bold**` text
//!  ├─ 4. Parse      project subtopics, CV section bodies
//!  ├─ 5. Assemble   sort records, compose the CV document
//!  └─ 6. Output     data/<collection>.json + cv/<file>.tex
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notion2site::{sync, ConfigFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigFile::load("notion2site.json")?
//!         .into_builder()
//!         .store_credential(std::env::var("NOTION_API_KEY")?)
//!         .build()?;
//!     let output = sync(&config).await?;
//!     eprintln!("{} records, {} warnings",
//!         output.catalog.total_records(),
//!         output.stats.warnings.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `notion2site` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! notion2site = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod store;
pub mod sync;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    Collection, ConfigFile, CvProfile, CvSectionSpec, Placement, SyncConfig, SyncConfigBuilder,
};
pub use error::{SectionWarning, SyncError};
pub use output::{Catalog, SyncOutput, SyncStats};
pub use progress::{NoopProgressCallback, ProgressCallback, SyncProgressCallback};
pub use store::{NotionClient, RemoteStore};
pub use sync::{sync, sync_blocking, sync_with_store};
