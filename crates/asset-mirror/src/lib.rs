//! # asset-mirror
//!
//! Download a list of remote static assets (hero images, journal covers,
//! self-hosted paper PDFs) into a local directory tree, so a static site can
//! serve them itself instead of hot-linking the old host.
//!
//! ## Manifest
//!
//! ```json
//! {
//!   "baseUrl": "https://static.example.com/media/",
//!   "assets": [
//!     { "dest": "images/hero/hero1.jpg", "url": "f42095_0ded~mv2.jpg" },
//!     { "dest": "files/pdfs/paper_27.pdf", "url": "https://host/paper.pdf" }
//!   ]
//! }
//! ```
//!
//! A `url` that is not absolute is appended to `baseUrl`. `dest` is relative
//! to the root passed to [`mirror_assets`] and may not escape it.
//!
//! ## Failure model
//!
//! Assets are fetched one after another. A failed asset is reported through
//! the event callback and counted in [`MirrorReport::failed`]; the remaining
//! assets are still attempted. Only an unusable manifest or HTTP client is
//! returned as an error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use asset_mirror::{mirror_assets, AssetManifest, MirrorEvent};
//! use std::path::Path;
//!
//! let manifest = AssetManifest::from_json_file(Path::new("assets.json")).expect("manifest");
//! let report = mirror_assets(&manifest, Path::new("static"), Some(&|event: &MirrorEvent| {
//!     eprintln!("{event}");
//! }))
//! .expect("client");
//! eprintln!("{} downloaded, {} failed", report.downloaded, report.failed);
//! ```

use std::fmt;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by asset-mirror operations.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("Invalid manifest: {0}")]
    ManifestParse(#[source] serde_json::Error),

    /// A destination is absolute or climbs out of the root.
    #[error("Unsafe destination path '{0}'")]
    UnsafeDestination(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// Could not write the downloaded file.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Manifest ─────────────────────────────────────────────────────────────────

/// One asset to mirror.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetEntry {
    /// Destination relative to the mirror root, e.g. `images/hero/hero1.jpg`.
    pub dest: String,
    /// Absolute URL, or a path appended to the manifest's base URL.
    pub url: String,
}

/// A list of assets plus an optional shared URL prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn from_json_str(json: &str) -> Result<Self, MirrorError> {
        serde_json::from_str(json).map_err(MirrorError::ManifestParse)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MirrorError> {
        let text = std::fs::read_to_string(path).map_err(|e| MirrorError::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    /// Full download URL for `entry`.
    pub fn resolve_url(&self, entry: &AssetEntry) -> String {
        if entry.url.starts_with("http://") || entry.url.starts_with("https://") {
            return entry.url.clone();
        }
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                entry.url.trim_start_matches('/')
            ),
            _ => entry.url.clone(),
        }
    }
}

// ── Events and report ────────────────────────────────────────────────────────

/// Per-asset outcome, delivered to the caller as each asset finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    Downloaded {
        index: usize,
        total: usize,
        dest: String,
        bytes: u64,
    },
    Failed {
        index: usize,
        total: usize,
        dest: String,
        error: String,
    },
}

impl fmt::Display for MirrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorEvent::Downloaded {
                index,
                total,
                dest,
                bytes,
            } => write!(f, "[{index}/{total}] {dest} ({:.0} KB)", *bytes as f64 / 1024.0),
            MirrorEvent::Failed {
                index,
                total,
                dest,
                error,
            } => write!(f, "[{index}/{total}] FAILED: {dest} - {error}"),
        }
    }
}

/// Totals for one mirror run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub downloaded: usize,
    pub failed: usize,
    pub bytes: u64,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Download every asset of `manifest` below `root`.
///
/// `on_event` is called once per asset. Pass `None` to run silently.
pub fn mirror_assets(
    manifest: &AssetManifest,
    root: &Path,
    on_event: Option<&dyn Fn(&MirrorEvent)>,
) -> Result<MirrorReport, MirrorError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("asset-mirror/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| MirrorError::Client(e.to_string()))?;

    let total = manifest.assets.len();
    let mut report = MirrorReport::default();

    for (i, entry) in manifest.assets.iter().enumerate() {
        let result = destination(root, &entry.dest)
            .and_then(|path| download_to(&client, &manifest.resolve_url(entry), &path));

        let event = match result {
            Ok(bytes) => {
                report.downloaded += 1;
                report.bytes += bytes;
                MirrorEvent::Downloaded {
                    index: i + 1,
                    total,
                    dest: entry.dest.clone(),
                    bytes,
                }
            }
            Err(e) => {
                report.failed += 1;
                MirrorEvent::Failed {
                    index: i + 1,
                    total,
                    dest: entry.dest.clone(),
                    error: e.to_string(),
                }
            }
        };
        if let Some(cb) = on_event {
            cb(&event);
        }
    }

    Ok(report)
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// Join `dest` onto `root`, refusing absolute paths and `..` components.
fn destination(root: &Path, dest: &str) -> Result<PathBuf, MirrorError> {
    let rel = Path::new(dest);
    let safe = !dest.trim().is_empty()
        && rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(MirrorError::UnsafeDestination(dest.to_string()));
    }
    Ok(root.join(rel))
}

/// Stream `url` into `dest` in 64 KiB chunks via a `.part` file.
fn download_to(
    client: &reqwest::blocking::Client,
    url: &str,
    dest: &Path,
) -> Result<u64, MirrorError> {
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| MirrorError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(MirrorError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MirrorError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
    }
    save_stream(&mut response, dest)
}

/// Copy `reader` into `<dest>.part`, then rename it over `dest`.
///
/// On any failure after the `.part` file is created, it is removed.
fn save_stream(reader: &mut impl Read, dest: &Path) -> Result<u64, MirrorError> {
    let mut part_name = dest.file_name().unwrap_or_default().to_os_string();
    part_name.push(".part");
    let part_path = dest.with_file_name(part_name);

    let result = write_part(reader, &part_path).and_then(|downloaded| {
        std::fs::rename(&part_path, dest).map_err(|e| MirrorError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
        Ok(downloaded)
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&part_path);
    }
    result
}

fn write_part(reader: &mut impl Read, part_path: &Path) -> Result<u64, MirrorError> {
    let write_err = |e: std::io::Error| MirrorError::Write {
        path: part_path.to_path_buf(),
        source: e,
    };
    let mut file = std::fs::File::create(part_path).map_err(write_err)?;

    let mut chunk = vec![0u8; 64 * 1024]; // 64 KiB
    let mut downloaded: u64 = 0;

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                file.write_all(&chunk[..n]).map_err(write_err)?;
                downloaded += n as u64;
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MirrorError::Download(format!("Read error: {e}"))),
        }
    }

    file.flush().map_err(write_err)?;
    Ok(downloaded)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
