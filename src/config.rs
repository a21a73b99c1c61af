//! Configuration types for a sync run.
//!
//! All run behaviour is controlled through [`SyncConfig`], built via its
//! [`SyncConfigBuilder`] or loaded from a JSON [`ConfigFile`]. The credential
//! and the collection ids are the only values without defaults; everything
//! else (API endpoint, page size, CV layout) has a documented default.

use crate::error::SyncError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default Notion API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion API version header value the wire model is written against.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

// ── Collections ──────────────────────────────────────────────────────────

/// The logical collections mirrored by a run, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Publications,
    News,
    Team,
    Honors,
    Education,
    Projects,
    CvOnly,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Publications,
        Collection::News,
        Collection::Team,
        Collection::Honors,
        Collection::Education,
        Collection::Projects,
        Collection::CvOnly,
    ];

    /// Key used in configuration files and output file names.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Publications => "publications",
            Collection::News => "news",
            Collection::Team => "team",
            Collection::Honors => "honors",
            Collection::Education => "education",
            Collection::Projects => "projects",
            Collection::CvOnly => "cv_only",
        }
    }

    /// Human-readable label for progress output.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Publications => "Publications",
            Collection::News => "News & Media",
            Collection::Team => "Team Members",
            Collection::Honors => "Honors & Awards",
            Collection::Education => "Education",
            Collection::Projects => "Research Projects",
            Collection::CvOnly => "CV-Only Sections",
        }
    }

    /// Name of the JSON record file written for this collection.
    pub fn file_name(self) -> String {
        format!("{}.json", self.key())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── CV profile ───────────────────────────────────────────────────────────

/// Where a free-form CV section sits relative to the fixed sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Between Education and Honors.
    BeforeHonors,
    /// Between Honors and the publication lists.
    #[default]
    BeforePublications,
    /// After the publication lists.
    AfterPublications,
}

/// One free-form section of the CV layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSectionSpec {
    /// Value of the `Section` select on the cv_only record.
    pub key: String,
    /// Heading printed in the document (plain text; escaped on output).
    pub heading: String,
    #[serde(default)]
    pub placement: Placement,
}

impl CvSectionSpec {
    pub fn new(key: impl Into<String>, heading: impl Into<String>, placement: Placement) -> Self {
        Self {
            key: key.into(),
            heading: heading.into(),
            placement,
        }
    }
}

/// Per-person data for the typeset CV.
///
/// Plain-text fields are escaped when emitted. `citation_metrics` is inserted
/// verbatim so it may carry markup such as `$>$`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvProfile {
    pub name: String,
    pub header_lines: Vec<String>,
    pub scholar_url: Option<String>,
    /// Author string bolded in every publication entry, e.g. `Min, J.`.
    pub highlight_author: Option<String>,
    pub citation_metrics: Option<String>,
    /// Phrases emphasised inside list items, e.g. `(Invited)`.
    pub emphasis: Vec<String>,
    pub file_name: String,
    pub sections: Vec<CvSectionSpec>,
}

impl Default for CvProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            header_lines: Vec::new(),
            scholar_url: None,
            highlight_author: None,
            citation_metrics: None,
            emphasis: vec![
                "(Invited)".into(),
                "(Best Poster Award)".into(),
                "(Best Paper Award)".into(),
                "(Graduate Student Award)".into(),
            ],
            file_name: "cv.tex".into(),
            sections: default_sections(),
        }
    }
}

fn default_sections() -> Vec<CvSectionSpec> {
    vec![
        CvSectionSpec::new(
            "Research Experience",
            "Research & Work Experience",
            Placement::BeforeHonors,
        ),
        CvSectionSpec::new(
            "Teaching & Mentoring",
            "Teaching and Mentoring",
            Placement::BeforePublications,
        ),
        CvSectionSpec::new(
            "Conferences & Talks",
            "Conference Presentations, Poster Sessions, Invited Talks, and Workshops",
            Placement::BeforePublications,
        ),
        CvSectionSpec::new(
            "Academic Service",
            "Academic Service",
            Placement::BeforePublications,
        ),
        CvSectionSpec::new(
            "Proposal Writing",
            "Proposal Writing Experience",
            Placement::BeforePublications,
        ),
        CvSectionSpec::new("Patents", "Patents", Placement::BeforePublications),
    ]
}

// ── SyncConfig ───────────────────────────────────────────────────────────

/// Configuration for one sync run.
///
/// # Example
/// ```rust
/// use notion2site::{Collection, SyncConfig};
///
/// let mut builder = SyncConfig::builder()
///     .store_credential("secret_abc")
///     .output_dir("site");
/// for c in Collection::ALL {
///     builder = builder.collection_id(c, format!("{}-db", c.key()));
/// }
/// let config = builder.build().unwrap();
/// assert_eq!(config.data_dir(), std::path::Path::new("site/data"));
/// ```
#[derive(Clone)]
pub struct SyncConfig {
    /// Integration token for the remote store. Required.
    pub store_credential: String,

    /// Root of the generated tree: `data/*.json` and `cv/<file>`. Default: `.`.
    pub output_dir: PathBuf,

    /// Remote id of each logical collection. All seven are required.
    pub collection_ids: BTreeMap<Collection, String>,

    /// Base URL of the REST API. Default: [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Value of the `Notion-Version` header. Default: [`DEFAULT_API_VERSION`].
    pub api_version: String,

    /// Rows or blocks requested per page. Range: 1–100. Default: 100.
    pub page_size: u32,

    /// Per-request timeout in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// Layout and personal data for the CV document.
    pub cv: CvProfile,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_credential: String::new(),
            output_dir: PathBuf::from("."),
            collection_ids: BTreeMap::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: 100,
            request_timeout_secs: 60,
            cv: CvProfile::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("store_credential", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("collection_ids", &self.collection_ids)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cv", &self.cv)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SyncProgressCallback>"),
            )
            .finish()
    }
}

impl SyncConfig {
    /// Create a new builder for `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder {
            config: Self::default(),
        }
    }

    /// Directory receiving the per-collection JSON files.
    pub fn data_dir(&self) -> PathBuf {
        self.output_dir.join("data")
    }

    /// Directory receiving the typeset CV.
    pub fn cv_dir(&self) -> PathBuf {
        self.output_dir.join("cv")
    }

    pub fn cv_path(&self) -> PathBuf {
        self.cv_dir().join(&self.cv.file_name)
    }

    /// Remote id for `collection`.
    pub fn collection_id(&self, collection: Collection) -> Result<&str, SyncError> {
        self.collection_ids
            .get(&collection)
            .map(String::as_str)
            .ok_or_else(|| {
                SyncError::InvalidConfig(format!("no collection id configured for '{collection}'"))
            })
    }
}

/// Builder for [`SyncConfig`].
#[derive(Debug)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn store_credential(mut self, token: impl Into<String>) -> Self {
        self.config.store_credential = token.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn collection_id(mut self, collection: Collection, id: impl Into<String>) -> Self {
        self.config.collection_ids.insert(collection, id.into());
        self
    }

    pub fn collection_ids(mut self, ids: BTreeMap<Collection, String>) -> Self {
        self.config.collection_ids.extend(ids);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.config.page_size = n.clamp(1, 100);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn cv(mut self, profile: CvProfile) -> Self {
        self.config.cv = profile;
        self
    }

    pub fn cv_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.cv.file_name = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing credential is reported before anything else so the user sees
    /// the most actionable message first.
    pub fn build(self) -> Result<SyncConfig, SyncError> {
        let c = &self.config;
        if c.store_credential.trim().is_empty() {
            return Err(SyncError::MissingCredential);
        }

        let missing: Vec<&str> = Collection::ALL
            .iter()
            .filter(|col| {
                c.collection_ids
                    .get(col)
                    .is_none_or(|id| id.trim().is_empty())
            })
            .map(|col| col.key())
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::InvalidConfig(format!(
                "missing collection ids: {}",
                missing.join(", ")
            )));
        }

        if c.cv.file_name.trim().is_empty() {
            return Err(SyncError::InvalidConfig("CV file name is empty".into()));
        }

        Ok(self.config)
    }
}

// ── Config file ──────────────────────────────────────────────────────────

/// The on-disk JSON configuration.
///
/// ```json
/// {
///   "storeCredential": "secret_…",
///   "outputDir": "site",
///   "collectionIds": { "publications": "b9c9…", "news": "4eba…" },
///   "cv": { "name": "Ada Lovelace", "fileName": "ada_cv.tex" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub store_credential: Option<String>,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub collection_ids: BTreeMap<Collection, String>,
    pub api_base_url: Option<String>,
    pub api_version: Option<String>,
    pub page_size: Option<u32>,
    pub cv: Option<CvProfile>,
}

impl ConfigFile {
    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SyncError::ConfigRead {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SyncError::ConfigRead {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Seed a builder with every value present in the file.
    pub fn into_builder(self) -> SyncConfigBuilder {
        let mut builder = SyncConfig::builder().collection_ids(self.collection_ids);
        if let Some(token) = self.store_credential {
            builder = builder.store_credential(token);
        }
        if let Some(dir) = self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(url) = self.api_base_url {
            builder = builder.api_base_url(url);
        }
        if let Some(version) = self.api_version {
            builder = builder.api_version(version);
        }
        if let Some(n) = self.page_size {
            builder = builder.page_size(n);
        }
        if let Some(cv) = self.cv {
            builder = builder.cv(cv);
        }
        builder
    }
}
