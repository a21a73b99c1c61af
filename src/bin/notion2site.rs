//! CLI binary for notion2site.
//!
//! A thin shim over the library crate that maps CLI flags and the JSON
//! config file to `SyncConfig`, runs the sync, then optionally mirrors
//! static assets with `asset-mirror`.

use anyhow::{Context, Result};
use asset_mirror::{mirror_assets, AssetManifest, MirrorEvent, MirrorReport};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use notion2site::{
    sync, Collection, ConfigFile, ProgressCallback, SyncConfig, SyncConfigBuilder,
    SyncProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the collections, plus a log line
/// per finished collection printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the collection currently being fetched.
    started: Mutex<Option<Instant>>,
    /// Page bodies fetched for the current collection.
    bodies: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_sync_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:30.green/238}] {pos}/{len} collections  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Syncing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
            bodies: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl SyncProgressCallback for CliProgressCallback {
    fn on_sync_start(&self, total_collections: usize) {
        self.bar.set_length(total_collections as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Syncing {total_collections} collections from Notion…"))
        ));
    }

    fn on_collection_start(&self, index: usize, total: usize, collection: Collection) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bodies.store(0, Ordering::SeqCst);
        self.bar
            .set_message(format!("[{index}/{total}] {}…", collection.label()));
    }

    fn on_body_fetched(&self, collection: Collection, page_num: usize, total_pages: usize) {
        self.bodies.fetch_add(1, Ordering::SeqCst);
        self.bar.set_message(format!(
            "{}  body {page_num}/{total_pages}",
            collection.label()
        ));
    }

    fn on_collection_complete(&self, collection: Collection, records: usize, path: &Path) {
        let bodies = self.bodies.swap(0, Ordering::SeqCst);
        let extra = if bodies > 0 {
            format!("  {}", dim(&format!("{bodies} bodies")))
        } else {
            String::new()
        };
        self.bar.println(format!(
            "  {} {:<18} {:>4} records  {}  {}{extra}",
            green("✓"),
            collection.label(),
            records,
            dim(&path.display().to_string()),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_document_written(&self, path: &Path, lines: usize) {
        self.bar.println(format!(
            "  {} {:<18} {:>4} lines    {}",
            green("✓"),
            "CV",
            lines,
            dim(&path.display().to_string()),
        ));
    }

    fn on_sync_complete(&self, total_records: usize, warnings: usize) {
        self.bar.finish_and_clear();
        if warnings == 0 {
            eprintln!(
                "{} {} records synced",
                green("✔"),
                bold(&total_records.to_string())
            );
        } else {
            eprintln!(
                "{} {} records synced  ({} warnings)",
                cyan("⚠"),
                bold(&total_records.to_string()),
                red(&warnings.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Sync everything described in a config file
  notion2site --config notion2site.json

  # Override the output root (data/ and cv/ are created below it)
  notion2site --config notion2site.json -o site

  # Sync, then mirror images and PDFs listed in two manifests
  notion2site --config notion2site.json --assets images.json --assets pdfs.json

  # Only mirror assets (no Notion API key needed)
  notion2site --assets-only --assets images.json --assets-dir static

  # Machine-readable run statistics
  notion2site --config notion2site.json --json > stats.json

CONFIG FILE (JSON):
  {
    "storeCredential": "secret_...",          (or NOTION_API_KEY)
    "outputDir": "site",
    "collectionIds": {
      "publications": "...", "news": "...", "team": "...", "honors": "...",
      "education": "...", "projects": "...", "cv_only": "..."
    },
    "cv": { "name": "...", "highlightAuthor": "Min, J.", "fileName": "cv.tex" }
  }

ASSET MANIFEST (JSON):
  { "baseUrl": "https://host/media/",
    "assets": [ { "dest": "images/hero/hero1.jpg", "url": "f42095_0ded~mv2.jpg" } ] }

ENVIRONMENT VARIABLES:
  NOTION_API_KEY           Notion integration token
  NOTION2SITE_CONFIG       Path to the JSON config file
  NOTION2SITE_OUTPUT_DIR   Output root directory
  RUST_LOG                 Override log filter (e.g. notion2site=debug)
"#;

/// Mirror Notion databases into static-site data files and a LaTeX CV.
#[derive(Parser, Debug)]
#[command(
    name = "notion2site",
    version,
    about = "Mirror Notion databases into static-site data files and a LaTeX CV",
    long_about = "Query the Notion databases holding publications, news, team, honors, \
education, projects and CV-only sections; write one JSON file per collection for the \
site generator and a typeset LaTeX CV. Optionally mirror images and PDFs listed in \
asset manifests.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON config file (credential, collection ids, CV profile).
    #[arg(short, long, env = "NOTION2SITE_CONFIG")]
    config: Option<PathBuf>,

    /// Notion integration token. Overrides the config file.
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output root: JSON goes to <dir>/data, the CV to <dir>/cv.
    #[arg(short, long, env = "NOTION2SITE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Notion API base URL.
    #[arg(long, env = "NOTION2SITE_API_BASE_URL")]
    api_base_url: Option<String>,

    /// File name of the generated CV inside <output-dir>/cv.
    #[arg(long)]
    cv_file: Option<String>,

    /// Rows or blocks requested per API call (1–100).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    page_size: Option<u32>,

    /// Asset manifest to mirror after the sync. Repeatable.
    #[arg(long = "assets", value_name = "MANIFEST")]
    assets: Vec<PathBuf>,

    /// Root directory receiving mirrored assets.
    #[arg(long, default_value = "static")]
    assets_dir: PathBuf,

    /// Skip the Notion sync; only mirror assets.
    #[arg(long, requires = "assets")]
    assets_only: bool,

    /// Print run statistics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress display.
    #[arg(long, env = "NOTION2SITE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress display replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut manifests = Vec::with_capacity(cli.assets.len());
    for path in &cli.assets {
        let manifest = AssetManifest::from_json_file(path)
            .with_context(|| format!("Failed to load asset manifest {}", path.display()))?;
        manifests.push(manifest);
    }

    // ── Sync ─────────────────────────────────────────────────────────────
    if !cli.assets_only {
        let progress_cb: Option<ProgressCallback> = if show_progress {
            Some(CliProgressCallback::new() as Arc<dyn SyncProgressCallback>)
        } else {
            None
        };
        let config = build_config(&cli, progress_cb)?;

        let output = sync(&config).await.context("Sync failed")?;
        let stats = &output.stats;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(stats).context("Failed to serialise stats")?
            );
        } else if !cli.quiet {
            if !show_progress {
                eprintln!(
                    "Synced {} records into {} files in {}ms",
                    output.catalog.total_records(),
                    stats.files_written.len(),
                    stats.total_duration_ms
                );
            }
            for warning in &stats.warnings {
                eprintln!("  {} {}", cyan("⚠"), warning);
            }
            if let Some(ref cv) = stats.cv_path {
                eprintln!(
                    "   CV  →  {}  {}",
                    bold(&cv.display().to_string()),
                    dim(&format!("{}ms total", stats.total_duration_ms)),
                );
            }
        }
    }

    // ── Assets ───────────────────────────────────────────────────────────
    if !manifests.is_empty() {
        let report = mirror_all(&manifests, &cli.assets_dir, cli.quiet)?;
        if !cli.quiet {
            eprintln!(
                "{} {} assets downloaded  ({})  {}",
                if report.failed == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                bold(&report.downloaded.to_string()),
                dim(&format!("{:.1} MB", report.bytes as f64 / (1024.0 * 1024.0))),
                if report.failed == 0 {
                    String::new()
                } else {
                    red(&format!("{} failed", report.failed))
                },
            );
        }
    }

    Ok(())
}

/// Download every manifest in turn, summing the per-manifest reports.
fn mirror_all(manifests: &[AssetManifest], root: &Path, quiet: bool) -> Result<MirrorReport> {
    let mut total = MirrorReport::default();
    let log = |event: &MirrorEvent| match event {
        MirrorEvent::Downloaded { .. } => eprintln!("  {} {}", green("✓"), dim(&event.to_string())),
        MirrorEvent::Failed { .. } => eprintln!("  {} {}", red("✗"), event),
    };

    for manifest in manifests {
        // block_in_place keeps the callback borrow valid while moving the
        // blocking downloads off the async executor's hot path.
        let report = tokio::task::block_in_place(|| {
            mirror_assets(
                manifest,
                root,
                if quiet {
                    None
                } else {
                    Some(&log as &dyn Fn(&MirrorEvent))
                },
            )
        })
        .context("Failed to mirror assets")?;
        total.downloaded += report.downloaded;
        total.failed += report.failed;
        total.bytes += report.bytes;
    }
    Ok(total)
}

/// Map the config file and CLI overrides to `SyncConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SyncConfig> {
    let mut builder: SyncConfigBuilder = match cli.config {
        Some(ref path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
            .into_builder(),
        None => SyncConfig::builder(),
    };

    if let Some(ref key) = cli.api_key {
        builder = builder.store_credential(key.clone());
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(ref url) = cli.api_base_url {
        builder = builder.api_base_url(url.clone());
    }
    if let Some(ref name) = cli.cv_file {
        builder = builder.cv_file_name(name.clone());
    }
    if let Some(n) = cli.page_size {
        builder = builder.page_size(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
