//! Pipeline stages for workspace-to-site synchronisation.
//!
//! Each submodule implements exactly one transformation step. Only [`fetch`]
//! touches the network; every other stage is a pure function over text or
//! records, so each can be tested without a remote store.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ normalize ──────────────────────────────▶ assemble ──▶ files
//!  │          ▲                                        ▲
//!  └▶ blocks ─┴▶ tidy ──▶ body ──▶ subtopics (projects) │
//!                           └────▶ cv (CV sections) ────┘
//! ```
//!
//! 1. [`fetch`]      — follow cursors until a collection or page body is drained
//! 2. [`properties`] — total, typed extractors over a page's property bag
//! 3. [`blocks`]     — flatten body blocks to prefixed lines (`### `, `- `, `**`)
//! 4. [`tidy`]       — line-ending and invisible-character hygiene
//! 5. [`body`]       — classify each line once into a [`body::DocumentLine`]
//! 6. [`subtopics`]  — project micro-format (`media:`, `### `, `image:` …)
//! 7. [`normalize`]  — per-collection property tables into typed records
//! 8. [`cv`]         — CV section bodies to balanced typeset lines
//! 9. [`escape`]     — reserved-character escaping for typeset output
//! 10. [`assemble`]  — record ordering and the final CV document

pub mod assemble;
pub mod blocks;
pub mod body;
pub mod cv;
pub mod escape;
pub mod fetch;
pub mod normalize;
pub mod properties;
pub mod subtopics;
pub mod tidy;
