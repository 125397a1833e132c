//! # IP Factory
//!
//! A mock content factory. It fabricates fictional IP packages (a novel, a
//! drama, a comic and the IP record tying them together) in every configured
//! language as static JSON files, then aggregates them into a manifest and
//! builds static HTML sites from them. Generation is placeholder text only.
//!
//! # Architecture: Directory as Database
//!
//! Every project variant is a directory. The default language owns the bare
//! id and every other language appends its code:
//!
//! ```text
//! data/novel/novel-1/        default language (zh)
//! data/novel/novel-1-en/     English
//! data/novel/novel-1-fr/     French
//! ```
//!
//! One resolution rule is shared by every consumer: ask for `(novel-1, fr)`,
//! get `novel-1-fr` if it exists, else `novel-1`. The distribution planner is
//! the one exception: it resolves strictly and skips missing translations.
//!
//! ```text
//! 1. Fabricate  brief     →  data/<type>/<variant>/   (one variant per language)
//! 2. Manifest   data/     →  site-network/manifest.json
//! 3. Build      manifest  →  sites/                   (one site per type per language)
//! 4. Distribute ip.json   →  distribution/manifest.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`language`] | The language catalog and the variant id suffix convention |
//! | [`content`] | Content types, their on-disk layout, and child records |
//! | [`naming`] | `chapter-N.json` child file naming |
//! | [`resolve`] | `(base id, language)` → variant directory, with fallback |
//! | [`repository`] | Typed reads and writes over the content tree |
//! | [`manifest`] | Cross-type, cross-language manifest aggregation |
//! | [`query`] | Route-style list/get/child lookups with status codes |
//! | [`site`] | Static HTML sites rendered with Maud |
//! | [`distribution`] | Per-language distribution plan, strict resolution |
//! | [`generator`] | Placeholder text, phrase translation, and fabrication |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Suffix Is Authoritative
//!
//! A variant's language is read from its directory name, never from its
//! metadata. Generators still record a `language` field; when it disagrees
//! with the suffix the aggregator logs a warning and trusts the suffix.
//!
//! ## One Catalog, Passed Down
//!
//! The [`language::LanguageCatalog`] is built once from config and borrowed by
//! every component. There is no global language state.
//!
//! ## Deterministic Output
//!
//! Scans are sorted, maps are ordered, and nothing records a timestamp, so
//! rebuilding an unchanged tree rewrites byte-identical files.

pub mod config;
pub mod content;
pub mod distribution;
pub mod generator;
pub mod language;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod query;
pub mod repository;
pub mod resolve;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
