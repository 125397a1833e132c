//! CLI output formatting for every command.
//!
//! Output is information-first: each entity leads with a positional index and
//! its title, with ids and paths as indented context lines.
//!
//! # Output Format
//!
//! ## Manifest
//!
//! ```text
//! Novel (2 projects)
//!     zh
//!         001 月光
//!             Source: novel/novel-1/
//!     en
//!         001 Moonlight
//!             Source: novel/novel-1-en/
//!
//! Manifest: 2 projects → data/site-network/manifest.json
//! ```
//!
//! ## Build
//!
//! ```text
//! novel-site
//!     001 月光 → novel-site/novel-1/index.html (3 chapters)
//! novel-site-en
//!     001 Moonlight → novel-site-en/novel-1-en/index.html (3 chapters)
//!
//! Skipped
//!     game/game-2
//!
//! Generated 2 project pages, 6 child pages, 16 network pages, 0 images
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::content::ContentType;
use crate::distribution::DistributionPlan;
use crate::generator::FabricatedProject;
use crate::language::LanguageCatalog;
use crate::manifest::Manifest;
use crate::site::SiteReport;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 project`, `3 projects`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Child count with the type's collection noun: `3 chapters`, `1 episode`.
fn child_count(content_type: ContentType, count: usize) -> Option<String> {
    content_type
        .page_prefix()
        .map(|prefix| plural(count, prefix))
}

// ============================================================================
// manifest / check
// ============================================================================

/// Format the manifest grouped by type, then language.
///
/// Empty language buckets are omitted; empty types still show their header.
pub fn format_manifest_output(manifest: &Manifest, catalog: &LanguageCatalog) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, content_type) in ContentType::ALL.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} ({})",
            content_type.label(),
            plural(manifest.count(content_type), "project")
        ));
        for language in catalog.languages() {
            let bucket = manifest.bucket(content_type, language);
            if bucket.is_empty() {
                continue;
            }
            lines.push(format!("{}{}", indent(1), language));
            for (pos, entry) in bucket.iter().enumerate() {
                lines.push(format!("{}{} {}", indent(2), format_index(pos + 1), entry.title));
                lines.push(format!(
                    "{}Source: {}/{}/",
                    indent(3),
                    content_type.dir_name(),
                    entry.id
                ));
            }
        }
    }

    lines
}

pub fn print_manifest_output(manifest: &Manifest, catalog: &LanguageCatalog, written: &Path) {
    for line in format_manifest_output(manifest, catalog) {
        println!("{}", line);
    }
    println!();
    println!(
        "Manifest: {} → {}",
        plural(manifest.total(), "project"),
        written.display()
    );
}

/// One-line-per-type summary used by `check`.
pub fn format_summary(manifest: &Manifest, catalog: &LanguageCatalog) -> Vec<String> {
    let languages: Vec<String> = catalog
        .languages()
        .iter()
        .map(|l| {
            if catalog.is_default(l) {
                format!("{l} (default)")
            } else {
                l.clone()
            }
        })
        .collect();

    let mut lines = vec![format!("Languages: {}", languages.join(", "))];
    for content_type in ContentType::ALL {
        let per_language: Vec<String> = catalog
            .languages()
            .iter()
            .map(|l| format!("{l}={}", manifest.bucket(content_type, l).len()))
            .collect();
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            content_type.label(),
            per_language.join(" ")
        ));
    }
    lines
}

pub fn print_summary(manifest: &Manifest, catalog: &LanguageCatalog) {
    for line in format_summary(manifest, catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format site build output: projects grouped by site directory.
pub fn format_site_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_site: Option<&str> = None;
    let mut pos = 0;

    for project in &report.projects {
        let site = project.path.split('/').next().unwrap_or_default();
        if current_site != Some(site) {
            lines.push(site.to_string());
            current_site = Some(site);
            pos = 0;
        }
        pos += 1;
        let mut line = format!(
            "{}{} {} → {}",
            indent(1),
            format_index(pos),
            project.title,
            project.path
        );
        if let Some(count) = child_count(project.content_type, project.children) {
            line.push_str(&format!(" ({count})"));
        }
        lines.push(line);
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!("{}{}", indent(1), skipped));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        plural(report.projects.len(), "project page"),
        plural(report.child_pages(), "child page"),
        plural(report.network_pages.len(), "network page"),
        plural(report.images(), "image"),
    ));
    lines
}

pub fn print_site_output(report: &SiteReport) {
    for line in format_site_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// fabricate
// ============================================================================

/// ```text
/// 001 novel ip-5-novel [zh] (3 chapters)
/// 002 novel ip-5-novel-en [en] (3 chapters)
/// ```
pub fn format_fabricate_output(written: &[FabricatedProject]) -> Vec<String> {
    written
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut line = format!(
                "{} {} {} [{}]",
                format_index(i + 1),
                p.content_type,
                p.variant_id,
                p.language
            );
            if let Some(count) = child_count(p.content_type, p.children) {
                line.push_str(&format!(" ({count})"));
            }
            line
        })
        .collect()
}

pub fn print_fabricate_output(written: &[FabricatedProject]) {
    for line in format_fabricate_output(written) {
        println!("{}", line);
    }
}

// ============================================================================
// distribute
// ============================================================================

/// ```text
/// Planned
/// 001 novel novel-1 → novel-1-en [en]
///     Template: novel-scroll
///     Units: 1, 2, 10
/// Skipped
/// 001 novel novel-1 [fr]
///     Reason: Not found: novel-1-fr
/// ```
pub fn format_distribution_output(plan: &DistributionPlan) -> Vec<String> {
    let mut lines = vec!["Planned".to_string()];
    for (i, entry) in plan.planned.iter().enumerate() {
        lines.push(format!(
            "{} {} {} → {} [{}]",
            format_index(i + 1),
            entry.content_type,
            entry.base_id,
            entry.source,
            entry.language
        ));
        let template = serde_json::to_value(entry.template)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        lines.push(format!("{}Template: {}", indent(1), template));
        let units: Vec<String> = entry.units.iter().map(u32::to_string).collect();
        lines.push(format!("{}Units: {}", indent(1), units.join(", ")));
    }

    if !plan.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for (i, entry) in plan.skipped.iter().enumerate() {
            lines.push(format!(
                "{} {} {} [{}]",
                format_index(i + 1),
                entry.content_type,
                entry.base_id,
                entry.language
            ));
            lines.push(format!("{}Reason: {}", indent(1), entry.reason));
        }
    }

    lines.push(format!(
        "Distribution: {} planned, {} skipped",
        plan.planned.len(),
        plan.skipped.len()
    ));
    lines
}

pub fn print_distribution_output(plan: &DistributionPlan, written: &Path) {
    for line in format_distribution_output(plan) {
        println!("{}", line);
    }
    println!("Written to {}", written.display());
}
