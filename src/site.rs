//! Static HTML site generation.
//!
//! Consumes the [`Manifest`] and the [`ContentRepository`] and writes one
//! site per content type per language, plus a network index tying them
//! together.
//!
//! ## Output Structure
//!
//! ```text
//! sites/
//! ├── network/
//! │   ├── index.html                 # Project counts per type and language
//! │   ├── novel-zh/index.html        # Project list for one type + language
//! │   └── novel-en/index.html
//! ├── novel-site/                    # Default language: no suffix
//! │   └── novel-1/
//! │       ├── index.html             # Metadata + chapter list
//! │       ├── chapter-1.html         # Prev/next navigation
//! │       └── chapter-10.html
//! ├── novel-site-en/
//! │   └── novel-1-en/...
//! └── comic-site-en/
//!     └── comic-1-en/
//!         ├── episode-1.html
//!         └── images/                # Copied, falling back to the base variant
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating with
//! automatic escaping. Chapter and episode bodies are rendered as markdown.
//! CSS is embedded from `static/style.css` with colors injected from config.
//! Every link is relative, so the output can be served from any path.

use crate::config::{self, SiteConfig};
use crate::content::{ChildRecord, ContentType, Metadata};
use crate::language::LanguageCatalog;
use crate::manifest::{Manifest, ManifestEntry};
use crate::naming::child_page_name;
use crate::repository::{ContentError, ContentRepository};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Directory holding the network index pages.
pub const NETWORK_DIR: &str = "network";

/// Site directory for a type in a language: `novel-site`, `novel-site-en`.
pub fn site_dir_name(catalog: &LanguageCatalog, content_type: ContentType, language: &str) -> String {
    format!("{content_type}-site{}", catalog.suffix(language))
}

/// A project page that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltProject {
    pub content_type: ContentType,
    pub language: String,
    pub id: String,
    pub title: String,
    /// Path of the project's `index.html`, relative to the output directory.
    pub path: String,
    pub children: usize,
    pub images: usize,
}

/// Everything a build wrote or skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    /// Network pages, relative to the output directory.
    pub network_pages: Vec<String>,
    pub projects: Vec<BuiltProject>,
    /// `type/id` of projects whose metadata could not be loaded.
    pub skipped: Vec<String>,
}

impl SiteReport {
    pub fn child_pages(&self) -> usize {
        self.projects.iter().map(|p| p.children).sum()
    }

    pub fn images(&self) -> usize {
        self.projects.iter().map(|p| p.images).sum()
    }
}

pub struct SiteBuilder<'r, 'a> {
    repo: &'r ContentRepository<'a>,
    manifest: &'r Manifest,
    config: &'r SiteConfig,
}

impl<'r, 'a> SiteBuilder<'r, 'a> {
    pub fn new(repo: &'r ContentRepository<'a>, manifest: &'r Manifest, config: &'r SiteConfig) -> Self {
        Self {
            repo,
            manifest,
            config,
        }
    }

    /// Write every site under `output_dir`.
    pub fn build(&self, output_dir: &Path) -> Result<SiteReport, SiteError> {
        let catalog = self.repo.catalog();
        let color_css = config::generate_color_css(&self.config.colors);
        let css = format!("{}\n\n{}", color_css, CSS_STATIC);
        let mut report = SiteReport::default();

        fs::create_dir_all(output_dir)?;

        let index = render_network_index(self.manifest, catalog, &self.config.title, &css);
        write_page(&output_dir.join(NETWORK_DIR).join("index.html"), index)?;
        report.network_pages.push(format!("{NETWORK_DIR}/index.html"));

        for content_type in ContentType::ALL {
            for language in catalog.languages() {
                let entries = self.manifest.bucket(content_type, language);
                let mut built = Vec::new();
                for entry in entries {
                    match self.build_project(output_dir, content_type, language, entry, &css)? {
                        Some(project) => {
                            built.push(entry.id.as_str());
                            report.projects.push(project);
                        }
                        None => report.skipped.push(format!("{content_type}/{}", entry.id)),
                    }
                }

                let rel = format!("{NETWORK_DIR}/{content_type}-{language}/index.html");
                let listing = render_type_listing(
                    content_type,
                    language,
                    entries,
                    &built,
                    catalog,
                    &self.config.title,
                    &css,
                );
                write_page(&output_dir.join(&rel), listing)?;
                report.network_pages.push(rel);
            }
        }

        debug!(
            projects = report.projects.len(),
            skipped = report.skipped.len(),
            "site build finished"
        );
        Ok(report)
    }

    /// Write one project page, its child pages and images.
    ///
    /// Returns `None` when the project's metadata cannot be loaded, whatever
    /// the reason.
    fn build_project(
        &self,
        output_dir: &Path,
        content_type: ContentType,
        language: &str,
        entry: &ManifestEntry,
        css: &str,
    ) -> Result<Option<BuiltProject>, SiteError> {
        let catalog = self.repo.catalog();
        let metadata = match self.repo.get_metadata(content_type, &entry.id) {
            Ok(m) => m,
            Err(e) => {
                warn!(%content_type, id = %entry.id, error = %e, "skipping project without readable metadata");
                return Ok(None);
            }
        };

        let children = if content_type.has_children() {
            self.repo
                .load_children(content_type, &entry.id)
                .unwrap_or_else(|e| {
                    warn!(%content_type, id = %entry.id, error = %e, "could not load children");
                    Vec::new()
                })
        } else {
            Vec::new()
        };

        let site_dir = site_dir_name(catalog, content_type, language);
        let project_dir = output_dir.join(&site_dir).join(&entry.id);
        fs::create_dir_all(&project_dir)?;

        let images = match self.image_source(content_type, &entry.id) {
            Some(src) => copy_images(&src, &project_dir.join("images"))?,
            None => Vec::new(),
        };

        let page = ProjectPage {
            content_type,
            language,
            title: &entry.title,
            metadata: &metadata,
            children: &children,
            links: &self.ip_links(content_type, language, &metadata),
            images: &images,
        };
        write_page(
            &project_dir.join("index.html"),
            render_project_page(&page, &self.config.title, css),
        )?;

        if let Some(prefix) = content_type.page_prefix() {
            for (idx, child) in children.iter().enumerate() {
                let prev = idx.checked_sub(1).and_then(|i| children.get(i));
                let next = children.get(idx + 1);
                let markup = render_child_page(&page, child, prev, next, prefix, &self.config.title, css);
                write_page(&project_dir.join(child_page_name(prefix, child.id)), markup)?;
            }
        }

        Ok(Some(BuiltProject {
            content_type,
            language: language.to_string(),
            id: entry.id.clone(),
            title: entry.title.clone(),
            path: format!("{site_dir}/{}/index.html", entry.id),
            children: children.len(),
            images: images.len(),
        }))
    }

    /// `images/` of the variant, or of its base variant when it has none.
    fn image_source(&self, content_type: ContentType, variant_id: &str) -> Option<PathBuf> {
        let own = self.repo.project_dir(content_type, variant_id).join("images");
        if own.is_dir() {
            return Some(own);
        }
        let base_id = self.repo.catalog().base_of(variant_id);
        let base = self.repo.project_dir(content_type, base_id).join("images");
        base.is_dir().then_some(base)
    }

    /// Links from an IP page to its projects, resolved with fallback.
    fn ip_links(&self, content_type: ContentType, language: &str, metadata: &Metadata) -> Vec<ProjectLink> {
        if content_type != ContentType::Ip {
            return Vec::new();
        }
        let catalog = self.repo.catalog();
        [
            ("novelId", ContentType::Novel),
            ("dramaId", ContentType::Drama),
            ("comicId", ContentType::Comic),
        ]
        .into_iter()
        .filter_map(|(key, linked_type)| {
            let linked = metadata.get(key).and_then(Value::as_str)?;
            let base_id = catalog.base_of(linked);
            let href = match self.repo.resolve(linked_type, base_id, Some(language)) {
                Ok(resolved) => Some(format!(
                    "../../{}/{}/index.html",
                    site_dir_name(catalog, linked_type, &resolved.language),
                    resolved.variant_id
                )),
                Err(e) => {
                    debug!(key, linked, error = %e, "IP link does not resolve");
                    None
                }
            };
            Some(ProjectLink {
                content_type: linked_type,
                id: linked.to_string(),
                href,
            })
        })
        .collect()
    }
}

fn write_page(path: &Path, markup: Markup) -> Result<(), SiteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())?;
    Ok(())
}

/// Copy an image tree, returning copied files relative to `dst`, sorted.
fn copy_images(src: &Path, dst: &Path) -> Result<Vec<String>, SiteError> {
    let mut copied = Vec::new();
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            copied.push(rel);
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

struct ProjectLink {
    content_type: ContentType,
    id: String,
    /// `None` when neither the translation nor the base exists.
    href: Option<String>,
}

struct ProjectPage<'p> {
    content_type: ContentType,
    language: &'p str,
    title: &'p str,
    metadata: &'p Metadata,
    children: &'p [ChildRecord],
    links: &'p [ProjectLink],
    images: &'p [String],
}

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb
fn site_header(breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
        }
    }
}

fn render_markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut html_output = String::new();
    md_html::push_html(&mut html_output, parser);
    PreEscaped(html_output)
}

/// Metadata value as display text: strings verbatim, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn child_label(child: &ChildRecord, prefix: &str) -> String {
    if child.title.trim().is_empty() {
        format!("{prefix} {}", child.id)
    } else {
        child.title.clone()
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders `network/index.html`: project counts per type and language
fn render_network_index(
    manifest: &Manifest,
    catalog: &LanguageCatalog,
    site_title: &str,
    css: &str,
) -> Markup {
    let breadcrumb = html! { (site_title) };
    let content = html! {
        (site_header(breadcrumb))
        main.network-page {
            h1 { (site_title) }
            table.network-table {
                thead {
                    tr {
                        th { "Type" }
                        @for language in catalog.languages() {
                            th { (language) }
                        }
                    }
                }
                tbody {
                    @for content_type in ContentType::ALL {
                        tr {
                            th { (content_type.label()) }
                            @for language in catalog.languages() {
                                @let count = manifest.bucket(content_type, language).len();
                                td class=[(count == 0).then_some("empty")] {
                                    a href={ (content_type.dir_name()) "-" (language) "/index.html" } { (count) }
                                }
                            }
                        }
                    }
                }
            }
            p.muted { (manifest.total()) " projects" }
        }
    };
    base_document(site_title, catalog.default_language(), css, content)
}

/// Renders `network/<type>-<lang>/index.html`: every project in one bucket.
/// Only ids in `built` get a link.
fn render_type_listing(
    content_type: ContentType,
    language: &str,
    entries: &[ManifestEntry],
    built: &[&str],
    catalog: &LanguageCatalog,
    site_title: &str,
    css: &str,
) -> Markup {
    let site_dir = site_dir_name(catalog, content_type, language);
    let heading = format!("{} ({language})", content_type.label());
    let breadcrumb = html! {
        a href="../index.html" { (site_title) }
        " › "
        (heading)
    };
    let content = html! {
        (site_header(breadcrumb))
        main.listing-page {
            h1 { (heading) }
            @if entries.is_empty() {
                p.muted { "No projects yet." }
            } @else {
                ol.project-list {
                    @for entry in entries {
                        li {
                            @if built.contains(&entry.id.as_str()) {
                                a href={ "../../" (site_dir) "/" (entry.id) "/index.html" } { (entry.title) }
                            } @else {
                                span.muted { (entry.title) " (unavailable)" }
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(&heading, language, css, content)
}

fn project_breadcrumb(page: &ProjectPage, site_title: &str, depth_to_root: &str) -> Markup {
    html! {
        a href={ (depth_to_root) "network/index.html" } { (site_title) }
        " › "
        a href={ (depth_to_root) "network/" (page.content_type.dir_name()) "-" (page.language) "/index.html" } {
            (page.content_type.label())
        }
        " › "
        (page.title)
    }
}

/// Renders a project page: metadata, child list, IP links, images
fn render_project_page(page: &ProjectPage, site_title: &str, css: &str) -> Markup {
    let prefix = page.content_type.page_prefix();
    let fields: Vec<(&str, String)> = page
        .metadata
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "title" | "id" | "description"))
        .map(|(key, value)| (key.as_str(), display_value(value)))
        .collect();
    let description = page.metadata.get("description").and_then(Value::as_str);

    let content = html! {
        (site_header(project_breadcrumb(page, site_title, "../../")))
        main.project-page {
            h1 { (page.title) }
            @if let Some(desc) = description {
                div.project-description { (render_markdown(desc)) }
            }
            @if !fields.is_empty() {
                dl.project-meta {
                    @for (key, value) in &fields {
                        dt { (key) }
                        dd { (value) }
                    }
                }
            }
            @if let Some(prefix) = prefix {
                h2 { (page.content_type.collection_key().unwrap_or(prefix)) }
                @if page.children.is_empty() {
                    p.muted { "Nothing published yet." }
                } @else {
                    ol.child-list {
                        @for child in page.children {
                            li {
                                a href=(child_page_name(prefix, child.id)) { (child_label(child, prefix)) }
                            }
                        }
                    }
                }
            }
            @if !page.links.is_empty() {
                h2 { "Projects" }
                ul.link-list {
                    @for link in page.links {
                        li {
                            (link.content_type.label()) ": "
                            @if let Some(href) = &link.href {
                                a href=(href) { (link.id) }
                            } @else {
                                span.muted { (link.id) " (unavailable)" }
                            }
                        }
                    }
                }
            }
            @if !page.images.is_empty() {
                div.images {
                    @for image in page.images {
                        img src={ "images/" (image) } alt=(image) loading="lazy";
                    }
                }
            }
        }
    };
    base_document(page.title, page.language, css, content)
}

/// Renders a chapter or episode page with prev/next navigation
fn render_child_page(
    page: &ProjectPage,
    child: &ChildRecord,
    prev: Option<&ChildRecord>,
    next: Option<&ChildRecord>,
    prefix: &str,
    site_title: &str,
    css: &str,
) -> Markup {
    let label = child_label(child, prefix);
    let panels = child
        .extra
        .get("panels")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let breadcrumb = html! {
        (project_breadcrumb(page, site_title, "../../"))
        " › "
        (label)
    };

    let content = html! {
        (site_header(breadcrumb))
        main.child-page {
            p.muted { a href="index.html" { (page.title) } }
            h1 { (label) }
            div.child-body { (render_markdown(&child.body)) }
            @if !panels.is_empty() {
                ol.panels {
                    @for panel in panels {
                        li { (panel.get("description").map(display_value).unwrap_or_default()) }
                    }
                }
            }
            nav.pager {
                @if let Some(p) = prev {
                    a.prev href=(child_page_name(prefix, p.id)) { "← " (child_label(p, prefix)) }
                } @else {
                    a.prev href="index.html" { "← " (page.title) }
                }
                @if let Some(n) = next {
                    a.next href=(child_page_name(prefix, n.id)) { (child_label(n, prefix)) " →" }
                } @else {
                    a.next href="index.html" { (page.title) " →" }
                }
            }
        }
    };
    base_document(&format!("{label} · {}", page.title), page.language, css, content)
}
