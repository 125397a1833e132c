//! Factory configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` that sits in the
//! project root. The file is sparse: stock defaults are serialized from the
//! `Default` impls below and the user's values are deep-merged on top.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_root = "data"        # Content type directories (novel/, drama/, ...)
//! site_dir = "sites"        # Static site output
//!
//! [languages]
//! default = "zh"            # Served from the unsuffixed variant id
//! supported = ["zh", "en", "jp", "kr", "es", "fr", "de", "it", "hi", "ar"]
//!
//! [site]
//! title = "IP Factory"
//!
//! [site.colors.light]
//! background = "#ffffff"
//! text = "#1a1a1a"
//! text_muted = "#6b6b6b"
//! border = "#e4e4e4"
//! link = "#8a2be2"
//! link_hover = "#5a1a9a"
//!
//! [site.colors.dark]
//! background = "#101014"
//! text = "#ececec"
//! text_muted = "#9a9a9a"
//! border = "#2c2c33"
//! link = "#c9a7ff"
//! link_hover = "#ffffff"
//!
//! [generation]
//! chapters = 10             # Novel chapters per fabricated project
//! episodes = 6              # Drama and comic episodes per fabricated project
//! panels_per_episode = 4    # Comic storyboard panels per episode
//!
//! [distribution]
//! languages = ["en"]        # Target languages for the distribution plan
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::language::LanguageCatalog;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Language catalog error: {0}")]
    Language(String),
}

/// Factory configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// Directory holding one subdirectory per content type.
    pub data_root: String,
    /// Directory the static sites are written to.
    pub site_dir: String,
    /// Supported languages and the default one.
    pub languages: LanguageSection,
    /// Static site presentation.
    pub site: SiteConfig,
    /// Placeholder generation sizes.
    pub generation: GenerationConfig,
    /// Distribution plan settings.
    pub distribution: DistributionConfig,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            site_dir: "sites".to_string(),
            languages: LanguageSection::default(),
            site: SiteConfig::default(),
            generation: GenerationConfig::default(),
            distribution: DistributionConfig::default(),
        }
    }
}

impl FactoryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_root.trim().is_empty() {
            return Err(ConfigError::Validation("data_root must not be empty".into()));
        }
        if self.site_dir.trim().is_empty() {
            return Err(ConfigError::Validation("site_dir must not be empty".into()));
        }
        if self.generation.chapters == 0 || self.generation.episodes == 0 {
            return Err(ConfigError::Validation(
                "generation.chapters and generation.episodes must be non-zero".into(),
            ));
        }
        if self.generation.panels_per_episode == 0 {
            return Err(ConfigError::Validation(
                "generation.panels_per_episode must be non-zero".into(),
            ));
        }
        if let Some(unknown) = self
            .distribution
            .languages
            .iter()
            .find(|l| !self.languages.supported.contains(l))
        {
            return Err(ConfigError::Validation(format!(
                "distribution.languages contains '{unknown}', which is not in languages.supported"
            )));
        }
        Ok(())
    }

    /// Build the language catalog described by the `[languages]` section.
    pub fn catalog(&self) -> Result<LanguageCatalog, ConfigError> {
        LanguageCatalog::load(&self.languages)
    }

    /// Data root resolved against the project root.
    pub fn data_root_in(&self, root: &Path) -> PathBuf {
        root.join(&self.data_root)
    }

    /// Site output directory resolved against the project root.
    pub fn site_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.site_dir)
    }
}

/// The `[languages]` section: the raw source a [`LanguageCatalog`] is loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageSection {
    /// Language whose content lives at the unsuffixed variant id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Every supported language, default included, in display order.
    pub supported: Vec<String>,
}

impl Default for LanguageSection {
    fn default() -> Self {
        Self {
            default: Some("zh".to_string()),
            supported: ["zh", "en", "jp", "kr", "es", "fr", "de", "it", "hi", "ar"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Static site presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Name shown in page titles and the network index header.
    pub title: String,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "IP Factory".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

/// Placeholder generation sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub chapters: u32,
    pub episodes: u32,
    pub panels_per_episode: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            chapters: 10,
            episodes: 6,
            panels_per_episode: 4,
        }
    }
}

/// Distribution plan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionConfig {
    /// Languages each linked project is planned for.
    pub languages: Vec<String>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: breadcrumbs, counts, footers.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#6b6b6b".to_string(),
            border: "#e4e4e4".to_string(),
            link: "#8a2be2".to_string(),
            link_hover: "#5a1a9a".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#101014".to_string(),
            text: "#ececec".to_string(),
            text_muted: "#9a9a9a".to_string(),
            border: "#2c2c33".to_string(),
            link: "#c9a7ff".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(FactoryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   overlay `supported` list replaces the stock list rather than extending it.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FactoryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FactoryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. The language catalog is checked separately by
/// [`FactoryConfig::catalog`].
pub fn load_config(root: &Path) -> Result<FactoryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# IP Factory Configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Directory holding one subdirectory per content type
# (novel/, drama/, comic/, game/, ip/).
data_root = "data"

# Directory the static sites are written to.
site_dir = "sites"

# ---------------------------------------------------------------------------
# Languages
# ---------------------------------------------------------------------------
[languages]
# Content in the default language lives at the bare project id
# (novel-1). Every other language lives at <id>-<lang> (novel-1-en).
default = "zh"

# Every supported language, default included. Codes must not contain '-'.
supported = ["zh", "en", "jp", "kr", "es", "fr", "de", "it", "hi", "ar"]

# ---------------------------------------------------------------------------
# Static site
# ---------------------------------------------------------------------------
[site]
title = "IP Factory"

[site.colors.light]
background = "#ffffff"
text = "#1a1a1a"
text_muted = "#6b6b6b"
border = "#e4e4e4"
link = "#8a2be2"
link_hover = "#5a1a9a"

[site.colors.dark]
background = "#101014"
text = "#ececec"
text_muted = "#9a9a9a"
border = "#2c2c33"
link = "#c9a7ff"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# Placeholder generation
# ---------------------------------------------------------------------------
[generation]
chapters = 10
episodes = 6
panels_per_episode = 4

# ---------------------------------------------------------------------------
# Distribution plan
# ---------------------------------------------------------------------------
[distribution]
# Target languages. Each must be listed in languages.supported.
languages = ["en"]
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}
