//! Configuration management for forge.
//!
//! Parses `forge.toml` with serde and provides auto-discovery of the config
//! file in the current directory and its parents.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.root_dir`
//! - `site.output_dir`
//! - `content.content_dir`
//! - `content.tina.url`
//! - `content.tina.token`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the site root directory.
    pub root_dir: Option<PathBuf>,
    /// Override the assembly output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the content backend.
    pub backend: Option<ContentBackend>,
    /// Override the local content directory.
    pub content_dir: Option<PathBuf>,
    /// Override the CMS GraphQL endpoint.
    pub tina_url: Option<String>,
    /// Override whether content records are published into page zones.
    pub publish: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "forge.toml";

/// Local GraphQL endpoint served by the CMS in development mode.
pub const DEFAULT_TINA_URL: &str = "http://localhost:4001/graphql";

/// Fragments injected into every page unless configured otherwise.
const DEFAULT_FRAGMENTS: [&str; 2] = ["navbar", "footer"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root_dir: Option<String>,
    output_dir: Option<String>,
    fragments: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    strip_loader: Option<bool>,
    publish: Option<bool>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Directory holding the static pages and `components/`.
    pub root_dir: PathBuf,
    /// Directory assembled pages are written to.
    pub output_dir: PathBuf,
    /// Fragment names; each fills the element with id `<name>-placeholder`.
    pub fragments: Vec<String>,
    /// Glob patterns (relative to `root_dir`) of pages to skip.
    pub exclude: Vec<String>,
    /// Remove the client-side component loader script once every
    /// placeholder of a page was filled.
    ///
    /// Off by default: the loader script also initializes the mobile menu and
    /// the dropdown toggles, so stripping it leaves those inert unless the
    /// site ships that behavior in another script.
    pub strip_loader: bool,
    /// Fill the `<!-- START: ZONE -->` marker zones of pages with records
    /// from the content store before fragments are injected.
    pub publish: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl SiteConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            root_dir: base.join("site"),
            output_dir: base.join("dist"),
            fragments: DEFAULT_FRAGMENTS.iter().map(|&s| s.to_owned()).collect(),
            exclude: Vec::new(),
            strip_loader: false,
            publish: false,
        }
    }
}

/// Which content store backs the content fetcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    /// MDX files on disk.
    #[default]
    Local,
    /// The CMS GraphQL API.
    Tina,
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    backend: Option<ContentBackend>,
    content_dir: Option<String>,
    tina: Option<TinaConfig>,
}

/// CMS GraphQL API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TinaConfig {
    /// GraphQL endpoint URL.
    pub url: String,
    /// Read-only API token, sent as `X-API-KEY` when set.
    pub token: Option<String>,
    /// Global HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TinaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TINA_URL.to_owned(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Resolved content configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    pub backend: ContentBackend,
    /// Root of the local MDX tree (`services/`, `case-studies/`, `pages/`).
    pub content_dir: PathBuf,
    pub tina: TinaConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl ContentConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            backend: ContentBackend::Local,
            content_dir: base.join("content"),
            tina: TinaConfig::default(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.tina.token`").
        field: String,
        /// Error message (e.g., "${`TINA_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `forge.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root_dir) = &settings.root_dir {
            self.site_resolved.root_dir.clone_from(root_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(backend) = settings.backend {
            self.content_resolved.backend = backend;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(url) = &settings.tina_url {
            self.content_resolved.tina.url.clone_from(url);
        }
        if let Some(publish) = settings.publish {
            self.site_resolved.publish = publish;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            content: ContentConfigRaw::default(),
            site_resolved: SiteConfig::with_base(base),
            content_resolved: ContentConfig::with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_content()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        for name in &self.site_resolved.fragments {
            require_non_empty(name, "site.fragments")?;
            if name.contains(['/', '\\']) || name == ".." {
                return Err(ConfigError::Validation(format!(
                    "site.fragments entry {name:?} must be a plain name"
                )));
            }
        }
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        // The endpoint only matters when the CMS backend is selected
        if self.content_resolved.backend == ContentBackend::Tina {
            let url = &self.content_resolved.tina.url;
            require_non_empty(url, "content.tina.url")?;
            require_http_url(url, "content.tina.url")?;
        }

        if self.content_resolved.tina.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content.tina.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.root_dir = expand::expand_env_opt(self.site.root_dir.as_deref(), "site.root_dir")?;
        self.site.output_dir =
            expand::expand_env_opt(self.site.output_dir.as_deref(), "site.output_dir")?;
        self.content.content_dir =
            expand::expand_env_opt(self.content.content_dir.as_deref(), "content.content_dir")?;

        if let Some(ref mut tina) = self.content.tina {
            tina.url = expand::expand_env(&tina.url, "content.tina.url")?;
            // An empty token after expansion means "no token"
            tina.token = expand::expand_env_opt(tina.token.as_deref(), "content.tina.token")?
                .filter(|t| !t.is_empty());
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let defaults = SiteConfig::with_base(config_dir);

        self.site_resolved = SiteConfig {
            root_dir: resolve(self.site.root_dir.as_deref(), "site"),
            output_dir: resolve(self.site.output_dir.as_deref(), "dist"),
            fragments: self.site.fragments.clone().unwrap_or(defaults.fragments),
            exclude: self.site.exclude.clone().unwrap_or_default(),
            strip_loader: self.site.strip_loader.unwrap_or(defaults.strip_loader),
            publish: self.site.publish.unwrap_or(defaults.publish),
        };

        self.content_resolved = ContentConfig {
            backend: self.content.backend.unwrap_or_default(),
            content_dir: resolve(self.content.content_dir.as_deref(), "content"),
            tina: self.content.tina.clone().unwrap_or_default(),
        };
    }
}
