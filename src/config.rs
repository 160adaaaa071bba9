use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::rendering::title_case::TitleCaseStyle;

/// Site settings read from the Hugo site configuration.
///
/// Keys are matched case-insensitively, the way Hugo reads them, so the
/// usual `baseURL` / `summaryLength` spellings land on the lowercased
/// field names below. Unknown keys (menus, params, languages...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(rename = "baseurl", alias = "baseURL")]
    pub base_url: String,
    pub title: String,
    #[serde(rename = "contentdir", alias = "contentDir")]
    pub content_dir: PathBuf,
    #[serde(rename = "publishdir", alias = "publishDir")]
    pub publish_dir: PathBuf,
    /// Word count of automatic summaries.
    #[serde(rename = "summarylength", alias = "summaryLength")]
    pub summary_length: usize,
    #[serde(rename = "titlecasestyle", alias = "titleCaseStyle")]
    pub title_case_style: TitleCaseStyle,
    #[serde(rename = "disablepathtolower", alias = "disablePathToLower")]
    pub disable_path_to_lower: bool,
    /// Include pages whose publish date lies in the future.
    #[serde(rename = "buildfuture", alias = "buildFuture")]
    pub build_future: bool,
    /// Include pages whose expiry date has passed.
    #[serde(rename = "buildexpired", alias = "buildExpired")]
    pub build_expired: bool,
    pub search_index: SearchIndexConfig,
}

/// Settings of the generated index file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIndexConfig {
    /// Output file, relative to the publish directory unless absolute.
    pub output: PathBuf,
    pub pretty: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            title: String::new(),
            content_dir: PathBuf::from("content"),
            publish_dir: PathBuf::from("public"),
            summary_length: 70,
            title_case_style: TitleCaseStyle::default(),
            disable_path_to_lower: false,
            build_future: false,
            build_expired: false,
            search_index: SearchIndexConfig::default(),
        }
    }
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("search.json"),
            pretty: false,
        }
    }
}

impl SiteConfig {
    /// Load the configuration: defaults, then the site config file, then
    /// `SITE_INDEX_*` environment variables (`__` separates nested keys).
    ///
    /// A missing file is only an error when `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        Self::load_with_env(path, required, environment())
    }

    fn load_with_env(path: &Path, required: bool, env: Environment) -> Result<Self> {
        if required && !path.exists() {
            return Err(IndexError::Config(format!(
                "config file '{}' not found",
                path.display()
            )));
        }

        let settings = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(env)
            .build()?;

        let config: SiteConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            "Loaded site config from {} (baseURL {})",
            path.display(),
            config.base_url
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.summary_length == 0 {
            return Err(IndexError::Config("summaryLength must be > 0".into()));
        }
        if self.search_index.output.as_os_str().is_empty() {
            return Err(IndexError::Config("search_index.output cannot be empty".into()));
        }
        Ok(())
    }

    /// Path part of `baseURL`, always starting and ending with `/`.
    ///
    /// `https://example.com/docs` yields `/docs/`; a bare host yields `/`.
    pub fn base_path(&self) -> String {
        let raw = match self.base_url.split_once("://") {
            Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
            None => self.base_url.as_str(),
        };

        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }

    /// Content directory resolved against the site root.
    pub fn content_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.content_dir)
    }

    /// Index file location resolved against the site root.
    pub fn output_path(&self, site_root: &Path) -> PathBuf {
        if self.search_index.output.is_absolute() {
            self.search_index.output.clone()
        } else {
            site_root
                .join(&self.publish_dir)
                .join(&self.search_index.output)
        }
    }
}

/// `SITE_INDEX_SUMMARYLENGTH`, `SITE_INDEX_SEARCH_INDEX__PRETTY`, ...
fn environment() -> Environment {
    Environment::with_prefix("SITE_INDEX")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
