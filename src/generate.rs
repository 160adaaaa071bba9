use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::site::Site;
use crate::error::Result;
use crate::rendering::markdown::MarkdownRenderer;
use crate::search::builder::build_index;
use crate::search::record::PageRecord;
use crate::search::writer::write_index;

/// Options of a single generation pass.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Site root holding the config file and the content directory.
    pub site_root: PathBuf,
    /// Overrides the configured output location.
    pub output: Option<PathBuf>,
    /// Build the records without writing the index.
    pub dry_run: bool,
}

/// Outcome of a generation pass.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub records: Vec<PageRecord>,
    /// Where the index was written, `None` on dry runs.
    pub output: Option<PathBuf>,
}

/// Core generation logic, separated from the CLI for testability.
///
/// Loads the site, builds every record and, unless this is a dry run,
/// replaces the index file. Nothing is written when any page fails.
pub fn process_generate(config: SiteConfig, request: &GenerateRequest) -> Result<GenerateResponse> {
    process_generate_at(config, request, Utc::now())
}

/// Like [`process_generate`], with an explicit clock for publish dates.
pub fn process_generate_at(
    config: SiteConfig,
    request: &GenerateRequest,
    now: DateTime<Utc>,
) -> Result<GenerateResponse> {
    config.validate()?;

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(&request.site_root));
    let pretty = config.search_index.pretty;
    let renderer = MarkdownRenderer::from_config(&config);

    let content_dir = config.content_path(&request.site_root);
    tracing::info!("Indexing content in {}", content_dir.display());

    let site = Site::load_at(&request.site_root, config, now)?;
    let records = build_index(&site, &renderer)?;

    if request.dry_run {
        tracing::info!("Dry run: {} records, nothing written", records.len());
        return Ok(GenerateResponse {
            records,
            output: None,
        });
    }

    write_index(&output, &records, pretty)?;

    Ok(GenerateResponse {
        records,
        output: Some(output),
    })
}

/// Default location of the site config file under `site_root`.
pub fn default_config_path(site_root: &Path) -> PathBuf {
    site_root.join("config.toml")
}
