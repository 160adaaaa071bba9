use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use site_index::generate::default_config_path;
use site_index::{process_generate, GenerateRequest, SiteConfig};

/// Generate the client-side search index of a Hugo documentation site.
#[derive(Debug, Parser)]
#[command(name = "site-index", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the index and replace the index file.
    Build(SiteArgs),
    /// Build the index in memory and report, without writing anything.
    Check(SiteArgs),
}

#[derive(Debug, Args)]
struct SiteArgs {
    /// Site root containing the config file and the content directory.
    #[arg(short, long, default_value = ".")]
    source: PathBuf,

    /// Site config file (defaults to <source>/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index file location (defaults to <publishDir>/search.json).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON document.
    #[arg(long)]
    pretty: bool,

    /// Include pages with a publish date in the future.
    #[arg(long)]
    build_future: bool,

    /// Include pages whose expiry date has passed.
    #[arg(long)]
    build_expired: bool,
}

impl SiteArgs {
    fn load_config(&self) -> Result<SiteConfig> {
        let (path, required) = match &self.config {
            Some(path) => (path.clone(), true),
            None => (default_config_path(&self.source), false),
        };

        let mut config = SiteConfig::load(&path, required)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        config.search_index.pretty |= self.pretty;
        config.build_future |= self.build_future;
        config.build_expired |= self.build_expired;
        Ok(config)
    }

    fn request(&self, dry_run: bool) -> GenerateRequest {
        GenerateRequest {
            site_root: self.source.clone(),
            output: self.output.clone(),
            dry_run,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_index=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            let config = args.load_config()?;
            let response = process_generate(config, &args.request(false))
                .context("Search index generation failed")?;
            if let Some(output) = response.output {
                tracing::info!(
                    "Indexed {} pages into {}",
                    response.records.len(),
                    output.display()
                );
            }
        }
        Commands::Check(args) => {
            let config = args.load_config()?;
            let response = process_generate(config, &args.request(true))
                .context("Search index check failed")?;
            tracing::info!("{} pages would be indexed", response.records.len());
        }
    }

    Ok(())
}
