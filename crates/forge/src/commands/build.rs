//! `forge build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use forge_config::{CliSettings, Config};
use forge_content::{ContentFetcher, store_from_config};
use forge_site::{HttpFragmentSource, SiteBuilder};
use tracing::{debug, info};

use crate::error::CliError;
use crate::output::Output;

/// Timeout for fetching fragments from a deployed site.
const FRAGMENT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Site source directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Load fragments from a deployed site instead of the source directory.
    #[arg(long, env = "FORGE_FRAGMENTS_URL")]
    fragments_url: Option<String>,

    /// Publish content records into page marker zones (overrides config).
    #[arg(long)]
    publish: bool,

    /// Path to configuration file (default: auto-discover forge.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            root_dir: self.site_dir,
            output_dir: self.output_dir,
            publish: self.publish.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            debug!("Using {}", path.display());
        }
        let site = config.site_resolved;
        let publish = site.publish;

        output.info(&format!("Source: {}", site.root_dir.display()));
        output.info(&format!("Output: {}", site.output_dir.display()));

        let mut builder = SiteBuilder::new(site);
        if let Some(url) = &self.fragments_url {
            output.info(&format!("Fragments: {url}"));
            builder = builder.with_source(Arc::new(HttpFragmentSource::new(
                url,
                FRAGMENT_FETCH_TIMEOUT,
            )));
        }

        if publish {
            info!(
                backend = ?config.content_resolved.backend,
                "Publishing content into page zones"
            );
            let store = store_from_config(&config.content_resolved);
            builder = builder.with_content(ContentFetcher::new(store));
        }

        let report = builder.build()?;
        info!(
            pages = report.pages_written,
            published = report.pages_published,
            "Build finished"
        );

        for error in &report.fragment_errors {
            output.warning(&format!("Warning: {error}"));
        }
        for page in &report.incomplete_pages {
            output.warning(&format!("Warning: {page} is missing a fragment placeholder"));
        }
        for page in &report.unpublished_pages {
            output.warning(&format!("Warning: {page} has no content markers"));
        }
        if publish {
            output.info(&format!("Published {} pages", report.pages_published));
        }

        output.success(&format!(
            "Built {} pages ({} placeholders filled, {} files copied) to {}",
            report.pages_written,
            report.placeholders_filled,
            report.files_copied,
            builder.config().output_dir.display()
        ));
        Ok(())
    }
}
