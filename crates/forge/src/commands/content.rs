//! `forge content` subcommand group.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use forge_config::{CliSettings, Config, ContentBackend};
use forge_content::{ContentFetcher, ContentType, Lookup, Record, RichBody, store_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Content commands.
#[derive(Subcommand)]
pub(crate) enum ContentCommand {
    /// List every record of a content type.
    List(ListArgs),
    /// Show one record by slug.
    Get(GetArgs),
}

impl ContentCommand {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::List(args) => args.execute(),
            Self::Get(args) => args.execute(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Local,
    Tina,
}

impl From<BackendArg> for ContentBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => Self::Local,
            BackendArg::Tina => Self::Tina,
        }
    }
}

/// Store selection shared by the content commands.
#[derive(Args)]
pub(crate) struct StoreArgs {
    /// Content backend (overrides config).
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Content directory for the local backend (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// GraphQL endpoint for the tina backend (overrides config).
    #[arg(long, env = "TINA_URL")]
    tina_url: Option<String>,

    /// Path to configuration file (default: auto-discover forge.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl StoreArgs {
    fn fetcher(&self) -> Result<ContentFetcher, CliError> {
        let cli_settings = CliSettings {
            backend: self.backend.map(Into::into),
            content_dir: self.content_dir.clone(),
            tina_url: self.tina_url.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        Ok(ContentFetcher::new(store_from_config(
            &config.content_resolved,
        )))
    }
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Content type: service, case-study or page.
    content_type: ContentType,

    #[command(flatten)]
    store: StoreArgs,
}

impl ListArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let summaries = self.store.fetcher()?.list_by_type(self.content_type);

        if self.store.json {
            output.data(&serde_json::to_string_pretty(&summaries)?)?;
            return Ok(());
        }

        if summaries.is_empty() {
            output.warning(&format!("No {} records", self.content_type));
        }
        for summary in &summaries {
            output.data(&format!("{}\t{}", summary.slug, summary.title))?;
        }
        Ok(())
    }
}

#[derive(Args)]
pub(crate) struct GetArgs {
    /// Content type: service, case-study or page.
    content_type: ContentType,

    /// Record slug (file name without extension).
    slug: String,

    #[command(flatten)]
    store: StoreArgs,
}

impl GetArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let fetcher = self.store.fetcher()?;

        let record = match fetcher.get_by_slug(self.content_type, &self.slug) {
            Lookup::Found(record) => record,
            Lookup::NotFound => {
                return Err(CliError::NotFound(format!(
                    "{} {:?} not found",
                    self.content_type, self.slug
                )));
            }
            Lookup::FetchFailed => {
                return Err(CliError::FetchFailed(format!(
                    "could not fetch {} {:?}",
                    self.content_type, self.slug
                )));
            }
        };

        if self.store.json {
            output.data(&serde_json::to_string_pretty(&record)?)?;
        } else {
            print_record(&output, &record)?;
        }
        Ok(())
    }
}

fn print_record(output: &Output, record: &Record) -> std::io::Result<()> {
    output.field("slug", &record.slug)?;
    output.field("title", &record.title)?;
    if !record.excerpt.is_empty() {
        output.field("excerpt", &record.excerpt)?;
    }
    if !record.image.is_empty() {
        output.field("image", &record.image)?;
    }
    match &record.body {
        Some(RichBody::Markdown(text)) => {
            output.data("")?;
            output.data(text)?;
        }
        Some(RichBody::Document(_)) => output.field("body", "(rich text document, use --json)")?,
        None => {}
    }
    Ok(())
}
