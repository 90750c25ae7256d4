//! `forge resolve` command implementation.

use clap::Args;
use forge_paths::PageLocation;
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Page location, e.g. `/services/donation-form-optimization.html`.
    location: String,

    /// Fragment names to resolve.
    #[arg(short, long, value_delimiter = ',', default_value = "navbar,footer")]
    fragments: Vec<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Resolution {
    segments: Vec<String>,
    is_root: bool,
    depth: usize,
    prefix: &'static str,
    fragments: Vec<FragmentPath>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct FragmentPath {
    name: String,
    path: String,
}

fn resolve(location: &str, fragments: &[String]) -> Resolution {
    let location = PageLocation::parse(location);
    Resolution {
        segments: location.segments().to_vec(),
        is_root: location.is_root(),
        depth: location.depth(),
        prefix: location.prefix(),
        fragments: fragments
            .iter()
            .map(|name| FragmentPath {
                name: name.clone(),
                path: location.fragment_path(name),
            })
            .collect(),
    }
}

impl ResolveArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let resolution = resolve(&self.location, &self.fragments);

        if self.json {
            output.data(&serde_json::to_string_pretty(&resolution)?)?;
            return Ok(());
        }

        output.field("depth", &resolution.depth.to_string())?;
        output.field("prefix", &format!("{:?}", resolution.prefix))?;
        for fragment in &resolution.fragments {
            output.field(&fragment.name, &fragment.path)?;
        }
        Ok(())
    }
}
