//! Shared HTML fragments and where they are loaded from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use forge_paths::{PageLocation, resolve_fragment_path, rewrite};
use rayon::prelude::*;
use tracing::{debug, warn};
use ureq::Agent;

use crate::error::{FragmentError, FragmentErrorKind};

/// A named HTML snippet shared across pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    /// Markup as stored, with links relative to the site root.
    pub html: String,
}

impl Fragment {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
        }
    }

    /// Id of the element this fragment is injected into.
    pub fn placeholder_id(&self) -> String {
        format!("{}-placeholder", self.name)
    }

    /// Markup with its internal links adjusted for a page at `location`.
    pub fn rewritten_for(&self, location: &PageLocation) -> String {
        rewrite(&self.html, location.depth())
    }
}

/// Somewhere fragment markup can be read from.
///
/// `path` is relative to the site root, e.g. `components/navbar.html`.
pub trait FragmentSource: Send + Sync {
    fn fetch(&self, path: &str) -> Result<String, FragmentErrorKind>;
}

/// Reads fragments from the site directory.
#[derive(Debug, Clone)]
pub struct FsFragmentSource {
    root: PathBuf,
}

impl FsFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FragmentSource for FsFragmentSource {
    fn fetch(&self, path: &str) -> Result<String, FragmentErrorKind> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|source| FragmentErrorKind::Io { path: full, source })
    }
}

/// Fetches fragments from a deployed copy of the site.
pub struct HttpFragmentSource {
    agent: Agent,
    base_url: String,
}

impl HttpFragmentSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl FragmentSource for HttpFragmentSource {
    fn fetch(&self, path: &str) -> Result<String, FragmentErrorKind> {
        let url = format!("{}/{path}", self.base_url);
        debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| FragmentErrorKind::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FragmentErrorKind::Http(format!("HTTP {status} from {url}")));
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| FragmentErrorKind::Http(e.to_string()))
    }
}

/// Fragments that loaded plus the failures for the rest.
#[derive(Debug, Default)]
pub struct LoadedFragments {
    pub fragments: Vec<Fragment>,
    pub errors: Vec<FragmentError>,
}

/// Load every named fragment in parallel.
///
/// Fragments are independent: one failing does not affect the others. Each
/// failure is logged and reported in [`LoadedFragments::errors`]; successful
/// fragments keep the order of `names`.
pub fn load_fragments<S: AsRef<str> + Sync>(
    source: &dyn FragmentSource,
    names: &[S],
) -> LoadedFragments {
    let results: Vec<Result<Fragment, FragmentError>> = names
        .par_iter()
        .map(|name| {
            let name = name.as_ref();
            source
                .fetch(&resolve_fragment_path(name, 0))
                .map(|html| Fragment::new(name, html))
                .map_err(|kind| FragmentError {
                    name: name.to_owned(),
                    kind,
                })
        })
        .collect();

    let mut loaded = LoadedFragments::default();
    for result in results {
        match result {
            Ok(fragment) => loaded.fragments.push(fragment),
            Err(error) => {
                warn!("Failed to load {error}");
                loaded.errors.push(error);
            }
        }
    }
    loaded
}
