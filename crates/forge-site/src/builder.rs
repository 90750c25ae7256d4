//! Whole-site build: every page assembled and written to the output directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use forge_config::SiteConfig;
use forge_content::{ContentFetcher, Record};
use forge_paths::{COMPONENTS_DIR, PageLocation};
use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{FragmentError, SiteError};
use crate::fragment::{Fragment, FragmentSource, FsFragmentSource, load_fragments};
use crate::page::assemble_page;
use crate::publish::{ContentZones, collect_records, fill_zones};

const PAGE_EXTENSION: &str = "html";

/// Summary of a build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages assembled and written.
    pub pages_written: usize,
    /// Other files copied unchanged.
    pub files_copied: usize,
    /// Total placeholders filled across all pages.
    pub placeholders_filled: usize,
    /// Pages missing at least one placeholder, by site-relative path.
    pub incomplete_pages: Vec<String>,
    /// Fragments that could not be loaded.
    pub fragment_errors: Vec<FragmentError>,
    /// Pages whose marker zones were filled from a content record.
    pub pages_published: usize,
    /// Pages with a content record but no marker zones.
    pub unpublished_pages: Vec<String>,
}

/// What happened to one file of the site.
enum FileOutcome {
    Page {
        filled: usize,
        complete: bool,
        /// `None` when no record targets the page.
        published: Option<bool>,
    },
    Copied,
}

/// Builds the site described by a [`SiteConfig`].
pub struct SiteBuilder {
    config: SiteConfig,
    source: Arc<dyn FragmentSource>,
    content: Option<ContentFetcher>,
}

impl SiteBuilder {
    /// Builder reading fragments from the site's own components directory.
    pub fn new(config: SiteConfig) -> Self {
        let source = Arc::new(FsFragmentSource::new(&config.root_dir));
        Self {
            config,
            source,
            content: None,
        }
    }

    /// Publish records from `fetcher` into page marker zones during the build.
    #[must_use]
    pub fn with_content(mut self, fetcher: ContentFetcher) -> Self {
        self.content = Some(fetcher);
        self
    }

    /// Use a different fragment source, e.g. a deployed copy of the site.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn FragmentSource>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Assemble every page and write the site to the output directory.
    ///
    /// A fragment that fails to load is reported and left out; its
    /// placeholder stays empty. Page I/O errors abort the build.
    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let root = &self.config.root_dir;
        let output = &self.config.output_dir;

        if !root.is_dir() {
            return Err(SiteError::RootNotFound(root.clone()));
        }
        let root_abs = normalize(root).map_err(|source| io_error(root, source))?;
        let output_abs = normalize(output).map_err(|source| io_error(output, source))?;
        if output_abs.starts_with(&root_abs) {
            return Err(SiteError::OutputInsideRoot(output.clone()));
        }

        let excludes = compile_excludes(&self.config.exclude)?;
        let files = collect_files(root, &excludes)?;
        debug!("Found {} files under {}", files.len(), root.display());

        let records = self
            .content
            .as_ref()
            .map(collect_records)
            .unwrap_or_default();
        for path in records.keys().filter(|path| !files.contains(path)) {
            debug!("No page at {path} to publish into");
        }

        let loaded = load_fragments(self.source.as_ref(), &self.config.fragments);
        let strip_loader = self.config.strip_loader && loaded.errors.is_empty();

        let outcomes: Vec<(String, FileOutcome)> = files
            .par_iter()
            .map(|relative| -> Result<_, SiteError> {
                let outcome =
                    self.process_file(relative, &loaded.fragments, &records, strip_loader)?;
                Ok((relative.clone(), outcome))
            })
            .collect::<Result<_, SiteError>>()?;

        let mut report = BuildReport {
            fragment_errors: loaded.errors,
            ..BuildReport::default()
        };
        for (relative, outcome) in outcomes {
            match outcome {
                FileOutcome::Page {
                    filled,
                    complete,
                    published,
                } => {
                    report.pages_written += 1;
                    report.placeholders_filled += filled;
                    match published {
                        Some(true) => report.pages_published += 1,
                        Some(false) => report.unpublished_pages.push(relative.clone()),
                        None => {}
                    }
                    if !complete {
                        report.incomplete_pages.push(relative);
                    }
                }
                FileOutcome::Copied => report.files_copied += 1,
            }
        }

        for page in &report.incomplete_pages {
            warn!("{page}: not every fragment placeholder was filled");
        }
        for page in &report.unpublished_pages {
            warn!("{page}: no content markers found");
        }
        info!(
            pages = report.pages_written,
            copied = report.files_copied,
            "Site written to {}",
            output.display()
        );
        Ok(report)
    }

    fn process_file(
        &self,
        relative: &str,
        fragments: &[Fragment],
        records: &HashMap<String, Record>,
        strip_loader: bool,
    ) -> Result<FileOutcome, SiteError> {
        let src = self.config.root_dir.join(relative);
        let dst = self.config.output_dir.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }

        if !is_page(relative) {
            fs::copy(&src, &dst).map_err(|source| io_error(&src, source))?;
            return Ok(FileOutcome::Copied);
        }

        let mut html = fs::read_to_string(&src).map_err(|source| io_error(&src, source))?;

        let published = records.get(relative).map(|record| {
            match fill_zones(&html, &ContentZones::from_record(record)) {
                Some(filled) => {
                    html = filled;
                    true
                }
                None => false,
            }
        });

        let location = PageLocation::parse(relative);
        let page = assemble_page(&html, &location, fragments, strip_loader);
        fs::write(&dst, &page.html).map_err(|source| io_error(&dst, source))?;

        Ok(FileOutcome::Page {
            filled: page.filled.len(),
            complete: page.is_complete(),
            published,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SiteError {
    SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Absolute, lexically cleaned form of `path`, with symlinks resolved for
/// the part of it that exists.
fn normalize(path: &Path) -> std::io::Result<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::ParentDir => {
                cleaned.pop();
            }
            Component::CurDir => {}
            other => cleaned.push(other),
        }
    }

    let mut existing = cleaned.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
            break;
        };
        missing.push(name.to_owned());
        existing = parent;
    }

    let mut resolved = existing.canonicalize()?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>, SiteError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| SiteError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Page files are assembled; fragment sources under the components
/// directory are copied as they are.
fn is_page(relative: &str) -> bool {
    !relative.starts_with(&format!("{COMPONENTS_DIR}/"))
        && Path::new(relative)
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(PAGE_EXTENSION))
}

/// Site-relative paths (`/`-separated) of every file under `root`, sorted,
/// minus anything matching an exclude pattern.
fn collect_files(root: &Path, excludes: &[Pattern]) -> Result<Vec<String>, SiteError> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| io_error(&dir, source))?;
        for entry in entries {
            let path = entry.map_err(|source| io_error(&dir, source))?.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if relative.split('/').any(|s| s.starts_with('.')) {
                continue;
            }
            if excludes.iter().any(|p| p.matches(&relative)) {
                debug!("Excluded {relative}");
                continue;
            }

            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(relative);
            }
        }
    }

    files.sort();
    Ok(files)
}
