//! Error types for page assembly.

use std::path::PathBuf;

/// Failure to load one fragment.
#[derive(Debug, thiserror::Error)]
#[error("fragment {name}: {kind}")]
pub struct FragmentError {
    pub name: String,
    pub kind: FragmentErrorKind,
}

/// Kind of fragment loading error.
#[derive(Debug, thiserror::Error)]
pub enum FragmentErrorKind {
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Site build error.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The site root does not exist or is not a directory.
    #[error("site root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Output directory overlaps the site root.
    #[error("output directory {} must not be inside or equal to the site root", .0.display())]
    OutputInsideRoot(PathBuf),

    /// Invalid exclude pattern.
    #[error("invalid exclude pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Reading or writing a page failed.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
