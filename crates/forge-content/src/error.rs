//! Error types for content stores.

use std::path::PathBuf;

/// Error from a content store.
///
/// Never surfaces past [`ContentFetcher`](crate::ContentFetcher), which logs
/// it and degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The GraphQL endpoint answered with errors.
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response lacked the field the query asked for.
    #[error("response has no `{0}` field")]
    MissingField(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Reading a local content file failed.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local content file has invalid front matter.
    #[error("invalid front matter in {}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
