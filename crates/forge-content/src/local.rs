//! Filesystem content store.
//!
//! Reads the CMS's on-disk layout directly: one MDX file per document under
//! `<content_dir>/<collection dir>/<slug>.mdx`, with YAML front matter holding
//! the scalar fields and the markdown body after it.
//!
//! ```text
//! ---
//! title: "Donation Form Optimization"
//! description: "Fewer abandoned gifts."
//! ---
//!
//! ## What we do
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ContentError;
use crate::node::{Connection, Node, Sys};
use crate::store::ContentStore;
use crate::types::ContentType;

/// Extension of content documents.
const DOCUMENT_EXTENSION: &str = "mdx";

/// Front matter delimiter line.
const FENCE: &str = "---";

/// Content store backed by MDX files on disk.
#[derive(Debug, Clone)]
pub struct LocalStore {
    content_dir: PathBuf,
}

impl LocalStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    fn collection_dir(&self, content_type: ContentType) -> PathBuf {
        self.content_dir.join(content_type.local_dir())
    }

    fn read_node(path: &Path) -> Result<Node, ContentError> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        parse_document(&filename, &text).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ContentStore for LocalStore {
    fn list(&self, content_type: ContentType) -> Result<Connection, ContentError> {
        let dir = self.collection_dir(content_type);
        if !dir.is_dir() {
            debug!("No {content_type} directory at {}", dir.display());
            return Ok(Connection::default());
        }

        let entries = fs::read_dir(&dir).map_err(|source| ContentError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == DOCUMENT_EXTENSION))
            .collect();
        paths.sort();

        // A broken document is left out of the listing rather than hiding
        // every other one.
        let nodes = paths.iter().filter_map(|path| match Self::read_node(path) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                None
            }
        });

        Ok(Connection::from_nodes(nodes))
    }

    fn get(
        &self,
        content_type: ContentType,
        relative_path: &str,
    ) -> Result<Option<Node>, ContentError> {
        if relative_path.contains(['/', '\\']) || relative_path.contains("..") {
            debug!("Rejecting {content_type} path {relative_path:?}");
            return Ok(None);
        }

        let path = self.collection_dir(content_type).join(relative_path);
        if !path.is_file() {
            return Ok(None);
        }

        Self::read_node(&path).map(Some)
    }
}

/// Split a document into front matter and body and build its node.
fn parse_document(filename: &str, text: &str) -> Result<Node, serde_yaml::Error> {
    let (front_matter, body) = split_front_matter(text);

    let mut node: Node = match front_matter {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => Node::default(),
    };
    node.sys = Some(Sys {
        filename: Some(filename.to_owned()),
    });

    let body = body.trim();
    node.body = (!body.is_empty()).then(|| serde_json::Value::String(body.to_owned()));
    Ok(node)
}

/// Returns `(front matter, body)`. Without an opening fence the whole text is
/// the body; an unterminated fence is treated the same way.
fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = strip_fence_line(text) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, text)
}

/// Strip the opening `---` line, if the text starts with one.
fn strip_fence_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(FENCE)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
