//! Record-level access to a content store.

use std::sync::Arc;

use tracing::{debug, error};

use crate::store::ContentStore;
use crate::types::{ContentType, Lookup, Record, Summary};

/// Extension appended to a slug to form the document's relative path.
const DOCUMENT_SUFFIX: &str = ".mdx";

/// Maps store responses to records and absorbs store failures.
///
/// Every call is a stateless read. Failures are logged and degrade to an
/// empty listing or [`Lookup::FetchFailed`]; nothing is returned as `Err`,
/// so a broken store never takes page rendering down with it.
#[derive(Clone)]
pub struct ContentFetcher {
    store: Arc<dyn ContentStore>,
}

impl ContentFetcher {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Summaries of every record of a type, in store order.
    pub fn list_by_type(&self, content_type: ContentType) -> Vec<Summary> {
        match self.store.list(content_type) {
            Ok(connection) => connection
                .into_nodes()
                .iter()
                .map(|node| node.to_summary(content_type))
                .collect(),
            Err(e) => {
                error!(%content_type, error = %e, "Error fetching {content_type} listing");
                Vec::new()
            }
        }
    }

    /// The full record stored under `slug`.
    pub fn get_by_slug(&self, content_type: ContentType, slug: &str) -> Lookup {
        let relative_path = format!("{slug}{DOCUMENT_SUFFIX}");
        match self.store.get(content_type, &relative_path) {
            Ok(Some(node)) => Lookup::Found(node.into_record(content_type, slug)),
            Ok(None) => {
                debug!("No {content_type} at {relative_path}");
                Lookup::NotFound
            }
            Err(e) => {
                error!(%content_type, slug, error = %e, "Error fetching {content_type} {slug}");
                Lookup::FetchFailed
            }
        }
    }

    /// Convenience for callers that only need the record.
    pub fn record(&self, content_type: ContentType, slug: &str) -> Option<Record> {
        self.get_by_slug(content_type, slug).found()
    }
}
