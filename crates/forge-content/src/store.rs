//! Content store abstraction.

use crate::error::ContentError;
use crate::node::{Connection, Node};
use crate::types::ContentType;

/// Query interface of the headless CMS.
///
/// Implementations return the store's own response shape; mapping to
/// records and error degradation happen in
/// [`ContentFetcher`](crate::ContentFetcher).
pub trait ContentStore: Send + Sync {
    /// Every document of a content type, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the store cannot be queried or answers
    /// with something other than a connection.
    fn list(&self, content_type: ContentType) -> Result<Connection, ContentError>;

    /// One document by its path relative to the collection (`<slug>.mdx`).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(node))` - the document exists
    /// - `Ok(None)` - no document at that path
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the store cannot be queried.
    fn get(
        &self,
        content_type: ContentType,
        relative_path: &str,
    ) -> Result<Option<Node>, ContentError>;
}
