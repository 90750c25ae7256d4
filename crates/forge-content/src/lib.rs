//! Structured content for page renderers.
//!
//! This crate provides:
//! - [`ContentStore`]: the CMS query interface, with a GraphQL backend
//!   ([`TinaClient`]) and a filesystem backend ([`LocalStore`])
//! - [`ContentFetcher`]: listings and slug lookups mapped to plain
//!   [`Summary`] / [`Record`] values, with failures degraded to empty results
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use forge_content::{ContentFetcher, ContentType, LocalStore, Lookup};
//!
//! let fetcher = ContentFetcher::new(Arc::new(LocalStore::new("content")));
//!
//! for service in fetcher.list_by_type(ContentType::Service) {
//!     println!("{}: {}", service.slug, service.title);
//! }
//!
//! match fetcher.get_by_slug(ContentType::CaseStudy, "rewarding-generosity") {
//!     Lookup::Found(record) => println!("{}", record.title),
//!     Lookup::NotFound | Lookup::FetchFailed => println!("page not found"),
//! }
//! ```

mod error;
mod fetcher;
mod local;
mod node;
mod store;
mod tina;
mod types;

use std::sync::Arc;

use forge_config::{ContentBackend, ContentConfig};

pub use error::ContentError;
pub use fetcher::ContentFetcher;
pub use local::LocalStore;
pub use node::{Connection, Edge, Node, Sys};
pub use store::ContentStore;
pub use tina::{TinaClient, get_query, list_query};
pub use types::{ContentType, Lookup, ParseContentTypeError, Record, RichBody, Summary};

/// Open the content store selected by configuration.
pub fn store_from_config(config: &ContentConfig) -> Arc<dyn ContentStore> {
    match config.backend {
        ContentBackend::Local => Arc::new(LocalStore::new(&config.content_dir)),
        ContentBackend::Tina => Arc::new(TinaClient::from_config(&config.tina)),
    }
}
