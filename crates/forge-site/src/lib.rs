//! Build-time page assembly.
//!
//! Pages reference shared fragments (navbar, footer) through empty
//! placeholder elements. This crate loads the fragments once, adjusts their
//! links for each page's depth and injects them, so pages are complete
//! before they reach the browser.
//!
//! With a [`forge_content::ContentFetcher`] attached, records from the
//! content store are also published into the pages' `<!-- START: ZONE -->`
//! marker zones before fragments are injected.
//!
//! # Example
//!
//! ```no_run
//! use forge_config::SiteConfig;
//! use forge_site::SiteBuilder;
//!
//! let report = SiteBuilder::new(SiteConfig::default()).build()?;
//! println!("{} pages written", report.pages_written);
//! # Ok::<(), forge_site::SiteError>(())
//! ```

mod builder;
mod error;
mod fragment;
mod inject;
mod page;
mod publish;

pub use builder::{BuildReport, SiteBuilder};
pub use error::{FragmentError, FragmentErrorKind, SiteError};
pub use fragment::{
    Fragment, FragmentSource, FsFragmentSource, HttpFragmentSource, LoadedFragments,
    load_fragments,
};
pub use inject::{inject, strip_loader_script};
pub use page::{AssembledPage, assemble_page};
pub use publish::{ContentZones, collect_records, fill_zones, page_path};
