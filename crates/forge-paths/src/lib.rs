//! Path resolution for pages assembled from shared fragments.
//!
//! Pages live at most two directories below the site root. This crate derives
//! a page's depth from its location, the relative prefix back to the root, the
//! relative path of a shared fragment (`navbar`, `footer`), and rewrites the
//! fixed set of root-relative references inside fragment HTML.
//!
//! ```
//! use forge_paths::{PageLocation, rewrite};
//!
//! let loc = PageLocation::parse("/services/donation-form-optimization.html");
//! assert_eq!(loc.fragment_path("navbar"), "../components/navbar.html");
//! assert_eq!(
//!     rewrite(r#"src="assets/logo.png""#, loc.depth()),
//!     r#"src="../assets/logo.png""#
//! );
//! ```

mod location;
mod rewrite;

pub use location::{
    COMPONENTS_DIR, PageLocation, ROOT_DOCUMENT, prefix_for, resolve_depth, resolve_fragment_path,
};
pub use rewrite::{REWRITE_TARGETS, RewriteTarget, rewrite};
