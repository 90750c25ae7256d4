//! Single-page assembly.

use forge_paths::PageLocation;
use tracing::debug;

use crate::fragment::Fragment;
use crate::inject::{inject, strip_loader_script};

/// A page with its fragments injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPage {
    pub html: String,
    /// Fragments that found their placeholder.
    pub filled: Vec<String>,
    /// Fragments whose placeholder is missing from the page.
    pub unfilled: Vec<String>,
}

impl AssembledPage {
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

/// Inject every fragment into its placeholder, adjusted for the page's depth.
///
/// With `strip_loader` set, the browser-side loader script is removed, but
/// only when every fragment was placed.
pub fn assemble_page(
    html: &str,
    location: &PageLocation,
    fragments: &[Fragment],
    strip_loader: bool,
) -> AssembledPage {
    let mut page = AssembledPage {
        html: html.to_owned(),
        filled: Vec::new(),
        unfilled: Vec::new(),
    };

    for fragment in fragments {
        let markup = fragment.rewritten_for(location);
        match inject(&page.html, &fragment.placeholder_id(), &markup) {
            Some(html) => {
                page.html = html;
                page.filled.push(fragment.name.clone());
            }
            None => {
                debug!("No placeholder for {} on depth {} page", fragment.name, location.depth());
                page.unfilled.push(fragment.name.clone());
            }
        }
    }

    if strip_loader && page.is_complete() && !page.filled.is_empty() {
        page.html = strip_loader_script(&page.html);
    }

    page
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PAGE: &str = r#"<body>
<div id="navbar-placeholder"></div>
<main>Content</main>
<div id="footer-placeholder"></div>
<script src="../js/components.js"></script>
</body>"#;

    fn fragments() -> Vec<Fragment> {
        vec![
            Fragment::new("navbar", r#"<a href="index.html"><img src="assets/logo.png"></a>"#),
            Fragment::new("footer", r#"<a href="privacy-policy.html">Privacy</a>"#),
        ]
    }

    #[test]
    fn test_assemble_nested_page() {
        let location = PageLocation::parse("services/donation-form-optimization.html");
        let page = assemble_page(PAGE, &location, &fragments(), true);

        assert_eq!(
            page.html,
            r#"<body>
<div id="navbar-placeholder"><a href="../index.html"><img src="../assets/logo.png"></a></div>
<main>Content</main>
<div id="footer-placeholder"><a href="../privacy-policy.html">Privacy</a></div>
</body>"#
        );
        assert_eq!(page.filled, vec!["navbar", "footer"]);
        assert!(page.is_complete());
    }

    #[test]
    fn test_assemble_keeps_loader_when_not_requested() {
        let page = assemble_page(PAGE, &PageLocation::root(), &fragments(), false);
        assert!(page.html.contains("js/components.js"));
        assert!(page.html.contains(r#"<a href="index.html">"#));
    }

    #[test]
    fn test_assemble_missing_placeholder_keeps_loader() {
        let html = r#"<div id="navbar-placeholder"></div><script src="js/components.js"></script>"#;
        let page = assemble_page(html, &PageLocation::root(), &fragments(), true);

        assert_eq!(page.filled, vec!["navbar"]);
        assert_eq!(page.unfilled, vec!["footer"]);
        assert!(page.html.contains("js/components.js"));
    }

    #[test]
    fn test_assemble_without_fragments_is_identity() {
        let page = assemble_page(PAGE, &PageLocation::root(), &[], true);
        assert_eq!(page.html, PAGE);
        assert!(page.filled.is_empty());
    }
}
