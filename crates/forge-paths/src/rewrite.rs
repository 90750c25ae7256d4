//! Allow-list rewriting of root-relative references in fragment HTML.
//!
//! Fragments are authored as if they lived at the site root. When a fragment
//! is injected into a nested page, its asset references and internal links
//! must gain the page's relative prefix. Only the references listed in
//! [`REWRITE_TARGETS`] are touched; the fragments' link set is fixed and
//! known, so anything else is deliberately left alone.

use crate::location::prefix_for;

/// A single rewrite rule: the attribute (`src` / `href`) and the
/// root-relative value prefix that gets the page prefix prepended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteTarget {
    pub attribute: &'static str,
    pub reference: &'static str,
}

impl RewriteTarget {
    const fn new(attribute: &'static str, reference: &'static str) -> Self {
        Self {
            attribute,
            reference,
        }
    }

    /// The exact text this rule matches, e.g. `href="about.html"`.
    fn needle(&self) -> String {
        format!(r#"{}="{}"#, self.attribute, self.reference)
    }

    fn replacement(&self, prefix: &str) -> String {
        format!(r#"{}="{prefix}{}"#, self.attribute, self.reference)
    }
}

/// References rewritten when a fragment lands in a nested page.
///
/// Whole-page links carry their closing quote so `href="services.html"` never
/// matches `href="services.html#team"` style variants; directory roots
/// (`assets/`, `services/`, `case-studies/`) match any path below them.
pub const REWRITE_TARGETS: &[RewriteTarget] = &[
    // Asset root
    RewriteTarget::new("src", "assets/"),
    RewriteTarget::new("href", "assets/"),
    // Top-level pages
    RewriteTarget::new("href", "index.html\""),
    RewriteTarget::new("href", "about.html\""),
    RewriteTarget::new("href", "services.html\""),
    RewriteTarget::new("href", "case-studies.html\""),
    RewriteTarget::new("href", "lets-talk.html\""),
    RewriteTarget::new("href", "privacy-policy.html\""),
    RewriteTarget::new("href", "terms-and-conditions.html\""),
    // Sub-path roots
    RewriteTarget::new("href", "services/"),
    RewriteTarget::new("href", "case-studies/"),
];

/// Prefix every allow-listed reference in `html` for a page at `depth`.
///
/// Depth 0 returns the input unchanged, as does any input containing none of
/// the allow-listed references.
///
/// # Examples
///
/// ```
/// use forge_paths::rewrite;
///
/// assert_eq!(
///     rewrite(r#"<img src="assets/logo.png">"#, 1),
///     r#"<img src="../assets/logo.png">"#
/// );
/// assert_eq!(rewrite(r#"<a href="https://example.org">"#, 2), r#"<a href="https://example.org">"#);
/// ```
pub fn rewrite(html: &str, depth: usize) -> String {
    let prefix = prefix_for(depth);
    if prefix.is_empty() {
        return html.to_owned();
    }

    // Every target is applied to the original text in a single left-to-right
    // pass, so a rewritten value is never matched again.
    let needles: Vec<(String, String)> = REWRITE_TARGETS
        .iter()
        .map(|t| (t.needle(), t.replacement(prefix)))
        .collect();

    let mut out = String::with_capacity(html.len() + html.len() / 8);
    let mut rest = html;
    'scan: while !rest.is_empty() {
        for (needle, replacement) in &needles {
            if rest.starts_with(needle.as_str()) {
                out.push_str(replacement);
                rest = &rest[needle.len()..];
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}
