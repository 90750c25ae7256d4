//! Page locations and the relative prefixes derived from them.
//!
//! A page location is the URL path of the page being assembled, split into
//! non-empty segments. Its depth decides how many `../` markers are needed to
//! reach the site root from the page's directory:
//!
//! | location                          | depth | prefix    |
//! |-----------------------------------|-------|-----------|
//! | `/`, `/index.html`, `/about.html` | 0     | `""`      |
//! | `/services/foo.html`              | 1     | `"../"`   |
//! | `/a/b/c.html` and deeper          | 2+    | `"../../"`|

use tracing::debug;

/// Name of the document served at the site root.
pub const ROOT_DOCUMENT: &str = "index.html";

/// Directory holding shared fragments, relative to the site root.
pub const COMPONENTS_DIR: &str = "components";

/// Relative prefixes indexed by depth. Depths past the last entry reuse it.
const PREFIXES: [&str; 3] = ["", "../", "../../"];

/// Location of a page within the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    segments: Vec<String>,
    depth: usize,
}

impl PageLocation {
    /// Parse a URL path (or a site-relative file path) into a location.
    ///
    /// Only `/` separates segments. A location containing a `.` or `..`
    /// segment, a backslash or a NUL byte is malformed and collapses to the
    /// root location, so nothing is rewritten for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_paths::PageLocation;
    ///
    /// let loc = PageLocation::parse("/services/donation-form-optimization.html");
    /// assert_eq!(loc.depth(), 1);
    /// assert_eq!(loc.prefix(), "../");
    /// ```
    pub fn parse(path: &str) -> Self {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        if let Some(bad) = segments.iter().find(|s| is_malformed_segment(s)) {
            debug!(path, segment = %bad, "Malformed page location, treating as root");
            return Self::root();
        }

        Self::from_segments(segments)
    }

    /// Build a location from already split segments. Empty segments are dropped.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        let depth = resolve_depth(&segments);
        Self { segments, depth }
    }

    /// The site root (`/`).
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            depth: 0,
        }
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for `/` and `/index.html`.
    pub fn is_root(&self) -> bool {
        match self.segments.as_slice() {
            [] => true,
            [only] => only == ROOT_DOCUMENT,
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Relative prefix leading from this page back to the site root.
    pub fn prefix(&self) -> &'static str {
        prefix_for(self.depth)
    }

    /// Relative path of a named fragment as seen from this page.
    pub fn fragment_path(&self, name: &str) -> String {
        resolve_fragment_path(name, self.depth)
    }
}

impl Default for PageLocation {
    fn default() -> Self {
        Self::root()
    }
}

fn is_malformed_segment(segment: &str) -> bool {
    segment == "." || segment == ".." || segment.contains(['\\', '\0'])
}

/// Compute the nesting depth of a location from its segments.
///
/// Empty segments are ignored. A location with no segments, or with only the
/// root document, has depth 0. Otherwise the last segment is the document
/// itself and every segment before it is one directory level.
///
/// # Examples
///
/// ```
/// use forge_paths::resolve_depth;
///
/// assert_eq!(resolve_depth::<&str>(&[]), 0);
/// assert_eq!(resolve_depth(&["about.html"]), 0);
/// assert_eq!(resolve_depth(&["services", "foo.html"]), 1);
/// ```
pub fn resolve_depth<S: AsRef<str>>(segments: &[S]) -> usize {
    let non_empty: Vec<&str> = segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .collect();

    match non_empty.as_slice() {
        [] | [ROOT_DOCUMENT] => 0,
        _ => non_empty.len().saturating_sub(1),
    }
}

/// Relative prefix for a depth: `""`, `"../"`, or `"../../"` from depth 2 on.
pub fn prefix_for(depth: usize) -> &'static str {
    PREFIXES[depth.min(PREFIXES.len() - 1)]
}

/// Path of a shared fragment relative to a page at `depth`.
///
/// ```
/// use forge_paths::resolve_fragment_path;
///
/// assert_eq!(resolve_fragment_path("navbar", 0), "components/navbar.html");
/// assert_eq!(resolve_fragment_path("footer", 1), "../components/footer.html");
/// ```
pub fn resolve_fragment_path(name: &str, depth: usize) -> String {
    format!("{}{COMPONENTS_DIR}/{name}.html", prefix_for(depth))
}
