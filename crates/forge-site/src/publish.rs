//! Publishing content records into page marker zones.
//!
//! Pages mark editable regions with comment pairs:
//!
//! ```html
//! <!-- START: MAIN -->
//! ...replaced on publish...
//! <!-- END: MAIN -->
//! ```
//!
//! The named zones are `HEADER`, `MAIN` and `FOOTER`. Pages without any of
//! them may carry a single `PAGE CONTENT` zone instead, which receives all
//! three concatenated. Markers are kept so the page can be published again.

use std::collections::HashMap;

use forge_content::{ContentFetcher, ContentType, Record, RichBody};
use pulldown_cmark::{Options, Parser, html::push_html};
use rayon::prelude::*;
use tracing::debug;

/// Zone filled when a page has none of the named zones.
const FALLBACK_ZONE: &str = "PAGE CONTENT";

/// Page published for the `home` page record.
const HOME_SLUG: &str = "home";

/// Markup for each zone of a page. `None` leaves the zone as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentZones {
    pub header: Option<String>,
    pub main: Option<String>,
    pub footer: Option<String>,
}

impl ContentZones {
    /// Header from the title, excerpt and image; main from the body.
    ///
    /// Markdown bodies are rendered to HTML. Rich-text document bodies have
    /// no HTML form here, so the main zone is left alone for them.
    pub fn from_record(record: &Record) -> Self {
        let mut header = format!("<h1>{}</h1>", escape_html(&record.title));
        if !record.excerpt.is_empty() {
            header.push_str(&format!("\n<p>{}</p>", escape_html(&record.excerpt)));
        }
        if !record.image.is_empty() {
            header.push_str(&format!(
                "\n<img src=\"{}\" alt=\"{}\">",
                escape_html(&record.image),
                escape_html(&record.title)
            ));
        }

        let main = match &record.body {
            Some(RichBody::Markdown(text)) => Some(render_markdown(text)),
            Some(RichBody::Document(_)) => {
                debug!("{}: rich-text body left unpublished", record.slug);
                None
            }
            None => None,
        };

        Self {
            header: Some(header),
            main,
            footer: None,
        }
    }

    fn named(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("HEADER", self.header.as_deref()),
            ("MAIN", self.main.as_deref()),
            ("FOOTER", self.footer.as_deref()),
        ]
    }

    fn combined(&self) -> String {
        self.named()
            .iter()
            .filter_map(|(_, content)| *content)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Write `zones` into the marker zones of `html`.
///
/// Named zones take precedence: when any `HEADER` / `MAIN` / `FOOTER` marker
/// pair exists, only those are written. Otherwise the `PAGE CONTENT` pair gets
/// everything. Returns `None` when the page has no usable marker pair.
pub fn fill_zones(html: &str, zones: &ContentZones) -> Option<String> {
    let named = zones.named();
    if named.iter().any(|(name, _)| zone_span(html, name).is_some()) {
        let mut out = html.to_owned();
        for (name, content) in named {
            if let Some(content) = content {
                out = replace_zone(&out, name, content).unwrap_or(out);
            }
        }
        return Some(out);
    }

    replace_zone(html, FALLBACK_ZONE, &zones.combined())
}

/// Site-relative page a record is published to.
pub fn page_path(content_type: ContentType, slug: &str) -> String {
    match content_type {
        ContentType::Page if slug == HOME_SLUG => forge_paths::ROOT_DOCUMENT.to_owned(),
        ContentType::Page => format!("{slug}.html"),
        ContentType::Service | ContentType::CaseStudy => {
            format!("{}/{slug}.html", content_type.local_dir())
        }
    }
}

/// Every record the store lists, keyed by the page it is published to.
///
/// Records that fail to load are left out; the fetcher has logged why.
pub fn collect_records(fetcher: &ContentFetcher) -> HashMap<String, Record> {
    ContentType::ALL
        .iter()
        .flat_map(|&content_type| {
            fetcher
                .list_by_type(content_type)
                .into_iter()
                .map(move |summary| (content_type, summary.slug))
        })
        .collect::<Vec<_>>()
        .par_iter()
        .filter_map(|(content_type, slug)| {
            let record = fetcher.record(*content_type, slug)?;
            Some((page_path(*content_type, slug), record))
        })
        .collect()
}

/// Byte range between the end of the start marker and the start of the
/// end marker.
fn zone_span(html: &str, name: &str) -> Option<(usize, usize)> {
    let start_marker = format!("<!-- START: {name} -->");
    let end_marker = format!("<!-- END: {name} -->");
    let content_start = html.find(&start_marker)? + start_marker.len();
    let content_end = html[content_start..].find(&end_marker)? + content_start;
    Some((content_start, content_end))
}

fn replace_zone(html: &str, name: &str, content: &str) -> Option<String> {
    let (start, end) = zone_span(html, name)?;
    Some(format!(
        "{}\n{}\n{}",
        &html[..start],
        content.trim_end(),
        &html[end..]
    ))
}

fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut html = String::with_capacity(text.len() * 2);
    push_html(&mut html, Parser::new_ext(text, options));
    html
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(body: Option<RichBody>) -> Record {
        Record {
            slug: "donation-form-optimization".to_owned(),
            title: "Donation Form Optimization".to_owned(),
            excerpt: "Fewer abandoned gifts & more donors.".to_owned(),
            image: String::new(),
            body,
        }
    }

    #[test]
    fn test_from_record() {
        let zones = ContentZones::from_record(&record(Some(RichBody::Markdown(
            "## What we do\n\nAudit *every* step.".to_owned(),
        ))));

        assert_eq!(
            zones.header.as_deref(),
            Some("<h1>Donation Form Optimization</h1>\n<p>Fewer abandoned gifts &amp; more donors.</p>")
        );
        assert_eq!(
            zones.main.as_deref(),
            Some("<h2>What we do</h2>\n<p>Audit <em>every</em> step.</p>\n")
        );
        assert_eq!(zones.footer, None);
    }

    #[test]
    fn test_from_record_with_image_and_document_body() {
        let mut record = record(Some(RichBody::Document(serde_json::json!({"type": "root"}))));
        record.image = "/images/icons/form.svg".to_owned();
        let zones = ContentZones::from_record(&record);

        assert!(
            zones
                .header
                .unwrap()
                .ends_with(r#"<img src="/images/icons/form.svg" alt="Donation Form Optimization">"#)
        );
        assert_eq!(zones.main, None);
    }

    #[test]
    fn test_fill_named_zones() {
        let html = "<body>\n<!-- START: HEADER --><h1>Old</h1><!-- END: HEADER -->\n<!-- START: MAIN -->\n<p>old</p>\n<!-- END: MAIN -->\n</body>";
        let zones = ContentZones {
            header: Some("<h1>New</h1>".to_owned()),
            main: Some("<p>new</p>\n".to_owned()),
            footer: Some("<p>unused</p>".to_owned()),
        };

        assert_eq!(
            fill_zones(html, &zones).unwrap(),
            "<body>\n<!-- START: HEADER -->\n<h1>New</h1>\n<!-- END: HEADER -->\n<!-- START: MAIN -->\n<p>new</p>\n<!-- END: MAIN -->\n</body>"
        );
    }

    #[test]
    fn test_fill_keeps_zone_without_content() {
        let html = "<!-- START: MAIN --><p>keep</p><!-- END: MAIN -->";
        let zones = ContentZones {
            header: Some("<h1>x</h1>".to_owned()),
            ..ContentZones::default()
        };
        assert_eq!(fill_zones(html, &zones).unwrap(), html);
    }

    #[test]
    fn test_fill_is_repeatable() {
        let html = "<!-- START: MAIN --><!-- END: MAIN -->";
        let zones = ContentZones {
            main: Some("<p>a</p>".to_owned()),
            ..ContentZones::default()
        };
        let once = fill_zones(html, &zones).unwrap();
        assert_eq!(fill_zones(&once, &zones).unwrap(), once);
    }

    #[test]
    fn test_fill_fallback_zone() {
        let html = "<main><!-- START: PAGE CONTENT -->old<!-- END: PAGE CONTENT --></main>";
        let zones = ContentZones {
            header: Some("<h1>T</h1>".to_owned()),
            main: Some("<p>B</p>".to_owned()),
            footer: None,
        };
        assert_eq!(
            fill_zones(html, &zones).unwrap(),
            "<main><!-- START: PAGE CONTENT -->\n<h1>T</h1>\n<p>B</p>\n<!-- END: PAGE CONTENT --></main>"
        );
    }

    #[test]
    fn test_fill_named_zones_win_over_fallback() {
        let html = "<!-- START: PAGE CONTENT -->x<!-- END: PAGE CONTENT --><!-- START: MAIN --><!-- END: MAIN -->";
        let zones = ContentZones {
            main: Some("m".to_owned()),
            ..ContentZones::default()
        };
        assert_eq!(
            fill_zones(html, &zones).unwrap(),
            "<!-- START: PAGE CONTENT -->x<!-- END: PAGE CONTENT --><!-- START: MAIN -->\nm\n<!-- END: MAIN -->"
        );
    }

    #[test]
    fn test_fill_without_markers() {
        let zones = ContentZones::default();
        assert_eq!(fill_zones("<p>static</p>", &zones), None);
        assert_eq!(fill_zones("<!-- START: MAIN --> unterminated", &zones), None);
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path(ContentType::Page, "home"), "index.html");
        assert_eq!(page_path(ContentType::Page, "about"), "about.html");
        assert_eq!(
            page_path(ContentType::Service, "consultancy-advisory"),
            "services/consultancy-advisory.html"
        );
        assert_eq!(
            page_path(ContentType::CaseStudy, "rewarding-generosity"),
            "case-studies/rewarding-generosity.html"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }
}
