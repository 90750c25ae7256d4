//! Content types and the records handed to page renderers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Kind of structured content held by the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Service,
    CaseStudy,
    Page,
}

impl ContentType {
    /// All content types, in listing order.
    pub const ALL: [ContentType; 3] = [Self::Service, Self::CaseStudy, Self::Page];

    /// Collection name in the CMS schema (also the single-document query name).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::CaseStudy => "caseStudy",
            Self::Page => "page",
        }
    }

    /// Query field returning every document of the collection.
    pub fn connection_field(self) -> String {
        format!("{}Connection", self.collection())
    }

    /// Document field carrying the short summary text.
    pub fn excerpt_field(self) -> &'static str {
        match self {
            Self::Service | Self::Page => "description",
            Self::CaseStudy => "excerpt",
        }
    }

    /// Document field carrying the image reference, if the collection has one.
    pub fn image_field(self) -> Option<&'static str> {
        match self {
            Self::Service => Some("icon"),
            Self::CaseStudy => Some("featuredImage"),
            Self::Page => None,
        }
    }

    /// Directory under the content root holding this collection's MDX files.
    pub fn local_dir(self) -> &'static str {
        match self {
            Self::Service => "services",
            Self::CaseStudy => "case-studies",
            Self::Page => "pages",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Service => "service",
            Self::CaseStudy => "case-study",
            Self::Page => "page",
        };
        f.write_str(name)
    }
}

/// Unrecognized content type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type {0:?} (expected service, case-study or page)")]
pub struct ParseContentTypeError(String);

impl FromStr for ContentType {
    type Err = ParseContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service" | "services" => Ok(Self::Service),
            "case-study" | "case-studies" | "casestudy" | "case_study" => Ok(Self::CaseStudy),
            "page" | "pages" => Ok(Self::Page),
            _ => Err(ParseContentTypeError(s.to_owned())),
        }
    }
}

/// Rich body of a content record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum RichBody {
    /// Markdown/MDX source, as stored on disk.
    Markdown(String),
    /// Rich-text document tree as returned by the CMS API.
    Document(serde_json::Value),
}

/// Entry of a listing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub slug: String,
    pub title: String,
    /// Empty when the record has no excerpt.
    pub excerpt: String,
    /// Empty when the record has no image.
    pub image: String,
}

/// A full record for a detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub body: Option<RichBody>,
}

/// Outcome of a single-record lookup.
///
/// Callers render `NotFound` and `FetchFailed` the same way; the split keeps
/// a missing record distinguishable from a store that could not be reached.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Record),
    NotFound,
    /// The store failed; the failure has already been logged.
    FetchFailed,
}

impl Lookup {
    /// The record, if one was found.
    pub fn found(self) -> Option<Record> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound | Self::FetchFailed => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_content_type() {
        assert_eq!("service".parse(), Ok(ContentType::Service));
        assert_eq!("Services".parse(), Ok(ContentType::Service));
        assert_eq!("case-studies".parse(), Ok(ContentType::CaseStudy));
        assert_eq!("caseStudy".parse(), Ok(ContentType::CaseStudy));
        assert_eq!("pages".parse(), Ok(ContentType::Page));
    }

    #[test]
    fn test_parse_unknown_content_type() {
        let err = "blog".parse::<ContentType>().unwrap_err();
        assert!(err.to_string().contains("blog"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for ty in ContentType::ALL {
            assert_eq!(ty.to_string().parse(), Ok(ty));
        }
    }

    #[test]
    fn test_schema_fields() {
        assert_eq!(ContentType::Service.connection_field(), "serviceConnection");
        assert_eq!(ContentType::CaseStudy.connection_field(), "caseStudyConnection");
        assert_eq!(ContentType::Service.excerpt_field(), "description");
        assert_eq!(ContentType::CaseStudy.excerpt_field(), "excerpt");
        assert_eq!(ContentType::CaseStudy.image_field(), Some("featuredImage"));
        assert_eq!(ContentType::Page.image_field(), None);
        assert_eq!(ContentType::CaseStudy.local_dir(), "case-studies");
    }

    #[test]
    fn test_lookup_found() {
        let record = Record {
            slug: "consultancy-advisory".to_owned(),
            title: "Consultancy & Advisory".to_owned(),
            excerpt: String::new(),
            image: String::new(),
            body: None,
        };
        let lookup = Lookup::Found(record.clone());
        assert!(lookup.is_found());
        assert_eq!(lookup.found(), Some(record));
    }

    #[test]
    fn test_lookup_misses_have_no_record() {
        assert_eq!(Lookup::NotFound.found(), None);
        assert_eq!(Lookup::FetchFailed.found(), None);
        assert!(!Lookup::FetchFailed.is_found());
    }

    #[test]
    fn test_record_json_shape() {
        let record = Record {
            slug: "s".to_owned(),
            title: "T".to_owned(),
            excerpt: String::new(),
            image: "/images/a.jpg".to_owned(),
            body: Some(RichBody::Markdown("# Hi".to_owned())),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["body"]["format"], "markdown");
        assert_eq!(json["body"]["value"], "# Hi");
        assert_eq!(json["excerpt"], "");
    }
}
