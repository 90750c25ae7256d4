//! Response shape of the content store and its mapping to records.
//!
//! The store answers listings with a connection (`edges[].node`) and single
//! lookups with a bare node. Every level may be null, and a node only
//! carries the fields its collection defines, so everything is optional here
//! and defaults are applied when mapping to [`Summary`] / [`Record`].

use serde::Deserialize;

use crate::types::{ContentType, Record, RichBody, Summary};

/// System fields of a stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Sys {
    /// Source filename without extension; the record's slug.
    #[serde(default)]
    pub filename: Option<String>,
}

/// A stored document, as returned by the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "_sys")]
    pub sys: Option<Sys>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub icon: Option<String>,
    pub featured_image: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Listing wrapper: `{ edges: [{ node: {...} }] }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub edges: Option<Vec<Option<Edge>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Edge {
    pub node: Option<Node>,
}

impl Connection {
    /// Build a connection from nodes, in order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            edges: Some(
                nodes
                    .into_iter()
                    .map(|node| Some(Edge { node: Some(node) }))
                    .collect(),
            ),
        }
    }

    /// Nodes in store order, skipping null edges and null nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.edges
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|edge| edge.node)
            .collect()
    }
}

impl Node {
    fn filename(&self) -> Option<&str> {
        self.sys.as_ref()?.filename.as_deref()
    }

    fn excerpt_for(&self, content_type: ContentType) -> Option<&str> {
        match content_type {
            ContentType::Service | ContentType::Page => self.description.as_deref(),
            ContentType::CaseStudy => self.excerpt.as_deref(),
        }
    }

    fn image_for(&self, content_type: ContentType) -> Option<&str> {
        match content_type {
            ContentType::Service => self.icon.as_deref(),
            ContentType::CaseStudy => self.featured_image.as_deref(),
            ContentType::Page => None,
        }
    }

    /// Map to a listing entry. Missing scalars become empty strings.
    pub fn to_summary(&self, content_type: ContentType) -> Summary {
        Summary {
            slug: self.filename().unwrap_or_default().to_owned(),
            title: self.title.clone().unwrap_or_default(),
            excerpt: self.excerpt_for(content_type).unwrap_or_default().to_owned(),
            image: self.image_for(content_type).unwrap_or_default().to_owned(),
        }
    }

    /// Map to a full record. `slug` is used when the node carries no filename.
    pub fn into_record(self, content_type: ContentType, slug: &str) -> Record {
        let Summary {
            slug: node_slug,
            title,
            excerpt,
            image,
        } = self.to_summary(content_type);

        Record {
            slug: if node_slug.is_empty() {
                slug.to_owned()
            } else {
                node_slug
            },
            title,
            excerpt,
            image,
            body: self.body.and_then(rich_body),
        }
    }
}

fn rich_body(value: serde_json::Value) -> Option<RichBody> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(RichBody::Markdown(text)),
        other => Some(RichBody::Document(other)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn service_node() -> Node {
        serde_json::from_value(json!({
            "_sys": { "filename": "donation-form-optimization" },
            "title": "Donation Form Optimization",
            "description": "Fewer abandoned gifts.",
            "icon": "/images/icons/form.svg",
            "body": { "type": "root", "children": [] }
        }))
        .unwrap()
    }

    #[test]
    fn test_service_summary() {
        let summary = service_node().to_summary(ContentType::Service);
        assert_eq!(
            summary,
            Summary {
                slug: "donation-form-optimization".to_owned(),
                title: "Donation Form Optimization".to_owned(),
                excerpt: "Fewer abandoned gifts.".to_owned(),
                image: "/images/icons/form.svg".to_owned(),
            }
        );
    }

    #[test]
    fn test_case_study_summary_uses_excerpt_and_featured_image() {
        let node: Node = serde_json::from_value(json!({
            "_sys": { "filename": "rewarding-generosity" },
            "title": "Rewarding Generosity",
            "description": "ignored",
            "excerpt": "A loyalty scheme that unlocked new giving.",
            "featuredImage": "/images/case.jpg"
        }))
        .unwrap();

        let summary = node.to_summary(ContentType::CaseStudy);
        assert_eq!(summary.excerpt, "A loyalty scheme that unlocked new giving.");
        assert_eq!(summary.image, "/images/case.jpg");
    }

    #[test]
    fn test_missing_scalars_become_empty() {
        let node: Node = serde_json::from_value(json!({
            "_sys": null,
            "title": null
        }))
        .unwrap();

        let summary = node.to_summary(ContentType::Service);
        assert_eq!(summary.slug, "");
        assert_eq!(summary.title, "");
        assert_eq!(summary.excerpt, "");
        assert_eq!(summary.image, "");
    }

    #[test]
    fn test_record_keeps_document_body() {
        let record = service_node().into_record(ContentType::Service, "unused");
        assert_eq!(record.slug, "donation-form-optimization");
        assert_eq!(
            record.body,
            Some(RichBody::Document(json!({ "type": "root", "children": [] })))
        );
    }

    #[test]
    fn test_record_falls_back_to_requested_slug() {
        let node = Node {
            title: Some("About".to_owned()),
            body: Some(json!("# About us")),
            ..Node::default()
        };
        let record = node.into_record(ContentType::Page, "about");
        assert_eq!(record.slug, "about");
        assert_eq!(record.body, Some(RichBody::Markdown("# About us".to_owned())));
    }

    #[test]
    fn test_connection_skips_null_edges_and_nodes() {
        let conn: Connection = serde_json::from_value(json!({
            "edges": [
                { "node": { "_sys": { "filename": "a" }, "title": "A" } },
                null,
                { "node": null },
                { "node": { "_sys": { "filename": "b" }, "title": "B" } }
            ]
        }))
        .unwrap();

        let slugs: Vec<String> = conn
            .into_nodes()
            .iter()
            .map(|n| n.to_summary(ContentType::Service).slug)
            .collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_connection_null_edges() {
        let conn: Connection = serde_json::from_value(json!({ "edges": null })).unwrap();
        assert!(conn.into_nodes().is_empty());
    }
}
