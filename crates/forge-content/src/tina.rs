//! GraphQL client for the headless CMS.
//!
//! Provides a sync HTTP client issuing one GraphQL POST per call. Listings use
//! the `<collection>Connection` query, single lookups the `<collection>` query
//! keyed by `relativePath`.

use std::time::Duration;

use forge_config::TinaConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use ureq::Agent;

use crate::error::ContentError;
use crate::node::{Connection, Node};
use crate::store::ContentStore;
use crate::types::ContentType;

/// Message fragment the CMS uses when a document path does not exist.
const NOT_FOUND_MARKER: &str = "Unable to find record";

/// CMS GraphQL API client.
pub struct TinaClient {
    agent: Agent,
    url: String,
    token: Option<String>,
}

impl TinaClient {
    /// Create a client for a GraphQL endpoint.
    ///
    /// # Arguments
    /// * `url` - GraphQL endpoint URL
    /// * `token` - read-only API token, sent as `X-API-KEY`
    /// * `timeout` - global per-request timeout
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: url.to_owned(),
            token,
        }
    }

    /// Create a client from the `[content.tina]` configuration section.
    pub fn from_config(config: &TinaConfig) -> Self {
        Self::new(
            &config.url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// POST a query and return the raw response body.
    fn execute(&self, query: &str, variables: &Value) -> Result<String, ContentError> {
        let payload = serde_json::to_vec(&json!({
            "query": query,
            "variables": variables,
        }))?;

        let mut request = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("X-API-KEY", token);
        }

        let response = request.send(&payload[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ContentError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_to_string()?)
    }
}

impl ContentStore for TinaClient {
    fn list(&self, content_type: ContentType) -> Result<Connection, ContentError> {
        info!("Listing {content_type} documents");
        let body = self.execute(&list_query(content_type), &json!({}))?;
        parse_list_response(content_type, &body)
    }

    fn get(
        &self,
        content_type: ContentType,
        relative_path: &str,
    ) -> Result<Option<Node>, ContentError> {
        info!("Getting {content_type} {relative_path}");
        let body = self.execute(
            &get_query(content_type),
            &json!({ "relativePath": relative_path }),
        )?;
        parse_get_response(content_type, &body)
    }
}

/// Selection set for a document of `content_type`.
fn node_fields(content_type: ContentType, with_body: bool) -> String {
    let mut fields = vec!["_sys { filename }", "title", content_type.excerpt_field()];
    fields.extend(content_type.image_field());
    if with_body {
        fields.push("body");
    }
    fields.join(" ")
}

/// Query listing every document of a collection.
pub fn list_query(content_type: ContentType) -> String {
    format!(
        "query {{ {} {{ edges {{ node {{ {} }} }} }} }}",
        content_type.connection_field(),
        node_fields(content_type, false)
    )
}

/// Query fetching one document by relative path.
pub fn get_query(content_type: ContentType) -> String {
    format!(
        "query($relativePath: String!) {{ {}(relativePath: $relativePath) {{ {} }} }}",
        content_type.collection(),
        node_fields(content_type, true)
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlResponse {
    fn parse(body: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Non-empty error list, if any.
    fn take_errors(&mut self) -> Option<Vec<String>> {
        self.errors
            .take()
            .filter(|errors| !errors.is_empty())
            .map(|errors| errors.into_iter().map(|e| e.message).collect())
    }

    /// Take a top-level field out of `data`; `None` when absent or null.
    fn take_field(&mut self, field: &str) -> Option<Value> {
        self.data
            .as_mut()?
            .get_mut(field)
            .map(Value::take)
            .filter(|v| !v.is_null())
    }
}

/// Decode a listing response.
pub(crate) fn parse_list_response(
    content_type: ContentType,
    body: &str,
) -> Result<Connection, ContentError> {
    let mut response = GraphQlResponse::parse(body)?;
    if let Some(errors) = response.take_errors() {
        return Err(ContentError::GraphQl(errors));
    }

    let field = content_type.connection_field();
    let connection = response
        .take_field(&field)
        .ok_or(ContentError::MissingField(field))?;
    Ok(serde_json::from_value(connection)?)
}

/// Decode a single-document response. A missing document is `Ok(None)`.
pub(crate) fn parse_get_response(
    content_type: ContentType,
    body: &str,
) -> Result<Option<Node>, ContentError> {
    let mut response = GraphQlResponse::parse(body)?;
    if let Some(errors) = response.take_errors() {
        if errors.iter().any(|m| m.contains(NOT_FOUND_MARKER)) {
            debug!("{content_type} not found: {}", errors.join("; "));
            return Ok(None);
        }
        return Err(ContentError::GraphQl(errors));
    }

    if response.data.is_none() {
        return Err(ContentError::MissingField("data".to_owned()));
    }

    response
        .take_field(content_type.collection())
        .map(serde_json::from_value)
        .transpose()
        .map_err(ContentError::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_query_service() {
        assert_eq!(
            list_query(ContentType::Service),
            "query { serviceConnection { edges { node { _sys { filename } title description icon } } } }"
        );
    }

    #[test]
    fn test_get_query_case_study() {
        assert_eq!(
            get_query(ContentType::CaseStudy),
            "query($relativePath: String!) { caseStudy(relativePath: $relativePath) { _sys { filename } title excerpt featuredImage body } }"
        );
    }

    #[test]
    fn test_get_query_page_has_no_image() {
        assert_eq!(
            get_query(ContentType::Page),
            "query($relativePath: String!) { page(relativePath: $relativePath) { _sys { filename } title description body } }"
        );
    }

    #[test]
    fn test_parse_list_response() {
        let body = r#"{
            "data": {
                "serviceConnection": {
                    "edges": [
                        { "node": { "_sys": { "filename": "consultancy-advisory" }, "title": "Consultancy & Advisory", "description": null, "icon": null } },
                        { "node": { "_sys": { "filename": "csr-major-donor-support" }, "title": "CSR & Major Donor Support", "description": "Partnerships", "icon": "/icons/csr.svg" } }
                    ]
                }
            }
        }"#;

        let nodes = parse_list_response(ContentType::Service, body)
            .unwrap()
            .into_nodes();
        let summaries: Vec<_> = nodes
            .iter()
            .map(|n| n.to_summary(ContentType::Service))
            .collect();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].slug, "consultancy-advisory");
        assert_eq!(summaries[0].excerpt, "");
        assert_eq!(summaries[1].image, "/icons/csr.svg");
    }

    #[test]
    fn test_parse_list_response_graphql_error() {
        let body = r#"{ "data": null, "errors": [{ "message": "Cannot query field" }] }"#;
        let err = parse_list_response(ContentType::Service, body).unwrap_err();
        assert!(matches!(err, ContentError::GraphQl(_)));
        assert!(err.to_string().contains("Cannot query field"));
    }

    #[test]
    fn test_parse_list_response_missing_connection() {
        let body = r#"{ "data": {} }"#;
        let err = parse_list_response(ContentType::CaseStudy, body).unwrap_err();
        assert!(matches!(err, ContentError::MissingField(ref f) if f == "caseStudyConnection"));
    }

    #[test]
    fn test_parse_list_response_malformed_body() {
        let err = parse_list_response(ContentType::Service, "<html>502</html>").unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
    }

    #[test]
    fn test_parse_get_response_found() {
        let body = r#"{
            "data": {
                "service": {
                    "_sys": { "filename": "donation-form-optimization" },
                    "title": "Donation Form Optimization",
                    "description": "Fewer abandoned gifts.",
                    "icon": null,
                    "body": { "type": "root", "children": [] }
                }
            }
        }"#;

        let node = parse_get_response(ContentType::Service, body)
            .unwrap()
            .unwrap();
        let record = node.into_record(ContentType::Service, "donation-form-optimization");
        assert_eq!(record.title, "Donation Form Optimization");
        assert_eq!(record.excerpt, "Fewer abandoned gifts.");
        assert!(record.body.is_some());
    }

    #[test]
    fn test_parse_get_response_not_found_error() {
        let body = r#"{
            "data": null,
            "errors": [{ "message": "Unable to find record content/services/missing.mdx" }]
        }"#;
        assert_eq!(parse_get_response(ContentType::Service, body).unwrap(), None);
    }

    #[test]
    fn test_parse_get_response_null_document() {
        let body = r#"{ "data": { "page": null } }"#;
        assert_eq!(parse_get_response(ContentType::Page, body).unwrap(), None);
    }

    #[test]
    fn test_parse_get_response_other_error() {
        let body = r#"{ "errors": [{ "message": "Unauthorized" }] }"#;
        let err = parse_get_response(ContentType::Page, body).unwrap_err();
        assert!(matches!(err, ContentError::GraphQl(ref m) if m == &["Unauthorized"]));
    }

    #[test]
    fn test_parse_get_response_without_data() {
        let err = parse_get_response(ContentType::Page, "{}").unwrap_err();
        assert!(matches!(err, ContentError::MissingField(_)));
    }

    #[test]
    fn test_client_from_config() {
        let config = TinaConfig {
            url: "http://localhost:4001/graphql".to_owned(),
            token: Some("t".to_owned()),
            timeout_secs: 3,
        };
        let client = TinaClient::from_config(&config);
        assert_eq!(client.url, "http://localhost:4001/graphql");
        assert_eq!(client.token.as_deref(), Some("t"));
    }
}
