//! This module provides a remote store backed by the Firestore REST API

pub mod value;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::document::Document;
use crate::error::BoxError;
use crate::event::EventId;
use crate::traits::RemoteStore;

/// The public Firestore endpoint
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1/";
/// The database every Firestore project has
pub const DEFAULT_DATABASE: &str = "(default)";


/// An item of a `documents:runQuery` reply. Some items only carry a read time and no document
#[derive(Deserialize)]
struct QueryReplyItem {
    document: Option<FirestoreDocument>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    /// The full resource name, ending with the document ID
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}


/// A Firestore database, reached over HTTP. This does not start a connection
pub struct FirestoreClient {
    endpoint: Url,
    project_id: String,
    database: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl FirestoreClient {
    /// Create a client for the default database of a project, on the public endpoint
    pub fn new<S: ToString>(project_id: S, token: Option<String>) -> Result<Self, BoxError> {
        Self::new_with_endpoint(DEFAULT_ENDPOINT, project_id, DEFAULT_DATABASE, token)
    }

    /// Create a client on a custom endpoint (e.g. a local emulator)
    pub fn new_with_endpoint<E: AsRef<str>, S: ToString, D: ToString>(endpoint: E, project_id: S, database: D, token: Option<String>) -> Result<Self, BoxError> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        if endpoint.cannot_be_a_base() {
            return Err(format!("{} cannot be used as an endpoint", endpoint).into());
        }

        Ok(Self {
            endpoint,
            project_id: project_id.to_string(),
            database: database.to_string(),
            token,
            http: reqwest::Client::new(),
        })
    }

    /// The resource name of the documents root, e.g. `projects/my-project/databases/(default)/documents`
    fn documents_root(&self) -> String {
        format!("projects/{}/databases/{}/documents", self.project_id, self.database)
    }

    /// The resource name of a document
    fn document_name(&self, collection: &str, id: &EventId) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    /// Build an URL below `projects/<id>/databases/<db>/`
    fn url_for(&self, segments: &[&str]) -> Result<Url, BoxError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as an endpoint", self.endpoint))?
            .pop_if_empty()
            .extend(["projects", self.project_id.as_str(), "databases", self.database.as_str()].iter())
            .extend(segments.iter());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a non-2xx reply into an error
async fn check_status(response: Response) -> Result<Response, BoxError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(format!("Unexpected HTTP status code {:?}: {}", status, body).into())
}

/// Returns the last component of a resource name
fn id_from_name(name: &str) -> EventId {
    EventId::from(name.rsplit('/').next().unwrap_or(name))
}

#[async_trait]
impl RemoteStore for FirestoreClient {
    async fn query_ordered_by_date(&self, collection: &str) -> Result<Vec<Document>, BoxError> {
        let url = self.url_for(&["documents:runQuery"])?;
        let body = json!({
            "structuredQuery": {
                "from": [ { "collectionId": collection } ],
                "orderBy": [ { "field": { "fieldPath": "date" }, "direction": "ASCENDING" } ],
            }
        });

        let response = self.request(Method::POST, url)
            .json(&body)
            .send()
            .await?;
        let reply: Vec<QueryReplyItem> = check_status(response).await?.json().await?;

        let documents = reply.into_iter()
            .filter_map(|item| item.document)
            .map(|doc| Document::new(
                id_from_name(&doc.name),
                value::fields_from_firestore(&doc.fields),
            ))
            .collect::<Vec<_>>();
        log::debug!("Firestore returned {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn commit_batch(&mut self, collection: &str, documents: Vec<Document>) -> Result<(), BoxError> {
        let url = self.url_for(&["documents:commit"])?;
        let writes: Vec<Value> = documents.iter()
            .map(|doc| json!({
                "update": {
                    "name": self.document_name(collection, doc.id()),
                    "fields": value::fields_to_firestore(doc.fields()),
                }
            }))
            .collect();

        let response = self.request(Method::POST, url)
            .json(&json!({ "writes": writes }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete(&mut self, collection: &str, id: &EventId) -> Result<(), BoxError> {
        let url = self.url_for(&["documents", collection, id.as_str()])?;
        let response = self.request(Method::DELETE, url)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_names() {
        let client = FirestoreClient::new("my-project", None).unwrap();

        assert_eq!(
            client.url_for(&["documents:runQuery"]).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/my-project/databases/(default)/documents:runQuery"
        );
        assert_eq!(
            client.url_for(&["documents", "timeline-events", "abc"]).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/my-project/databases/(default)/documents/timeline-events/abc"
        );
        assert_eq!(
            client.document_name("timeline-events", &EventId::from("abc")),
            "projects/my-project/databases/(default)/documents/timeline-events/abc"
        );
    }

    #[test]
    fn custom_endpoint() {
        let client = FirestoreClient::new_with_endpoint("http://localhost:8080/v1", "demo", "(default)", None).unwrap();
        assert_eq!(
            client.url_for(&["documents:commit"]).unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents:commit"
        );
        assert!(FirestoreClient::new_with_endpoint("mailto:someone@example.com", "demo", "(default)", None).is_err());
    }

    #[test]
    fn ids_are_the_last_name_component() {
        assert_eq!(id_from_name("projects/p/databases/(default)/documents/timeline-events/xyz").as_str(), "xyz");
        assert_eq!(id_from_name("xyz").as_str(), "xyz");
    }

    #[test]
    fn query_replies_may_lack_documents() {
        let reply: Vec<QueryReplyItem> = serde_json::from_str(r#"[
            { "readTime": "2021-01-01T00:00:00Z" },
            { "document": { "name": "projects/p/databases/(default)/documents/c/1",
                            "fields": { "title": { "stringValue": "t" } } },
              "readTime": "2021-01-01T00:00:00Z" }
        ]"#).unwrap();
        let docs: Vec<FirestoreDocument> = reply.into_iter().filter_map(|i| i.document).collect();
        assert_eq!(docs.len(), 1);
        assert_eq!(id_from_name(&docs[0].name).as_str(), "1");
    }
}
