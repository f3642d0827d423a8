//! Document-store adapter.
//!
//! Talks to the headless CMS over HTTP and converts its rich-text wire
//! format into domain documents. Not-found is `Ok(None)`; every transport
//! or decode failure is a `RepoError`, because the routes must tell a
//! missing document (404) apart from a broken store (5xx).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::{ContentDocument, RichTextBlock};
use crate::domain::slug::Slug;

/// Ordering clause sent with collection queries. The listing page depends on
/// this order; it is applied by the store and never re-sorted downstream.
const COLLECTION_ORDERING: &str = "document.last_publication_date desc";

pub struct CmsContentRepo {
    client: reqwest::Client,
    api_url: Url,
    access_token: Option<String>,
}

impl CmsContentRepo {
    pub fn new(client: reqwest::Client, api_url: Url, access_token: Option<String>) -> Self {
        Self {
            client,
            api_url,
            access_token,
        }
    }

    fn documents_url(&self) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("documents");
        }
        url
    }

    fn document_url(&self, slug: &Slug) -> Url {
        let mut url = self.documents_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(slug.as_str());
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentRepo for CmsContentRepo {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<ContentDocument>, RepoError> {
        let request = self.authorized(self.client.get(self.document_url(slug)));
        let response = request
            .send()
            .await
            .map_err(|err| RepoError::unavailable(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|err| RepoError::unavailable(err.to_string()))?;

        let wire: WireDocument = response
            .json()
            .await
            .map_err(|err| RepoError::malformed(err.to_string()))?;

        document_from_wire(wire).map(Some)
    }

    async fn list_all(&self) -> Result<Vec<ContentDocument>, RepoError> {
        let request = self
            .authorized(self.client.get(self.documents_url()))
            .query(&[("orderings", COLLECTION_ORDERING)]);
        let response = request
            .send()
            .await
            .map_err(|err| RepoError::unavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| RepoError::unavailable(err.to_string()))?;

        let wire: WireQueryResponse = response
            .json()
            .await
            .map_err(|err| RepoError::malformed(err.to_string()))?;

        wire.results.into_iter().map(document_from_wire).collect()
    }
}

#[derive(Debug, Deserialize)]
struct WireQueryResponse {
    #[serde(default)]
    results: Vec<WireDocument>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    uid: String,
    data: WireData,
    last_publication_date: String,
}

#[derive(Debug, Deserialize)]
struct WireData {
    #[serde(default)]
    title: Vec<WireBlock>,
    #[serde(default)]
    content: Vec<WireBlock>,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

fn document_from_wire(wire: WireDocument) -> Result<ContentDocument, RepoError> {
    let slug = Slug::derive(&wire.uid)
        .map_err(|err| RepoError::malformed(format!("document uid `{}`: {err}", wire.uid)))?;

    let last_modified = OffsetDateTime::parse(&wire.last_publication_date, &Rfc3339)
        .map_err(|err| RepoError::malformed(format!("document `{slug}` timestamp: {err}")))?;

    Ok(ContentDocument {
        slug,
        title: blocks_from_wire(wire.data.title),
        body: blocks_from_wire(wire.data.content),
        last_modified,
    })
}

fn blocks_from_wire(blocks: Vec<WireBlock>) -> Vec<RichTextBlock> {
    blocks
        .into_iter()
        .map(|block| {
            // The store distinguishes heading levels (heading1..heading6);
            // the domain only cares that it is a heading.
            if block.kind.starts_with("heading") {
                RichTextBlock::Heading(block.text)
            } else if block.kind == "paragraph" {
                RichTextBlock::Paragraph(block.text)
            } else {
                RichTextBlock::Other(block.text)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn decodes_a_store_document() {
        let wire: WireDocument = serde_json::from_value(serde_json::json!({
            "uid": "my-new-post",
            "data": {
                "title": [
                    { "type": "heading1", "text": "My New Post" }
                ],
                "content": [
                    { "type": "paragraph", "text": "This is my new post" },
                    { "type": "image", "text": "" }
                ]
            },
            "last_publication_date": "2022-07-21T12:00:00Z"
        }))
        .expect("decode");

        let document = document_from_wire(wire).expect("document");
        assert_eq!(document.slug.as_str(), "my-new-post");
        assert_eq!(
            document.title,
            vec![RichTextBlock::Heading("My New Post".to_string())]
        );
        assert_eq!(
            document.body,
            vec![
                RichTextBlock::Paragraph("This is my new post".to_string()),
                RichTextBlock::Other(String::new()),
            ]
        );
        assert_eq!(document.last_modified, datetime!(2022-07-21 12:00 UTC));
    }

    #[test]
    fn unparsable_timestamp_is_a_malformed_document() {
        let wire: WireDocument = serde_json::from_value(serde_json::json!({
            "uid": "my-new-post",
            "data": { "title": [], "content": [] },
            "last_publication_date": "07-21-2022"
        }))
        .expect("decode");

        let error = document_from_wire(wire).expect_err("malformed");
        assert!(matches!(error, RepoError::Malformed { .. }));
    }

    #[test]
    fn store_uids_are_normalized_defensively() {
        let wire: WireDocument = serde_json::from_value(serde_json::json!({
            "uid": "My New Post",
            "data": { "title": [], "content": [] },
            "last_publication_date": "2022-07-21T12:00:00Z"
        }))
        .expect("decode");

        let document = document_from_wire(wire).expect("document");
        assert_eq!(document.slug.as_str(), "my-new-post");
    }
}
