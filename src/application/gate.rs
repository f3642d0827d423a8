//! Request-scoped composition of the content repository and the transforms.

use std::sync::Arc;

use crate::application::repos::{ContentRepo, RepoError};
use crate::application::transform;
use crate::domain::content::{Post, PostSummary};
use crate::domain::slug::Slug;

/// Loads documents and derives their renderable forms. Owns no state beyond
/// the injected repository; every call is independent.
#[derive(Clone)]
pub struct GateService {
    content: Arc<dyn ContentRepo>,
}

impl GateService {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    /// Summaries for the listing page, in the repository's order.
    pub async fn listing(&self) -> Result<Vec<PostSummary>, RepoError> {
        let documents = self.content.list_all().await?;
        Ok(documents
            .iter()
            .map(transform::summary_from_document)
            .collect())
    }

    /// The full rendering of one post, or `None` when the slug has no
    /// document.
    pub async fn load_post(&self, slug: &Slug) -> Result<Option<Post>, RepoError> {
        let document = self.content.find_by_slug(slug).await?;
        Ok(document
            .as_ref()
            .map(transform::post_from_document))
    }

    /// The truncated preview rendering of one post.
    pub async fn load_preview(&self, slug: &Slug) -> Result<Option<Post>, RepoError> {
        let document = self.content.find_by_slug(slug).await?;
        Ok(document
            .as_ref()
            .map(transform::preview_from_document))
    }
}
