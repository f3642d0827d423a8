//! Content entities: raw documents from the store and their derived views.

use time::OffsetDateTime;

use crate::domain::slug::Slug;

/// One structural unit of a rich-text field.
///
/// The variant set is closed so the transformer can match exhaustively;
/// anything the store emits beyond headings and paragraphs lands in
/// [`RichTextBlock::Other`] and is still rendered, never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextBlock {
    Heading(String),
    Paragraph(String),
    Other(String),
}

impl RichTextBlock {
    pub fn text(&self) -> &str {
        match self {
            RichTextBlock::Heading(text)
            | RichTextBlock::Paragraph(text)
            | RichTextBlock::Other(text) => text,
        }
    }
}

/// A document exactly as the content store returned it.
///
/// Immutable once fetched; one instance per request, owned by the route
/// handler for the duration of that request. Block order is significant in
/// both fields. A well-formed `title` contains at least one heading block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub slug: Slug,
    pub title: Vec<RichTextBlock>,
    pub body: Vec<RichTextBlock>,
    pub last_modified: OffsetDateTime,
}

/// A post ready for rendering. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: Slug,
    pub title: String,
    /// Rendered HTML body. Block text is escaped before wrapping.
    pub content: String,
    /// Localized long date, e.g. `21 de julho de 2022`.
    pub updated_at: String,
}

/// Listing entry for a post. Carries a bounded plain-text excerpt and never
/// the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub slug: Slug,
    pub title: String,
    pub excerpt: String,
    pub updated_at: String,
}
