//! Pure derivations from raw store documents to renderable values.
//!
//! Everything here is deterministic and side-effect free: the same document
//! always yields byte-identical output, which is what makes responses
//! cacheable and the tests exact.

use ammonia::clean_text;

use crate::domain::content::{ContentDocument, Post, PostSummary, RichTextBlock};
use crate::util::locale;

/// Upper bound for listing excerpts, in characters.
pub const EXCERPT_MAX_CHARS: usize = 140;

/// How many leading body blocks a preview exposes.
pub const PREVIEW_BLOCK_LIMIT: usize = 3;

const ELLIPSIS: char = '…';

/// Full rendering of a document.
pub fn post_from_document(doc: &ContentDocument) -> Post {
    Post {
        slug: doc.slug.clone(),
        title: flatten_title(&doc.title),
        content: render_blocks(&doc.body),
        updated_at: locale::publication_long_date(doc.last_modified),
    }
}

/// Truncated rendering for the preview page: only the first
/// [`PREVIEW_BLOCK_LIMIT`] body blocks are included, so the sensitive tail
/// of the document never reaches an unsubscribed reader.
pub fn preview_from_document(doc: &ContentDocument) -> Post {
    let visible = &doc.body[..doc.body.len().min(PREVIEW_BLOCK_LIMIT)];
    Post {
        slug: doc.slug.clone(),
        title: flatten_title(&doc.title),
        content: render_blocks(visible),
        updated_at: locale::publication_long_date(doc.last_modified),
    }
}

/// Listing entry for a document.
pub fn summary_from_document(doc: &ContentDocument) -> PostSummary {
    PostSummary {
        slug: doc.slug.clone(),
        title: flatten_title(&doc.title),
        excerpt: excerpt(&doc.body),
        updated_at: locale::publication_long_date(doc.last_modified),
    }
}

/// Fold the text of every heading block, in order, with no separator.
///
/// Documents carry a single heading in practice, but the fold must not
/// assume that. A title field with no heading at all is a data-quality
/// defect; it degrades to an empty title rather than failing the render.
fn flatten_title(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            RichTextBlock::Heading(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Render body blocks to HTML in their original order.
///
/// Paragraphs wrap in `<p>`; unknown block kinds are carried through the
/// same way, because dropping content is a data-loss bug. Block text is
/// escaped before wrapping; only the wrapper markup is trusted.
fn render_blocks(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            RichTextBlock::Heading(text) => {
                html.push_str("<h2>");
                html.push_str(&clean_text(text));
                html.push_str("</h2>");
            }
            RichTextBlock::Paragraph(text) | RichTextBlock::Other(text) => {
                html.push_str("<p>");
                html.push_str(&clean_text(text));
                html.push_str("</p>");
            }
        }
    }
    html
}

/// Plain text of the first paragraph block, length-bounded.
fn excerpt(blocks: &[RichTextBlock]) -> String {
    let text = blocks
        .iter()
        .find_map(|block| match block {
            RichTextBlock::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
        .unwrap_or("");
    truncate_excerpt(text)
}

fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::slug::Slug;

    fn document(title: Vec<RichTextBlock>, body: Vec<RichTextBlock>) -> ContentDocument {
        ContentDocument {
            slug: Slug::parse("my-new-post").expect("slug"),
            title,
            body,
            last_modified: datetime!(2022-07-21 12:00 UTC),
        }
    }

    fn sample_document() -> ContentDocument {
        document(
            vec![RichTextBlock::Heading("My New Post".to_string())],
            vec![RichTextBlock::Paragraph("This is my new post".to_string())],
        )
    }

    #[test]
    fn post_matches_store_document() {
        let post = post_from_document(&sample_document());

        assert_eq!(post.slug.as_str(), "my-new-post");
        assert_eq!(post.title, "My New Post");
        assert_eq!(post.content, "<p>This is my new post</p>");
        assert_eq!(post.updated_at, "21 de julho de 2022");
    }

    #[test]
    fn title_folds_every_heading_block_in_order() {
        let doc = document(
            vec![
                RichTextBlock::Heading("My ".to_string()),
                RichTextBlock::Paragraph("ignored".to_string()),
                RichTextBlock::Heading("New Post".to_string()),
            ],
            vec![],
        );

        assert_eq!(post_from_document(&doc).title, "My New Post");
    }

    #[test]
    fn title_without_heading_degrades_to_empty() {
        let doc = document(
            vec![RichTextBlock::Paragraph("not a heading".to_string())],
            vec![RichTextBlock::Paragraph("body".to_string())],
        );

        let post = post_from_document(&doc);
        assert_eq!(post.title, "");
        assert_eq!(post.content, "<p>body</p>");
    }

    #[test]
    fn unknown_block_kinds_are_rendered_not_dropped() {
        let doc = document(
            vec![RichTextBlock::Heading("Title".to_string())],
            vec![
                RichTextBlock::Paragraph("first".to_string()),
                RichTextBlock::Other("embedded caption".to_string()),
                RichTextBlock::Paragraph("last".to_string()),
            ],
        );

        assert_eq!(
            post_from_document(&doc).content,
            "<p>first</p><p>embedded caption</p><p>last</p>"
        );
    }

    #[test]
    fn body_headings_keep_heading_markup() {
        let doc = document(
            vec![RichTextBlock::Heading("Title".to_string())],
            vec![
                RichTextBlock::Heading("Section".to_string()),
                RichTextBlock::Paragraph("text".to_string()),
            ],
        );

        assert_eq!(
            post_from_document(&doc).content,
            "<h2>Section</h2><p>text</p>"
        );
    }

    #[test]
    fn block_text_is_escaped_before_wrapping() {
        let doc = document(
            vec![RichTextBlock::Heading("Title".to_string())],
            vec![RichTextBlock::Paragraph(
                "1 < 2 & <script>alert(1)</script>".to_string(),
            )],
        );

        let content = post_from_document(&doc).content;
        assert!(!content.contains("<script>"));
        assert!(content.starts_with("<p>"));
        assert!(content.ends_with("</p>"));
    }

    #[test]
    fn preview_exposes_only_the_leading_blocks() {
        let doc = document(
            vec![RichTextBlock::Heading("Title".to_string())],
            vec![
                RichTextBlock::Paragraph("one".to_string()),
                RichTextBlock::Paragraph("two".to_string()),
                RichTextBlock::Paragraph("three".to_string()),
                RichTextBlock::Paragraph("four".to_string()),
            ],
        );

        let preview = preview_from_document(&doc);
        assert_eq!(preview.content, "<p>one</p><p>two</p><p>three</p>");
    }

    #[test]
    fn preview_of_a_short_document_is_the_whole_document() {
        let preview = preview_from_document(&sample_document());
        assert_eq!(preview.content, "<p>This is my new post</p>");
    }

    #[test]
    fn summary_takes_the_first_paragraph_as_excerpt() {
        let doc = document(
            vec![RichTextBlock::Heading("My New Post".to_string())],
            vec![
                RichTextBlock::Other("caption".to_string()),
                RichTextBlock::Paragraph("This is my new post".to_string()),
                RichTextBlock::Paragraph("second paragraph".to_string()),
            ],
        );

        let summary = summary_from_document(&doc);
        assert_eq!(summary.title, "My New Post");
        assert_eq!(summary.excerpt, "This is my new post");
        assert_eq!(summary.updated_at, "21 de julho de 2022");
    }

    #[test]
    fn summary_without_any_paragraph_has_an_empty_excerpt() {
        let doc = document(
            vec![RichTextBlock::Heading("Title".to_string())],
            vec![RichTextBlock::Other("caption".to_string())],
        );

        assert_eq!(summary_from_document(&doc).excerpt, "");
    }

    #[test]
    fn short_excerpts_are_returned_unchanged() {
        assert_eq!(truncate_excerpt("short text"), "short text");
    }

    #[test]
    fn truncation_is_idempotent_on_short_text() {
        let once = truncate_excerpt("short text");
        assert_eq!(truncate_excerpt(&once), once);
    }

    #[test]
    fn long_excerpts_are_bounded_and_marked() {
        let long = "palavra ".repeat(40);
        let truncated = truncate_excerpt(&long);

        assert!(truncated.chars().count() <= EXCERPT_MAX_CHARS + 1);
        assert!(truncated.ends_with(ELLIPSIS));
    }

    #[test]
    fn transforms_are_deterministic() {
        let doc = sample_document();
        assert_eq!(post_from_document(&doc), post_from_document(&doc));
        assert_eq!(summary_from_document(&doc), summary_from_document(&doc));
    }
}
