//! The access decision engine.
//!
//! Pure, total functions from (route kind, session) to an outcome. There are
//! exactly three session states — anonymous, authenticated without a
//! subscription, authenticated with one — and no retry or intermediate
//! state, since session resolution is synchronous to the request.
//!
//! The full-post and preview routes are deliberately asymmetric and must not
//! be unified: the full post is gated on the server *before* any body bytes
//! exist, so sensitive content never leaves the process for an unsubscribed
//! viewer; the preview is non-sensitive, ships unconditionally, and carries
//! its navigation decision to the client alongside the page.

use crate::domain::content::Post;
use crate::domain::session::{Identity, Session};
use crate::domain::slug::Slug;

/// Outcome of gating one route for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    RenderFull(Post),
    RenderPreview(Post),
    Redirect(String),
}

/// Server-side gate for `/posts/{slug}`, evaluated before the response body
/// is constructed.
pub fn decide_full_post(session: &Session, post: Post) -> AccessDecision {
    match session.subscription() {
        Some(_) => AccessDecision::RenderFull(post),
        None => {
            let destination = format!("/posts/preview/{}", post.slug);
            AccessDecision::Redirect(destination)
        }
    }
}

/// What the delivered preview page should do once it reaches the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientGate {
    /// Subscriber landed on the preview: move them to the full post.
    Navigate(String),
    /// Show the truncated body plus the subscribe call-to-action.
    Offer,
}

/// Client-side gate shipped with `/posts/preview/{slug}`. The preview body
/// itself renders unconditionally.
pub fn decide_preview(session: &Session, slug: &Slug) -> ClientGate {
    match session.subscription() {
        Some(_) => ClientGate::Navigate(format!("/posts/{slug}")),
        None => ClientGate::Offer,
    }
}

/// Branch taken by the subscribe action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeAction<'a> {
    /// Not signed in: hand off to the identity provider.
    SignIn,
    /// Already paying: straight back to the listing, no checkout.
    AlreadySubscribed,
    /// Signed in, not paying: start a checkout for this identity.
    Checkout(&'a Identity),
}

pub fn decide_subscribe(session: &Session) -> SubscribeAction<'_> {
    match session {
        Session::Anonymous => SubscribeAction::SignIn,
        Session::Authenticated(identity) => {
            if identity.subscription.is_some() {
                SubscribeAction::AlreadySubscribed
            } else {
                SubscribeAction::Checkout(identity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::application::transform::post_from_document;
    use crate::domain::content::{ContentDocument, RichTextBlock};

    fn sample_post() -> Post {
        post_from_document(&ContentDocument {
            slug: Slug::parse("my-new-post").expect("slug"),
            title: vec![RichTextBlock::Heading("My New Post".to_string())],
            body: vec![RichTextBlock::Paragraph("This is my new post".to_string())],
            last_modified: datetime!(2022-07-21 12:00 UTC),
        })
    }

    fn subscriber() -> Session {
        Session::Authenticated(Identity {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            subscription: Some("fake-active-subscription".to_string()),
        })
    }

    fn member_without_subscription() -> Session {
        Session::Authenticated(Identity {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            subscription: None,
        })
    }

    #[test]
    fn full_post_redirects_every_session_without_a_subscription() {
        for session in [Session::Anonymous, member_without_subscription()] {
            let decision = decide_full_post(&session, sample_post());
            assert_eq!(
                decision,
                AccessDecision::Redirect("/posts/preview/my-new-post".to_string())
            );
        }
    }

    #[test]
    fn full_post_renders_for_subscribers() {
        let decision = decide_full_post(&subscriber(), sample_post());
        assert_eq!(decision, AccessDecision::RenderFull(sample_post()));
    }

    #[test]
    fn preview_navigates_subscribers_to_the_full_post() {
        let slug = Slug::parse("my-new-post").expect("slug");
        assert_eq!(
            decide_preview(&subscriber(), &slug),
            ClientGate::Navigate("/posts/my-new-post".to_string())
        );
    }

    #[test]
    fn preview_offers_the_cta_to_everyone_else() {
        let slug = Slug::parse("my-new-post").expect("slug");
        for session in [Session::Anonymous, member_without_subscription()] {
            assert_eq!(decide_preview(&session, &slug), ClientGate::Offer);
        }
    }

    #[test]
    fn subscribe_sends_anonymous_visitors_to_sign_in() {
        assert_eq!(
            decide_subscribe(&Session::Anonymous),
            SubscribeAction::SignIn
        );
    }

    #[test]
    fn subscribe_skips_checkout_for_active_subscribers() {
        let session = subscriber();
        assert_eq!(
            decide_subscribe(&session),
            SubscribeAction::AlreadySubscribed
        );
    }

    #[test]
    fn subscribe_starts_checkout_for_members_without_a_subscription() {
        let session = member_without_subscription();
        match decide_subscribe(&session) {
            SubscribeAction::Checkout(identity) => {
                assert_eq!(identity.email, "john.doe@example.com");
            }
            other => panic!("expected checkout, got {other:?}"),
        }
    }
}
