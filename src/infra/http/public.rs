use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    extract::{Path, State},
    middleware::from_fn,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use metrics::counter;
use serde::Serialize;
use url::Url;

use crate::{
    application::{
        access::{
            AccessDecision, ClientGate, SubscribeAction, decide_full_post, decide_preview,
            decide_subscribe,
        },
        error::HttpError,
        gate::GateService,
        repos::{CheckoutGateway, SessionResolver},
    },
    domain::slug::Slug,
    presentation::views::{
        PostTemplate, PostsTemplate, PreviewTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub gate: Arc<GateService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub billing: Arc<dyn CheckoutGateway>,
    /// Identity provider's sign-in entry point, e.g. its GitHub OAuth flow.
    pub sign_in_url: Url,
    /// Name of the cookie carrying the session token.
    pub session_cookie: String,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/posts", get(posts_index))
        .route("/posts/{slug}", get(post_detail))
        .route("/posts/preview/{slug}", get(post_preview))
        .route("/subscribe", post(subscribe))
        .route("/api/users", get(list_users))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

async fn root() -> Redirect {
    Redirect::to("/posts")
}

async fn posts_index(State(state): State<HttpState>) -> Response {
    match state.gate.listing().await {
        Ok(posts) => render_template_response(PostsTemplate { posts }, StatusCode::OK),
        Err(err) => HttpError::from(err).into_response(),
    }
}

/// Full post. The access decision runs server-side, after both collaborators
/// have answered but before any body bytes are produced: an unsubscribed
/// visitor only ever receives the redirect.
async fn post_detail(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    let Ok(slug) = Slug::parse(&slug) else {
        return render_not_found_response();
    };

    let token = session_token(&jar, &state.session_cookie);
    let (session, fetched) = tokio::join!(
        state.sessions.resolve(token.as_deref()),
        state.gate.load_post(&slug),
    );

    let session = match session {
        Ok(session) => session,
        Err(err) => return HttpError::from(err).into_response(),
    };
    let post = match fetched {
        Ok(Some(post)) => post,
        Ok(None) => return render_not_found_response(),
        Err(err) => return HttpError::from(err).into_response(),
    };

    match decide_full_post(&session, post) {
        AccessDecision::RenderFull(post) => {
            counter!("varco_gate_full_render_total").increment(1);
            render_template_response(PostTemplate { post }, StatusCode::OK)
        }
        AccessDecision::RenderPreview(post) => render_template_response(
            PreviewTemplate {
                post,
                navigate_to: None,
            },
            StatusCode::OK,
        ),
        AccessDecision::Redirect(destination) => {
            counter!("varco_gate_preview_redirect_total").increment(1);
            Redirect::to(&destination).into_response()
        }
    }
}

/// Preview. The truncated body renders unconditionally; the session only
/// determines the navigation affordance the delivered page carries, which
/// the client honors after the fact.
async fn post_preview(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    let Ok(slug) = Slug::parse(&slug) else {
        return render_not_found_response();
    };

    let token = session_token(&jar, &state.session_cookie);
    let (session, fetched) = tokio::join!(
        state.sessions.resolve(token.as_deref()),
        state.gate.load_preview(&slug),
    );

    let session = match session {
        Ok(session) => session,
        Err(err) => return HttpError::from(err).into_response(),
    };
    let post = match fetched {
        Ok(Some(post)) => post,
        Ok(None) => return render_not_found_response(),
        Err(err) => return HttpError::from(err).into_response(),
    };

    let navigate_to = match decide_preview(&session, &slug) {
        ClientGate::Navigate(destination) => {
            counter!("varco_gate_preview_upgrade_total").increment(1);
            Some(destination)
        }
        ClientGate::Offer => None,
    };

    render_template_response(PreviewTemplate { post, navigate_to }, StatusCode::OK)
}

async fn subscribe(State(state): State<HttpState>, jar: CookieJar) -> Response {
    let token = session_token(&jar, &state.session_cookie);
    let session = match state.sessions.resolve(token.as_deref()).await {
        Ok(session) => session,
        Err(err) => return HttpError::from(err).into_response(),
    };

    match decide_subscribe(&session) {
        SubscribeAction::SignIn => {
            counter!("varco_subscribe_sign_in_total").increment(1);
            Redirect::to(state.sign_in_url.as_str()).into_response()
        }
        SubscribeAction::AlreadySubscribed => {
            counter!("varco_subscribe_repeat_total").increment(1);
            Redirect::to("/posts").into_response()
        }
        SubscribeAction::Checkout(identity) => {
            counter!("varco_subscribe_checkout_total").increment(1);
            match state.billing.create_checkout(identity).await {
                Ok(checkout) => Redirect::to(&checkout.url).into_response(),
                Err(err) => HttpError::from(err).into_response(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct UserRecord {
    id: u32,
    name: &'static str,
}

/// Static editorial roster. Deliberately outside the gated-content model:
/// no session, no collaborator, no access control.
async fn list_users() -> Json<Vec<UserRecord>> {
    Json(vec![
        UserRecord {
            id: 1,
            name: "Lucas",
        },
        UserRecord {
            id: 2,
            name: "Yngrid",
        },
        UserRecord {
            id: 3,
            name: "Lolla",
        },
    ])
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback() -> Response {
    render_not_found_response()
}

fn session_token(jar: &CookieJar, cookie_name: &str) -> Option<String> {
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}
