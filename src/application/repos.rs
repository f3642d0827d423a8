//! Contracts for the three external collaborators.
//!
//! Each collaborator is consumed through an object-safe trait injected as
//! `Arc<dyn …>`, so route handlers never touch a concrete client and tests
//! substitute fakes without any global state. Not-found is `Ok(None)`;
//! `Err` always means the collaborator itself failed, and the two surface
//! as different route outcomes (404 vs 5xx).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::content::ContentDocument;
use crate::domain::session::{Identity, Session};
use crate::domain::slug::Slug;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content store unavailable: {message}")]
    Unavailable { message: String },
    #[error("content store returned a malformed document: {message}")]
    Malformed { message: String },
}

impl RepoError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Read access to the document store.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<ContentDocument>, RepoError>;

    /// The full collection, newest first by last modification. The ordering
    /// is part of the contract: it feeds the listing page as-is and is never
    /// re-sorted downstream.
    async fn list_all(&self) -> Result<Vec<ContentDocument>, RepoError>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl SessionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Resolves the inbound request's session snapshot.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `token` is the raw session cookie value; an absent cookie resolves to
    /// [`Session::Anonymous`] without a provider round-trip. Idempotent
    /// within one request; never mutates provider state.
    async fn resolve(&self, token: Option<&str>) -> Result<Session, SessionError>;
}

/// A hosted checkout created for one visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("billing service unavailable: {message}")]
    Unavailable { message: String },
}

impl CheckoutError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Starts a checkout with the payment collaborator. Branch selection is
/// varco's job; everything past the hosted checkout URL is not.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_checkout(&self, identity: &Identity) -> Result<CheckoutSession, CheckoutError>;
}
