use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::application::repos::{CheckoutError, RepoError, SessionError};
use crate::infra::error::InfraError;

/// Structured diagnostic attached to error responses. The response
/// middleware pulls it back out of the extensions when logging, so the
/// public body stays terse while the log line keeps the full chain.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// An error response with a public message and a private report.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport::from_message(source, status, detail);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<RepoError> for HttpError {
    fn from(error: RepoError) -> Self {
        match &error {
            RepoError::Unavailable { .. } => HttpError::from_error(
                "application::error::repo_to_http_error",
                StatusCode::SERVICE_UNAVAILABLE,
                "Content is temporarily unavailable",
                &error,
            ),
            RepoError::Malformed { .. } => HttpError::from_error(
                "application::error::repo_to_http_error",
                StatusCode::INTERNAL_SERVER_ERROR,
                "Content could not be processed",
                &error,
            ),
        }
    }
}

impl From<SessionError> for HttpError {
    fn from(error: SessionError) -> Self {
        HttpError::from_error(
            "application::error::session_to_http_error",
            StatusCode::SERVICE_UNAVAILABLE,
            "Sign-in is temporarily unavailable",
            &error,
        )
    }
}

impl From<CheckoutError> for HttpError {
    fn from(error: CheckoutError) -> Self {
        HttpError::from_error(
            "application::error::checkout_to_http_error",
            StatusCode::SERVICE_UNAVAILABLE,
            "Checkout is temporarily unavailable",
            &error,
        )
    }
}

/// Top-level application error used by the binary's bootstrap path.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
