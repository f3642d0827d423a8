//! varco — a subscription-gated publication server.
//!
//! Public routes serve the post listing and non-sensitive previews to every
//! visitor; full post bodies are only rendered for sessions carrying a
//! verified active subscription. Identity, content storage, and checkout are
//! external collaborators reached through the traits in
//! [`application::repos`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
