//! Validated document identifiers.
//!
//! Slugs arrive from two directions: route parameters typed by visitors and
//! `uid` fields returned by the content store. Route parameters must already
//! be in canonical form (a non-canonical slug cannot name a stored document,
//! so it is a not-found, not a bad request); store identifiers are
//! normalized defensively via [`Slug::derive`].

use std::fmt;

use slug::slugify;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("`{input}` is not a canonical slug")]
    NotCanonical { input: String },
}

/// A canonical, lowercase, hyphen-separated document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Accept an identifier that is already canonical, e.g. a route
    /// parameter. Rejects anything slugification would alter.
    pub fn parse(input: &str) -> Result<Self, SlugError> {
        let derived = Self::derive(input)?;
        if derived.0 != input {
            return Err(SlugError::NotCanonical {
                input: input.to_string(),
            });
        }
        Ok(derived)
    }

    /// Normalize free-form text into a slug, e.g. a store-provided uid.
    pub fn derive(input: &str) -> Result<Self, SlugError> {
        if input.trim().is_empty() {
            return Err(SlugError::EmptyInput);
        }

        let candidate = slugify(input);
        if candidate.is_empty() {
            return Err(SlugError::Unrepresentable {
                input: input.to_string(),
            });
        }

        Ok(Slug(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
