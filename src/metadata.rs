//! Build-time resolution of site metadata
//!
//! The biography block never observes partial metadata: resolution happens
//! once, before any page renders, and a missing field aborts the build with
//! a diagnostic naming that field.

use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;

/// A site metadata field required at build time was absent or empty.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("site metadata field `{0}` is missing or empty in _config.yml")]
    MissingField(&'static str),
}

/// Social handles, guaranteed non-empty after resolution
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Social {
    pub github: String,
    pub email: String,
}

/// Resolved site metadata, read-only for the rest of the build
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SiteMetadata {
    pub author: String,
    pub social: Social,
}

impl SiteMetadata {
    /// Resolve metadata from the site configuration, failing fast on any
    /// missing field.
    pub fn resolve(config: &SiteConfig) -> Result<Self, MetadataError> {
        let author = non_empty(Some(config.author.as_str()))
            .ok_or(MetadataError::MissingField("author"))?;
        let github = non_empty(config.social.github.as_deref())
            .ok_or(MetadataError::MissingField("social.github"))?;
        let email = non_empty(config.social.email.as_deref())
            .ok_or(MetadataError::MissingField("social.email"))?;

        Ok(Self {
            author,
            social: Social { github, email },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
