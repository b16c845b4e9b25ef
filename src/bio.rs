//! The author biography block
//!
//! The block pulls its own data: callers never pass display props, they
//! hand over the site configuration and the avatar rendition, and
//! resolution validates the metadata contract before anything renders.
//! `render` is a pure function of the resolved data.

use serde::Serialize;

use crate::assets::AvatarRendition;
use crate::config::SiteConfig;
use crate::helpers::escape_html;
use crate::metadata::{MetadataError, SiteMetadata};

/// Resolved data for the biography block
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Bio {
    pub metadata: SiteMetadata,
    pub avatar: AvatarRendition,
}

impl Bio {
    /// Resolve the biography data from the site configuration
    ///
    /// Fails with a diagnostic naming the missing field; there is no
    /// fallback render state.
    pub fn resolve(config: &SiteConfig, avatar: AvatarRendition) -> Result<Self, MetadataError> {
        Ok(Self {
            metadata: SiteMetadata::resolve(config)?,
            avatar,
        })
    }

    /// The author's profile URL. The handle passes through unescaped as a
    /// path segment.
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.metadata.social.github)
    }

    /// The author's contact URL
    pub fn contact_url(&self) -> String {
        format!("mailto:{}", self.metadata.social.email)
    }

    /// Render the biography block to an HTML fragment
    pub fn render(&self) -> String {
        let author = escape_html(&self.metadata.author);
        format!(
            r#"<div class="bio">
  <img class="bio-avatar" src="{src}" width="{width}" height="{height}" alt="{author}">
  <p>Written by <strong>{author}</strong>.
    <a href="{profile}" target="_blank" rel="noopener noreferrer">GitHub</a>
    &middot;
    <a href="{contact}">Email</a>
  </p>
</div>"#,
            src = self.avatar.path,
            width = self.avatar.width,
            height = self.avatar.height,
            author = author,
            profile = self.profile_url(),
            contact = self.contact_url(),
        )
    }
}
