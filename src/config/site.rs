//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // Author metadata consumed by the biography block
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Writing
    pub new_post_name: String,
    pub default_layout: String,
    pub render_drafts: bool,
    pub future: bool,

    // Date / Time format
    pub date_format: String,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "A Plume Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            social: SocialConfig::default(),
            avatar: AvatarConfig::default(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),

            new_post_name: ":title.md".to_string(),
            default_layout: "post".to_string(),
            render_drafts: false,
            future: true,

            date_format: "YYYY-MM-DD".to_string(),

            per_page: 10,
            pagination_dir: "page".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Social handles for the site author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub github: Option<String>,
    pub email: Option<String>,
}

/// Avatar image configuration
///
/// `source` is relative to the base directory; the generator derives a
/// fixed `width` x `height` rendition from it at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            source: "source/images/avatar.png".to_string(),
            width: 50,
            height: 50,
        }
    }
}
