//! Asset pipeline for the avatar image
//!
//! The contract is `(source, width, height) -> rendition reference`:
//! decoding and resizing are delegated to the `image` crate, the rendition
//! is written under `public/images/`, and render code only ever sees the
//! returned [`AvatarRendition`].

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::ImageReader;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A fixed-size derived copy of the avatar source image
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvatarRendition {
    /// Root-relative URL of the rendition
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Derive a fixed-size rendition of `source` and write it into
/// `public_dir/images/`.
///
/// The rendition is center-cropped to exactly `width` x `height`, named
/// `<stem>-<w>x<h>.<ext>`, and returned as a root-relative reference.
pub fn fixed_rendition(
    source: &Path,
    width: u32,
    height: u32,
    public_dir: &Path,
    root: &str,
) -> Result<AvatarRendition> {
    let img = ImageReader::open(source)
        .with_context(|| format!("Failed to open avatar source {:?}", source))?
        .with_guessed_format()
        .with_context(|| format!("Failed to probe avatar format {:?}", source))?
        .decode()
        .with_context(|| format!("Failed to decode avatar source {:?}", source))?;

    let rendition = img.resize_to_fill(width, height, FilterType::Lanczos3);

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("avatar");
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let filename = format!("{}-{}x{}.{}", stem, width, height, ext);

    let out_dir = public_dir.join("images");
    fs::create_dir_all(&out_dir)?;
    let out_path = out_dir.join(&filename);
    rendition
        .save(&out_path)
        .with_context(|| format!("Failed to write avatar rendition {:?}", out_path))?;

    tracing::debug!("Generated avatar rendition: {:?}", out_path);

    Ok(AvatarRendition {
        path: format!("{}images/{}", root, filename),
        width,
        height,
    })
}
