//! Content loader - loads posts from the source directory

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};
use crate::helpers::{encode_path, full_url_for, url_for};
use crate::Plume;

/// Loads posts from `source/_posts`
pub struct ContentLoader<'a> {
    plume: &'a Plume,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(plume: &'a Plume) -> Self {
        Self {
            plume,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts, newest first
    ///
    /// Drafts are skipped unless `render_drafts` is set; future-dated posts
    /// are skipped unless `future` is set.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.plume.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        let publishable = post.published || self.plume.config.render_drafts;
                        let timely = self.plume.config.future || post.date <= Local::now();
                        if publishable && timely {
                            posts.push(post);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Newest first
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Fall back to the file's mtime when front-matter has no date
        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));
        let updated = fm.parse_updated().or(file_modified);

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.plume.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // The :title permalink placeholder uses the source filename
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let rel_path = self.generate_permalink(&date, &slug);
        let permalink_path = url_for(&self.plume.config, &rel_path);
        let permalink = full_url_for(&self.plume.config, &encode_path(&rel_path));

        let content_html = self.renderer.render(body)?;

        let mut post = Post::new(title, date, source);
        post.updated = updated;
        post.description = fm.description;
        post.raw = body.to_string();
        post.content = content_html;
        post.layout = fm.layout.unwrap_or_else(|| "post".to_string());
        post.full_source = path.to_path_buf();
        post.path = permalink_path;
        post.permalink = permalink;
        post.published = fm.published;
        post.slug = slug;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Expand the permalink pattern into a path relative to the site root
    fn generate_permalink(&self, date: &chrono::DateTime<Local>, slug: &str) -> String {
        let pattern = &self.plume.config.permalink;

        let result = pattern
            .replace(":year", &date.format("%Y").to_string())
            .replace(":month", &date.format("%m").to_string())
            .replace(":day", &date.format("%d").to_string())
            .replace(":title", slug)
            .replace(":name", slug);

        result.trim_start_matches('/').to_string()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_post(front: &str, body: &str) -> (TempDir, Plume) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("source/_posts")).unwrap();
        fs::write(
            dir.path().join("source/_posts/test.md"),
            format!("{}\n{}\n", front, body),
        )
        .unwrap();
        let plume = Plume::new(dir.path()).unwrap();
        (dir, plume)
    }

    #[test]
    fn test_load_post_with_frontmatter() {
        let (_dir, plume) = site_with_post(
            "---\ntitle: \"Test\"\ndate: \"2020-01-01\"\ndescription: \"d\"\n---",
            "Hello",
        );

        let posts = ContentLoader::new(&plume).load_posts().unwrap();
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.title, "Test");
        assert_eq!(post.description.as_deref(), Some("d"));
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2020-01-01");
        assert_eq!(post.path, "/2020/01/01/test/");
        assert_eq!(post.permalink, "http://example.com/2020/01/01/test/");
        assert!(post.content.contains("Hello"));
    }

    #[test]
    fn test_drafts_skipped_by_default() {
        let (_dir, plume) = site_with_post(
            "---\ntitle: WIP\ndate: \"2020-01-01\"\npublished: false\n---",
            "Draft body",
        );

        let posts = ContentLoader::new(&plume).load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("old.md"),
            "---\ntitle: Old\ndate: \"2019-05-01\"\n---\nold\n",
        )
        .unwrap();
        fs::write(
            posts_dir.join("new.md"),
            "---\ntitle: New\ndate: \"2021-05-01\"\n---\nnew\n",
        )
        .unwrap();

        let plume = Plume::new(dir.path()).unwrap();
        let posts = ContentLoader::new(&plume).load_posts().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "New");
        assert_eq!(posts[1].title, "Old");
    }

    #[test]
    fn test_permalink_encodes_spaces_in_filename() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("hello world.md"),
            "---\ntitle: Spaced\ndate: \"2020-01-01\"\n---\nbody\n",
        )
        .unwrap();

        let plume = Plume::new(dir.path()).unwrap();
        let posts = ContentLoader::new(&plume).load_posts().unwrap();
        assert_eq!(
            posts[0].permalink,
            "http://example.com/2020/01/01/hello%20world/"
        );
    }
}
