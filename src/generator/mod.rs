//! Generator module - renders the loaded content into static HTML
//!
//! The generate pass is a pure transform over data resolved up front: the
//! biography block and all posts are in memory and immutable before the
//! first template renders.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::assets;
use crate::bio::Bio;
use crate::content::Post;
use crate::helpers::{date_xml, escape_xml, format_date};
use crate::templates::{
    ConfigData, NavPost, PaginationData, PostData, SiteData, TemplateRenderer,
};
use crate::Plume;

/// Static site generator using the embedded theme
pub struct Generator {
    plume: Plume,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(plume: &Plume) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            plume: plume.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    ///
    /// `public/` is rebuilt from the current content set, so posts whose
    /// source files were removed disappear from the output.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        if self.plume.public_dir.exists() {
            fs::remove_dir_all(&self.plume.public_dir)?;
        }
        fs::create_dir_all(&self.plume.public_dir)?;

        self.copy_source_assets()?;

        // Resolve the biography data before any page renders; a missing
        // metadata field aborts the build here.
        let avatar = assets::fixed_rendition(
            &self.plume.base_dir.join(&self.plume.config.avatar.source),
            self.plume.config.avatar.width,
            self.plume.config.avatar.height,
            &self.plume.public_dir,
            &self.plume.config.root,
        )?;
        let bio = Bio::resolve(&self.plume.config, avatar)?;
        let bio_html = bio.render();

        let mut sorted_posts: Vec<_> = posts.to_vec();
        sorted_posts.sort_by(|a, b| b.date.cmp(&a.date));

        let site_data = self.build_site_data(&sorted_posts);
        let config_data = self.build_config_data();

        self.generate_index_pages(&site_data, &config_data, &bio_html)?;
        self.generate_post_pages(&sorted_posts, &site_data, &config_data, &bio_html)?;
        self.generate_atom_feed(&sorted_posts)?;

        tracing::info!("Generated {} posts", sorted_posts.len());

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self, posts: &[Post]) -> SiteData {
        let date_format = &self.plume.config.date_format;
        let posts = posts
            .iter()
            .map(|p| PostData {
                title: p.title.clone(),
                date: format_date(&p.date, date_format),
                description: p.description.clone(),
                path: format!("/{}", p.path.trim_start_matches('/')),
                permalink: p.permalink.clone(),
                content: p.content.clone(),
            })
            .collect();

        SiteData { posts }
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.plume.config;
        ConfigData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            language: config.language.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        bio_html: &str,
    ) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("config", config_data);
        context.insert("bio_html", bio_html);
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context
    }

    /// Generate index pages with pagination
    fn generate_index_pages(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        bio_html: &str,
    ) -> Result<()> {
        let per_page = self.plume.config.per_page.max(1);
        let pagination_dir = &self.plume.config.pagination_dir;
        let total_pages = site_data.posts.len().div_ceil(per_page).max(1);

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(site_data.posts.len());
            let page_posts = &site_data.posts[start..end];

            let pagination = PaginationData {
                per_page,
                total: total_pages,
                current: page_num,
                prev_link: match page_num {
                    1 => String::new(),
                    2 => "/".to_string(),
                    n => format!("/{}/{}/", pagination_dir, n - 1),
                },
                next_link: if page_num < total_pages {
                    format!("/{}/{}/", pagination_dir, page_num + 1)
                } else {
                    String::new()
                },
            };

            let mut context = self.create_base_context(site_data, config_data, bio_html);
            context.insert("page_posts", page_posts);
            context.insert("pagination", &pagination);

            let html = self.renderer.render("index.html", &context)?;

            let output_path = if page_num == 1 {
                self.plume.public_dir.join("index.html")
            } else {
                self.plume
                    .public_dir
                    .join(pagination_dir)
                    .join(page_num.to_string())
                    .join("index.html")
            };

            write_page(&output_path, &html)?;
        }

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(
        &self,
        posts: &[Post],
        site_data: &SiteData,
        config_data: &ConfigData,
        bio_html: &str,
    ) -> Result<()> {
        let date_format = &self.plume.config.date_format;

        for post in posts {
            let prev_post = post.prev(posts).map(|p| NavPost {
                title: p.title.clone(),
                path: format!("/{}", p.path.trim_start_matches('/')),
            });
            let next_post = post.next(posts).map(|p| NavPost {
                title: p.title.clone(),
                path: format!("/{}", p.path.trim_start_matches('/')),
            });

            let mut context = self.create_base_context(site_data, config_data, bio_html);
            context.insert("page_title", &post.title);
            context.insert("page_date", &format_date(&post.date, date_format));
            context.insert("page_description", &post.description);
            context.insert("page_content", &post.content);
            if let Some(ref prev) = prev_post {
                context.insert("prev_post", prev);
            }
            if let Some(ref next) = next_post {
                context.insert("next_post", next);
            }

            let html = self.renderer.render("post.html", &context)?;

            let clean_path = post.path.trim_start_matches('/');
            let output_path = self.plume.public_dir.join(clean_path).join("index.html");
            write_page(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.plume.config;
        let url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            url
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Local::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(20) {
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&post.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", post.permalink));
            feed.push_str(&format!("    <id>{}</id>\n", post.permalink));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date_xml(&post.date)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                date_xml(&post.updated.unwrap_or(post.date))
            ));
            if let Some(ref description) = post.description {
                feed.push_str(&format!(
                    "    <summary>{}</summary>\n",
                    escape_xml(description)
                ));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        fs::write(self.plume.public_dir.join("atom.xml"), feed)?;
        Ok(())
    }

    /// Copy non-Markdown source assets into the output tree verbatim
    fn copy_source_assets(&self) -> Result<()> {
        if !self.plume.source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&self.plume.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let relative = path.strip_prefix(&self.plume.source_dir).unwrap_or(path);

            // Skip _posts, _drafts, and other underscore directories
            let first_component = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());
            if matches!(first_component, Some(first) if first.starts_with('_')) {
                continue;
            }

            if path.is_file() && !is_markdown(path) {
                let dest = self.plume.public_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
                tracing::debug!("Copied asset: {:?}", dest);
            }
        }

        Ok(())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use tempfile::TempDir;

    fn write_test_avatar(base: &Path) {
        let images = base.join("source/images");
        fs::create_dir_all(&images).unwrap();
        let img = image::RgbImage::from_pixel(120, 120, image::Rgb([90, 105, 190]));
        img.save(images.join("avatar.png")).unwrap();
    }

    fn test_site() -> (TempDir, Plume) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("source/_posts")).unwrap();
        write_test_avatar(dir.path());

        let config = r#"
title: Test Blog
author: Jane Doe
url: http://example.com
social:
  github: janedoe
  email: jane@example.com
"#;
        fs::write(dir.path().join("_config.yml"), config).unwrap();

        fs::write(
            dir.path().join("source/_posts/test.md"),
            "---\ntitle: \"Test\"\ndate: \"2020-01-01\"\ndescription: \"d\"\n---\nHello\n",
        )
        .unwrap();

        let plume = Plume::new(dir.path()).unwrap();
        (dir, plume)
    }

    fn generate(plume: &Plume) -> Vec<Post> {
        let posts = ContentLoader::new(plume).load_posts().unwrap();
        Generator::new(plume).unwrap().generate(&posts).unwrap();
        posts
    }

    #[test]
    fn test_post_generated_exactly_once_at_derived_url() {
        let (_dir, plume) = test_site();
        generate(&plume);

        // Routed by date and filename slug
        let page = plume.public_dir.join("2020/01/01/test/index.html");
        assert!(page.exists());

        let html = fs::read_to_string(&page).unwrap();
        assert!(html.contains("<h1>Test</h1>"));
        assert!(html.contains("Hello"));

        // Exactly one generated post page in the output tree
        let post_pages = WalkDir::new(&plume.public_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name() == "index.html"
                    && fs::read_to_string(e.path())
                        .map(|c| c.contains("<h1>Test</h1>"))
                        .unwrap_or(false)
            })
            .count();
        assert_eq!(post_pages, 1);
    }

    #[test]
    fn test_bio_rendered_on_pages() {
        let (_dir, plume) = test_site();
        generate(&plume);

        let index = fs::read_to_string(plume.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Jane Doe"));
        assert!(index.contains(r#"href="https://github.com/janedoe""#));
        assert!(index.contains(r#"rel="noopener noreferrer""#));
        assert!(index.contains(r#"href="mailto:jane@example.com""#));
        assert!(index.contains("/images/avatar-50x50.png"));
    }

    #[test]
    fn test_missing_metadata_fails_build() {
        let (dir, _) = test_site();
        // Rewrite the config without social handles
        fs::write(
            dir.path().join("_config.yml"),
            "title: Test Blog\nauthor: Jane Doe\n",
        )
        .unwrap();
        let plume = Plume::new(dir.path()).unwrap();

        let posts = ContentLoader::new(&plume).load_posts().unwrap();
        let err = Generator::new(&plume)
            .unwrap()
            .generate(&posts)
            .unwrap_err();
        assert!(err.to_string().contains("social.github"));
    }

    #[test]
    fn test_removed_post_disappears_from_output() {
        let (dir, plume) = test_site();
        generate(&plume);
        assert!(plume.public_dir.join("2020/01/01/test/index.html").exists());

        fs::remove_file(dir.path().join("source/_posts/test.md")).unwrap();
        generate(&plume);
        assert!(!plume.public_dir.join("2020/01/01/test/index.html").exists());
    }

    #[test]
    fn test_atom_feed_generated() {
        let (_dir, plume) = test_site();
        generate(&plume);

        let feed = fs::read_to_string(plume.public_dir.join("atom.xml")).unwrap();
        assert!(feed.contains("<title>Test Blog</title>"));
        assert!(feed.contains("http://example.com/2020/01/01/test/"));
        assert!(feed.contains("<summary>d</summary>"));
    }

    #[test]
    fn test_index_pagination() {
        let (dir, _) = test_site();
        for i in 1..=12 {
            fs::write(
                dir.path().join(format!("source/_posts/p{:02}.md", i)),
                format!(
                    "---\ntitle: Post {i}\ndate: \"2021-03-{:02}\"\ndescription: x\n---\nbody\n",
                    i
                ),
            )
            .unwrap();
        }
        let plume = Plume::new(dir.path()).unwrap();
        generate(&plume);

        assert!(plume.public_dir.join("index.html").exists());
        assert!(plume.public_dir.join("page/2/index.html").exists());

        let page2 = fs::read_to_string(plume.public_dir.join("page/2/index.html")).unwrap();
        assert!(page2.contains(r#"href="/""#));
    }
}
