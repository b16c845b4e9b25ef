//! List site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::Plume;

/// List site content by type
pub fn run(plume: &Plume, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(plume);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source
                );
            }
        }
        "route" | "routes" => {
            let posts = loader.load_posts()?;
            println!("Routes ({}):", posts.len());
            for post in posts {
                println!("  {} -> {}", post.path, post.source);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }

    Ok(())
}
