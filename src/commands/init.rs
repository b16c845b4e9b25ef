//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Plume;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("source/_drafts"))?;
    fs::create_dir_all(target_dir.join("source/images"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    let config_content = r#"# Plume Configuration

# Site
title: A Plume Blog
subtitle: ''
description: ''
author: John Doe
language: en

# Author metadata for the biography block. All fields are required
# at generation time; a missing field fails the build.
social:
  github: johndoe
  email: john@example.com
avatar:
  source: source/images/avatar.png
  width: 50
  height: 50

# URL
url: http://example.com
root: /
permalink: :year/:month/:day/:title/

# Directory
source_dir: source
public_dir: public

# Writing
new_post_name: :title.md
default_layout: post
render_drafts: false
future: true

# Date format
date_format: YYYY-MM-DD

# Pagination
per_page: 10
pagination_dir: page
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    let post_scaffold = "---\ntitle: {{ title }}\ndate: {{ date }}\ndescription:\n---\n";
    let draft_scaffold = "---\ntitle: {{ title }}\ndescription:\npublished: false\n---\n";

    fs::write(target_dir.join("scaffolds/post.md"), post_scaffold)?;
    fs::write(target_dir.join("scaffolds/draft.md"), draft_scaffold)?;

    // Placeholder avatar so the first generate succeeds out of the box
    let avatar = image::RgbImage::from_pixel(256, 256, image::Rgb([90, 105, 190]));
    avatar.save(target_dir.join("source/images/avatar.png"))?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: "Hello World"
date: "{}"
description: "Your very first post"
---

Welcome to your new blog. This post lives in `source/_posts/`; edit or
delete it and run `plume generate` to rebuild the site.

## Quick start

Create a new post:

```bash
$ plume new "My New Post"
```

Generate static files:

```bash
$ plume generate
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("source/_posts/hello-world.md"), sample_post)?;

    Ok(())
}

/// Run the init command with an existing Plume instance
pub fn run(plume: &Plume) -> Result<()> {
    init_site(&plume.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffolds_a_working_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("scaffolds/post.md").exists());
        assert!(dir.path().join("source/_posts/hello-world.md").exists());
        assert!(dir.path().join("source/images/avatar.png").exists());

        // A freshly initialized site generates without errors
        let plume = Plume::new(dir.path()).unwrap();
        crate::commands::generate::run(&plume).unwrap();
        assert!(plume.public_dir.join("index.html").exists());
    }
}
