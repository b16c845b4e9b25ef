//! Create a new post or draft

use anyhow::Result;
use std::fs;

use crate::Plume;

/// Create a new post/draft from its scaffold
pub fn create_post(plume: &Plume, title: &str, layout: &str, path: Option<&str>) -> Result<()> {
    let now = chrono::Local::now();

    let target_dir = match layout {
        "draft" => plume.source_dir.join("_drafts"),
        _ => plume.source_dir.join("_posts"),
    };

    fs::create_dir_all(&target_dir)?;

    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        let post_name = &plume.config.new_post_name;
        let slug = slug::slugify(title);

        post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    let file_path = target_dir.join(&filename);

    // Load scaffold template
    let scaffold_path = plume
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", layout));
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        "---\ntitle: {{ title }}\ndate: {{ date }}\ndescription:\n---\n".to_string()
    };

    let content = scaffold_content
        .replace("{{ title }}", title)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(plume: &Plume, title: &str, layout: Option<&str>) -> Result<()> {
    let layout = layout.unwrap_or(&plume.config.default_layout);
    create_post(plume, title, layout, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_from_default_scaffold() {
        let dir = TempDir::new().unwrap();
        let plume = Plume::new(dir.path()).unwrap();

        create_post(&plume, "My New Post", "post", None).unwrap();

        let file = dir.path().join("source/_posts/my-new-post.md");
        assert!(file.exists());
        let content = fs::read_to_string(&file).unwrap();
        assert!(content.contains("title: My New Post"));
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let plume = Plume::new(dir.path()).unwrap();

        create_post(&plume, "Dup", "post", None).unwrap();
        assert!(create_post(&plume, "Dup", "post", None).is_err());
    }

    #[test]
    fn test_create_draft_goes_to_drafts_dir() {
        let dir = TempDir::new().unwrap();
        let plume = Plume::new(dir.path()).unwrap();

        create_post(&plume, "WIP", "draft", None).unwrap();
        assert!(dir.path().join("source/_drafts/wip.md").exists());
    }
}
