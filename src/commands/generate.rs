//! Generate static files

use anyhow::Result;

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Plume;

/// Generate the static site
pub fn run(plume: &Plume) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(plume);
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(plume)?;
    generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
