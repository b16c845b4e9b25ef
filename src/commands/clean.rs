//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Plume;

/// Clean the public directory
pub fn run(plume: &Plume) -> Result<()> {
    if plume.public_dir.exists() {
        fs::remove_dir_all(&plume.public_dir)?;
        tracing::info!("Deleted: {:?}", plume.public_dir);
    }

    Ok(())
}
