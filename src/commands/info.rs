// src/commands/info.rs

//! Info command - show exported package metadata

use anyhow::{Context, Result};
use librw_recipe::PackageMetadata;
use std::path::Path;

/// Print the metadata of a built package
pub fn cmd_info(package_dir: &str) -> Result<()> {
    let root = Path::new(package_dir);
    let metadata = PackageMetadata::read_from(root)
        .with_context(|| format!("Failed to read package metadata from {}", root.display()))?;

    println!("Package: {}", root.display());
    println!(
        "Platform: {}",
        metadata.platform_identifier().unwrap_or("unknown")
    );

    println!("Include directories:");
    for dir in metadata.include_paths() {
        println!("  {}", dir.display());
    }

    println!("Libraries: {}", metadata.libs.join(", "));

    if !metadata.requires.is_empty() {
        println!("Requires:");
        for req in &metadata.requires {
            println!("  {}", req);
        }
    }

    for (key, value) in &metadata.user_info {
        println!("  {} = {}", key, value);
    }

    Ok(())
}
