//! `encore check-config`

use std::path::Path;

use anyhow::Result;
use encore_config::load_and_validate;

pub async fn run(path: &Path) -> Result<()> {
    println!("\nChecking {}\n", path.display());

    let (config, report) = load_and_validate(path).await?;

    println!(
        "  telegram token:  {}",
        if config.telegram.bot_token.is_some() { "set" } else { "missing" }
    );
    println!("  seek endpoint:   {}", config.transport.seek_endpoint);
    println!("  ingress address: {}", config.transport.ingress_addr);
    println!("  thumbnail cache: {}", config.thumbnails.cache_dir);
    println!("  channel links:   {}", config.channel_play.links.len());
    println!();

    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for err in &report.errors {
        println!("  🔴 {}: {}", err.path, err.message);
    }

    println!();
    report.ensure_valid()?;
    println!("✅ Configuration is valid.");
    Ok(())
}
