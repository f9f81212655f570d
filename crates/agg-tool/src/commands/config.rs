use crate::utils::config::{self, AppConfig};
use camino::Utf8Path;
use colored::Colorize;
use miette::Result;

pub fn show_config(cfg: &AppConfig, path: Option<&Utf8Path>) -> Result<()> {
    let config_path = path
        .map(|p| p.to_string())
        .or_else(|| config::default_config_path().map(|p| p.to_string()))
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    if cfg.archives.is_empty() {
        println!(
            "  {} {}",
            "archives:".bright_white(),
            "(not set)".bright_yellow()
        );
    } else {
        println!("  {}", "archives:".bright_white());
        for archive in &cfg.archives {
            let status = if archive.as_std_path().is_file() {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("    {} {}", archive, status);
        }
    }

    let options = &cfg.archive;
    println!(
        "  {} {}",
        "archive_extension:".bright_white(),
        options.archive_extension
    );
    println!("  {} {}", "name_width:".bright_white(), options.name_width);
    println!(
        "  {} {}",
        "collect_overrides:".bright_white(),
        options.collect_overrides
    );
    println!(
        "  {} {}",
        "image_extensions:".bright_white(),
        options.image_extensions.join(", ")
    );
    println!();
    Ok(())
}
