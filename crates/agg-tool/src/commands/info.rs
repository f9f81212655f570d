use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::AppConfig;
use crate::utils::human_size;
use agg_archive::AggFile;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;

pub struct InfoArchiveArgs {
    pub archive: Utf8PathBuf,
    pub show_entries: bool,
}

pub fn info_archive(args: InfoArchiveArgs, config: &AppConfig) -> Result<()> {
    let archive = AggFile::open_with_config(&args.archive, &config.archive)
        .map_err(|e| CliError::from_open(args.archive.clone(), e))?;

    let index = archive.index();
    println_pad!(
        "{} {}",
        "📦 Archive:".bright_blue().bold(),
        args.archive.as_str().bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "📏 Size:".bright_green(),
        human_size(index.file_size()).bright_white().bold()
    );
    println_pad!(
        "{} {}",
        "🗂️  Entries:".bright_yellow(),
        index.len().to_string().bright_white().bold()
    );
    println_pad!(
        "{} {}",
        "🧩 Overrides:".bright_magenta(),
        archive.overrides().len().to_string().bright_white().bold()
    );

    for name in archive.overrides().names() {
        if !archive.has_override(name) {
            println_pad!(
                "   {} {} {}",
                "•".bright_yellow(),
                name.bright_yellow(),
                "(no matching archive entry, ignored)".dimmed()
            );
        }
    }

    if !args.show_entries {
        return Ok(());
    }

    println_pad!("\n{}", "📄 Entries:".bright_magenta().bold());
    for name in archive.names() {
        let Some(entry) = archive.entry(name) else {
            continue;
        };
        let marker = if archive.has_override(name) {
            "override".bright_green().to_string()
        } else if !entry.is_readable() {
            "empty".dimmed().to_string()
        } else {
            String::new()
        };
        println_pad!(
            "   {} {:<15} {:>10} {} {}",
            "•".bright_cyan(),
            name.bright_cyan(),
            entry.size,
            format!("@ {:#010x}", entry.offset).dimmed(),
            marker
        );
    }

    Ok(())
}
