use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::AppConfig;
use agg_archive::{spawn_icn_from_dir, RasterDecoder};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

pub struct SpawnIcnArgs {
    pub dir: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

pub fn spawn_icn(args: SpawnIcnArgs, config: &AppConfig) -> Result<()> {
    if !args.dir.as_std_path().is_dir() {
        return Err(CliError::FileNotFound { path: args.dir }.into());
    }

    println_pad!(
        "{} {}",
        "🖼️  Building sprite sheet from:".bright_blue().bold(),
        args.dir.as_str().bright_cyan().bold()
    );

    let sheet =
        spawn_icn_from_dir(&args.dir, &config.archive, &RasterDecoder).map_err(CliError::from)?;
    if sheet.is_empty() {
        return Err(CliError::NoImages { dir: args.dir }.into());
    }

    std::fs::write(&args.output, &sheet).into_diagnostic()?;
    println_pad!(
        "{} {}",
        "✅ Wrote".bright_green().bold(),
        format!("{} ({} bytes)", args.output, sheet.len()).bright_white()
    );
    Ok(())
}
