use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::AppConfig;
use agg_archive::{AggChain, ResolveEvent};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

pub struct ExtractAssetArgs {
    pub archives: Vec<Utf8PathBuf>,
    pub name: String,
    pub output: Option<Utf8PathBuf>,
}

/// Default output path: the asset name in the current directory.
fn default_output(name: &str) -> Utf8PathBuf {
    Utf8Path::new(name)
        .file_name()
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from("asset.bin"))
}

pub fn extract_asset(args: ExtractAssetArgs, config: &AppConfig) -> Result<()> {
    let archives = config.resolve_archives(args.archives)?;
    let mut chain = AggChain::open(&archives, &config.archive)
        .map_err(|e| CliError::from_open(Utf8PathBuf::new(), e))?
        .with_events(|event| match event {
            ResolveEvent::OverrideUsed { name, size } => {
                tracing::info!("Using the external version of {} ({} bytes)", name, size)
            }
            ResolveEvent::ArchiveRead { name, offset, size } => {
                tracing::debug!("Read {} from archive at {:#x} ({} bytes)", name, offset, size)
            }
        });

    let data = chain.read(&args.name).map_err(CliError::from)?;
    if data.is_empty() {
        return Err(CliError::AssetNotFound { name: args.name }.into());
    }

    let output = args.output.unwrap_or_else(|| default_output(&args.name));
    if let Some(parent) = output.parent() {
        if !parent.as_str().is_empty() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    std::fs::write(&output, &data).into_diagnostic()?;

    println_pad!(
        "{} {} {}",
        "✅ Extracted".bright_green().bold(),
        args.name.bright_cyan().bold(),
        format!("({} bytes) to {}", data.len(), output).bright_white()
    );
    Ok(())
}
