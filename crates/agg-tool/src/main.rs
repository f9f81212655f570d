use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    extract_asset, icn_info, info_archive, show_config, spawn_icn, ExtractAssetArgs, IcnInfoArgs,
    InfoArchiveArgs, SpawnIcnArgs,
};
use miette::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::utf8_path;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a config.toml (defaults to the one next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show information about an archive and its overrides
    Info {
        /// The path to the archive
        #[arg(short, long)]
        archive: PathBuf,

        /// List every entry with its size and offset
        #[arg(short, long)]
        entries: bool,
    },
    /// Extract one asset, resolving overrides and archive priority
    Extract {
        /// Archives to search, highest priority first (defaults to config)
        #[arg(short, long)]
        archive: Vec<PathBuf>,

        /// The asset name, e.g. ADVBTNS.ICN
        #[arg(short, long)]
        name: String,

        /// The file to write the asset to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a sprite sheet from a folder of images
    SpawnIcn {
        /// The folder holding the images
        #[arg(short, long)]
        dir: PathBuf,

        /// The file to write the sprite sheet to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the slots of a sprite sheet file
    IcnInfo {
        /// The path to the sprite sheet
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show the effective configuration
    Config,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_tracing(args.verbose);

    let config_path = args.config.map(utf8_path).transpose()?;
    let config = utils::config::load_config(config_path.as_deref())?;

    match args.command {
        Commands::Info { archive, entries } => info_archive(
            InfoArchiveArgs {
                archive: utf8_path(archive)?,
                show_entries: entries,
            },
            &config,
        ),
        Commands::Extract {
            archive,
            name,
            output,
        } => extract_asset(
            ExtractAssetArgs {
                archives: archive
                    .into_iter()
                    .map(utf8_path)
                    .collect::<Result<Vec<_>>>()?,
                name,
                output: output.map(utf8_path).transpose()?,
            },
            &config,
        ),
        Commands::SpawnIcn { dir, output } => spawn_icn(
            SpawnIcnArgs {
                dir: utf8_path(dir)?,
                output: utf8_path(output)?,
            },
            &config,
        ),
        Commands::IcnInfo { file } => icn_info(IcnInfoArgs {
            file: utf8_path(file)?,
        }),
        Commands::Config => show_config(&config, config_path.as_deref()),
    }
}
