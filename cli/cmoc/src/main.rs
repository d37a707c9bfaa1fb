//! cmoc — compile SPIR-V into device binaries with the offline compiler.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::translate::TranslateOptions;

#[derive(Parser)]
#[command(
    name = "cmoc",
    version,
    about = "CM offline compiler backend: SPIR-V to device binary"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a SPIR-V module into a device binary
    Translate {
        /// Target platform (e.g., SKL, ICLLP, TGLLP)
        #[arg(long)]
        platform: String,
        /// Binary format passed to the compiler (e.g., cm, ze)
        #[arg(long, default_value = "cm")]
        binary_format: String,
        /// Input SPIR-V file
        #[arg(long)]
        input: PathBuf,
        /// Target features
        #[arg(long)]
        features: Option<String>,
        /// Backend option forwarded through -llvm-options (repeatable)
        #[arg(long = "llvm-option", allow_hyphen_values = true)]
        llvm_options: Vec<String>,
        /// Request a pass timing report from the compiler
        #[arg(long)]
        time_passes: bool,
        /// Kernel binary output path (default: <input>.gen)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Debug info output path (default: <input>.dbg)
        #[arg(long)]
        debug_info: Option<PathBuf>,
        /// Bridge configuration file (TOML); environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the compiler command line without running it
        #[arg(long)]
        dry_run: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported platforms
    Platforms {
        /// Output format (text, toml, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Check that the device compiler library can be loaded
    Doctor {
        /// Bridge configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("cmoc", level)
        .filter_module("cmoc_backend", level)
        .filter_module("cmoc_targets", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Translate {
            platform,
            binary_format,
            input,
            features,
            llvm_options,
            time_passes,
            output,
            debug_info,
            config,
            dry_run,
            json,
        } => {
            let config = commands::load_config(config.as_deref())?;
            commands::translate::run(
                &TranslateOptions {
                    platform,
                    binary_format,
                    input,
                    features: features.unwrap_or_default(),
                    llvm_options,
                    time_passes,
                    output,
                    debug_info,
                    dry_run,
                    json,
                },
                &config,
            )
        }
        Commands::Platforms { format } => commands::platforms::run(format.as_deref()),
        Commands::Doctor { config } => {
            let config = commands::load_config(config.as_deref())?;
            commands::doctor::run(&config)
        }
    }
}
