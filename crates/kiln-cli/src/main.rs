//! Kiln command-line inspector
//!
//! Runs the naming engine and the declaration lowering pass over a
//! declaration set exported by the front end as JSON, and prints what they
//! produce.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Inspect script names and lowered declarations", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./kiln.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the script semantics of every type and member
    Names {
        /// Declaration set (JSON)
        input: PathBuf,
        /// Minimize non-public names
        #[arg(short, long)]
        minimize: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Lower declarations to class outlines (bodies are not compiled)
    Lower {
        /// Declarations and compilation units (JSON)
        input: PathBuf,
        /// Minimize non-public names
        #[arg(short, long)]
        minimize: bool,
        /// Skip the unsupported-construct pre-scan
        #[arg(long)]
        allow_unsupported: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Logging is off unless `KILN_LOG` is set; it always goes to stderr
fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("KILN_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let color = output::resolve_color_choice(cli.color.as_deref());

    let clean = match cli.command {
        Commands::Names {
            input,
            minimize,
            format,
        } => {
            let mut options = commands::load_options(cli.config.as_deref())?;
            options.minimize_names |= minimize;
            commands::names::execute(&input, options, format, color)?
        }

        Commands::Lower {
            input,
            minimize,
            allow_unsupported,
            format,
        } => {
            let mut options = commands::load_options(cli.config.as_deref())?;
            options.minimize_names |= minimize;
            options.allow_unsupported_constructs |= allow_unsupported;
            commands::lower::execute(&input, options, format, color)?
        }
    };

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}
