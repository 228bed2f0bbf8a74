//! XSLT tester CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "xslt-tester")]
#[command(version)]
#[command(about = "Cursor-to-XPath resolution and formatting for XML documents", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the XPath of the node at a cursor position
    Xpath {
        /// XML file to inspect
        file: PathBuf,

        /// Cursor line (1-based)
        #[arg(short, long)]
        line: usize,

        /// Cursor column (0-based, in characters)
        #[arg(short, long, default_value_t = 0)]
        column: usize,

        /// Print a JSON object instead of the bare path
        #[arg(long)]
        json: bool,
    },

    /// Pretty-print an XML file
    Format {
        /// XML file to format
        file: PathBuf,

        /// Rewrite the file instead of printing to stdout
        #[arg(short, long)]
        in_place: bool,
    },

    /// Replay cursor movements ("millis line column" per line on stdin)
    /// and print each debounced resolution
    Trace {
        /// XML file the cursor moves in
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xslt_tester=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Xpath {
            file,
            line,
            column,
            json,
        } => commands::xpath::execute(
            commands::xpath::XpathArgs {
                file,
                line,
                column,
                json,
            },
            &config,
        ),
        Commands::Format { file, in_place } => commands::format::execute(
            commands::format::FormatArgs { file, in_place },
            &config,
        ),
        Commands::Trace { file } => {
            commands::trace::execute(commands::trace::TraceArgs { file }, &config)
        }
    }
}
