//! Tategaki CLI - Command-line interface for parsing and paginating Aozora Bunko texts

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::LayoutArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "tategaki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a text
    Info {
        /// Input file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lay a text out into pages
    Paginate {
        /// Input file path
        input: String,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Only print this page (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a text for markup errors
    Validate {
        /// Input file path
        input: String,

        /// Fail on recovered markup errors too
        #[arg(long)]
        strict: bool,
    },

    /// Paginate every text in a directory
    Batch {
        /// Input directory
        input_dir: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "tategaki_cli=debug,tategaki_core=debug"
    } else {
        "tategaki_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Paginate {
            input,
            layout,
            page,
            json,
        } => commands::paginate(&input, &layout, page, json),

        Commands::Validate { input, strict } => commands::validate(&input, strict),

        Commands::Batch {
            input_dir,
            output_dir,
            layout,
            jobs,
        } => commands::batch(&input_dir, &output_dir, &layout, jobs),
    }
}
