//! CLI frontend for the Iradeh campaign tools.

mod commands;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::menu::MenuArgs;
use commands::scale::ScaleArgs;
use commands::sketch::SketchArgs;

#[derive(Parser)]
#[command(
    name = "ict",
    about = "Iradeh campaign tools — monster scaling and sketch conversion",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v for progress, -vv for per-file detail)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rescale a monster's stats to another challenge rating
    Scale(ScaleArgs),

    /// Print the challenge-rating reference table
    Table {
        /// Custom reference table (JSON array of rows)
        #[arg(long)]
        table: Option<std::path::PathBuf>,
    },

    /// Convert sketches into transparent PNGs
    Sketch(SketchArgs),

    /// Interactive menu
    Menu(MenuArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Scale(args) => commands::scale::run(&args),
        Commands::Table { table } => commands::table::run(table.as_deref()),
        Commands::Sketch(args) => commands::sketch::run(&args),
        Commands::Menu(args) => commands::menu::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
