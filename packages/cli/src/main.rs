mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    block, check, init, replay, save, section, show, BlockArgs, CheckArgs, Context, InitArgs, ReplayArgs, SaveArgs,
    SectionArgs, ShowArgs,
};
use std::path::PathBuf;

/// folio - edit block-structured reports from the terminal
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Report file to operate on (defaults to reportPath from folio.config.json)
    #[arg(short, long, global = true)]
    report: Option<PathBuf>,

    /// Log mutation outcomes (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create folio.config.json and an empty report
    Init(InitArgs),

    /// Print the block tree of every section
    Show(ShowArgs),

    /// Verify tree invariants of a report
    Check(CheckArgs),

    /// Add, delete, lock, reorder or retitle sections
    Section(SectionArgs),

    /// Add, edit, delete or move blocks
    Block(BlockArgs),

    /// Dispatch a JSON file of UI intents against the report
    Replay(ReplayArgs),

    /// Snapshot the report into the recent reports list
    Save(SaveArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let ctx = Context::new(cwd, cli.report)?;

    match cli.command {
        Command::Init(args) => init(args, &ctx),
        Command::Show(args) => show(args, &ctx),
        Command::Check(args) => check(args, &ctx),
        Command::Section(args) => section(args, &ctx),
        Command::Block(args) => block(args, &ctx),
        Command::Replay(args) => replay(args, &ctx),
        Command::Save(args) => save(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
