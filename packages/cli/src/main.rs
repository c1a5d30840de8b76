mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{convert, init, paginate, ConvertArgs, InitArgs, PaginateArgs};
use tracing::Level;

/// Blockdoc CLI - paginate block documents from the command line
#[derive(Parser, Debug)]
#[command(name = "blockdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine decisions (mutations, splits, config)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blockdoc.config.json with default settings
    Init(InitArgs),

    /// Split a document into pages using fixed-width text metrics
    Paginate(PaginateArgs),

    /// Convert a plain-text file to the clipboard transport format
    Convert(ConvertArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Paginate(args) => paginate(args, &cwd),
        Command::Convert(args) => convert(args),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
