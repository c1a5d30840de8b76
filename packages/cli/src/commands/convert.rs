use anyhow::{anyhow, Context, Result};
use blockdoc_editor::{decode_clipboard, PasteSource};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Plain-text (or transport JSON) input file
    pub input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Turn a text file into the clipboard transport format
pub fn convert(args: ConvertArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;

    let payload = decode_clipboard(&text).ok_or_else(|| anyhow!("{} has no content", args.input.display()))?;
    if payload.source == PasteSource::Structured {
        eprintln!("{} input is already in transport format", "⚠️".yellow());
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&payload.blocks)?
    } else {
        serde_json::to_string(&payload.blocks)?
    };

    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            println!(
                "  {} {} blocks → {}",
                "✓".green(),
                payload.blocks.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
