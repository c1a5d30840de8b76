use anyhow::Result;
use blockdoc_editor::{EditorConfig, ViewMode, DEFAULT_CONFIG_NAME};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Page content height in pixels
    #[arg(long, default_value = "950")]
    pub page_height: f32,

    /// Height reserved for the title on the first page
    #[arg(long, default_value = "150")]
    pub title_height: f32,

    /// Start in continuous (single page) mode
    #[arg(long)]
    pub continuous: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = EditorConfig {
        page_content_height: args.page_height,
        title_height: args.title_height,
        view_mode: if args.continuous {
            ViewMode::Continuous
        } else {
            ViewMode::Paginated
        },
        ..EditorConfig::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Tune page sizes in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: blockdoc paginate <file>");

    Ok(())
}
