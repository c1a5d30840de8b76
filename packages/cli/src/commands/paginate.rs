use anyhow::{Context, Result};
use blockdoc_editor::{
    encode_clipboard, EditSession, EditorConfig, FixedMetrics, LayoutRegistry, TextMeasure, ViewMode,
};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Render passes before giving up on reaching a stable layout
const MAX_PASSES: usize = 1_000;

/// Longest content preview printed per block
const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Args)]
pub struct PaginateArgs {
    /// Input file: transport JSON or plain text (one block per line)
    pub input: PathBuf,

    /// Text column width in pixels
    #[arg(short, long, default_value = "640")]
    pub width: f32,

    /// Advance of one char as a fraction of the font size
    #[arg(long, default_value = "0.5")]
    pub char_width: f32,

    /// Lay the document out as one continuous page
    #[arg(long)]
    pub continuous: bool,

    /// Directory holding the config file (defaults to current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the split document in transport format instead of pages
    #[arg(long)]
    pub json: bool,
}

pub fn paginate(args: PaginateArgs, cwd: &Path) -> Result<()> {
    let config_dir = args.config.as_deref().unwrap_or(cwd);
    let mut config = EditorConfig::load(config_dir)?;
    if args.continuous {
        config.view_mode = ViewMode::Continuous;
    }

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;

    let metrics = FixedMetrics::new(args.char_width);
    let mut session = load_session(config, &text);
    let passes = settle(&mut session, &metrics, args.width);

    if args.json {
        println!("{}", encode_clipboard(session.document().blocks()));
        return Ok(());
    }

    print_pages(&session, passes);
    Ok(())
}

/// Fresh session holding the pasted file content
pub fn load_session(config: EditorConfig, text: &str) -> EditSession {
    let mut session = EditSession::new(config);
    let first = session.document().first().id.clone();
    session.focus_block(&first);
    session.paste(text);
    session.blur();
    session
}

/// One render pass: measure every block, report heights, lay out a column
pub fn render(session: &mut EditSession, metrics: &FixedMetrics, width: f32) -> LayoutRegistry {
    let measured: Vec<(String, f32)> = session
        .document()
        .blocks()
        .iter()
        .map(|block| (block.id.clone(), metrics.measure_block_text(block, &block.content, width)))
        .collect();

    session.report_heights(measured.iter().map(|(id, h)| (id.as_str(), *h)));
    LayoutRegistry::stacked(measured.iter().map(|(id, h)| (id.as_str(), *h)), 0.0, width)
}

/// Render and run post-effects until a pass changes nothing.
/// Returns the number of passes taken.
pub fn settle(session: &mut EditSession, metrics: &FixedMetrics, width: f32) -> usize {
    for pass in 1..=MAX_PASSES {
        let before = session.document().clone();
        let layout = render(session, metrics, width);
        session.run_post_effects(&layout, metrics);

        let stable = *session.document() == before && session.pending_effects().is_empty();
        debug!(pass, blocks = session.document().len(), stable, "Render pass");
        if stable {
            return pass;
        }
    }

    warn!(passes = MAX_PASSES, "Layout did not settle");
    MAX_PASSES
}

fn print_pages(session: &EditSession, passes: usize) {
    let doc = session.document();
    let limits = session.config().page_limits();
    let pages = session.pages();

    println!(
        "{} {} blocks on {} page(s) after {} pass(es)",
        "📄".bright_blue(),
        doc.len(),
        pages.len(),
        passes
    );

    for page in &pages {
        println!();
        let limit = limits.limit_for(page.index);
        let budget = if limit.is_finite() {
            format!("{:.0}/{:.0}px", page.height, limit)
        } else {
            format!("{:.0}px", page.height)
        };
        println!("{} {}", format!("Page {}", page.index + 1).bold(), budget.dimmed());

        for block in page.blocks(doc) {
            let preview: String = block.content.chars().take(PREVIEW_CHARS).collect();
            let ellipsis = if block.char_len() > PREVIEW_CHARS { "…" } else { "" };
            let tag = format!("[{}]", block.kind.tag());
            let tag = if block.kind.is_heading() {
                tag.bright_yellow()
            } else {
                tag.dimmed()
            };

            println!(
                "  {} {}{} {}",
                tag,
                preview,
                ellipsis,
                format!("{:.0}px", session.heights().get(&block.id)).dimmed()
            );
        }
    }
}
