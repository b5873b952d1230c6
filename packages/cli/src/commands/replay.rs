use super::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{EditSession, Intent};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON array of intents, e.g. [{"intent": "addBlock", "section": "...", "kind": "text"}]
    pub intents: PathBuf,

    /// Apply in memory and report, without writing the report
    #[arg(long)]
    pub dry_run: bool,
}

pub fn replay(args: ReplayArgs, ctx: &Context) -> Result<()> {
    let content = std::fs::read_to_string(&args.intents)
        .with_context(|| format!("Cannot read {}", args.intents.display()))?;
    let intents: Vec<Intent> = serde_json::from_str(&content)?;

    let mut session = EditSession::new("cli", ctx.open()?);
    let count = intents.len();
    let changes = session.replay(intents)?;

    for change in &changes {
        println!(
            "  {} v{} {} ({} blocks)",
            "✓".green(),
            change.version,
            change.section_id,
            change.forest.block_count()
        );
    }
    println!("{} intent(s), {} change(s)", count, changes.len());

    if session.drag_state().is_dragging() {
        println!("{} replay ended mid-drag; the gesture was dropped", "⚠️".yellow());
    }

    if args.dry_run {
        println!("{}", "Dry run: report not written".dimmed());
    } else if session.document.is_dirty() {
        session.document.save()?;
    }
    Ok(())
}
