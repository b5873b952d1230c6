use super::{resolve_section, Context};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use folio_editor::ReportDocument;

#[derive(Debug, Args)]
pub struct SectionArgs {
    #[command(subcommand)]
    pub command: SectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SectionCommand {
    /// List sections in order
    List,

    /// Append a new section holding one empty layout
    Add {
        /// Section title (defaults to newSectionTitle from the config)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Remove a section from the list; its blocks stay in the file
    Delete { section: String },

    /// Lock or unlock a section against edits
    Lock { section: String },

    /// Move a section to sit before another
    Move {
        section: String,
        #[arg(long)]
        before: String,
    },

    /// Change a section's title
    Title { section: String, title: String },

    /// Discard every section and start over with one empty section
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

pub fn section(args: SectionArgs, ctx: &Context) -> Result<()> {
    let mut document = ctx.open()?;
    let message = run(args.command, &mut document, ctx)?;
    if document.is_dirty() {
        document.save()?;
    }
    if let Some(message) = message {
        println!("{} {}", "✓".green(), message);
    }
    Ok(())
}

fn run(command: SectionCommand, document: &mut ReportDocument, ctx: &Context) -> Result<Option<String>> {
    let message = match command {
        SectionCommand::List => {
            let store = document.store();
            for (position, section) in store.sections().iter().enumerate() {
                let blocks = store.get(&section.id).map_or(0, |f| f.block_count());
                let mut flags = Vec::new();
                if section.is_locked {
                    flags.push("locked");
                }
                if !section.is_deletable {
                    flags.push("permanent");
                }
                println!(
                    "{:>3}. {} {} {} block(s) {}",
                    position + 1,
                    store.title(&section.id).unwrap_or("(untitled)").bold(),
                    format!("({})", section.id).dimmed(),
                    blocks,
                    flags.join(", ").yellow()
                );
            }
            None
        }
        SectionCommand::Add { title } => {
            let title = title.unwrap_or_else(|| ctx.config.new_section_title.clone());
            let id = document.store_mut().add_section(&title);
            Some(format!("Added section {} ({})", title, id))
        }
        SectionCommand::Delete { section } => {
            let id = resolve_section(document.store(), &section)?;
            document.store_mut().delete_section(&id)?;
            Some(format!("Deleted section {}", id))
        }
        SectionCommand::Lock { section } => {
            let id = resolve_section(document.store(), &section)?;
            let locked = document.store_mut().toggle_lock(&id)?;
            Some(format!("{} section {}", if locked { "Locked" } else { "Unlocked" }, id))
        }
        SectionCommand::Move { section, before } => {
            let id = resolve_section(document.store(), &section)?;
            let target = resolve_section(document.store(), &before)?;
            if document.store_mut().move_section(&id, &target)? {
                Some(format!("Moved section {} before {}", id, target))
            } else {
                Some("Order unchanged".to_string())
            }
        }
        SectionCommand::Title { section, title } => {
            let id = resolve_section(document.store(), &section)?;
            document.store_mut().set_title(&id, &title)?;
            Some(format!("Renamed section {} to {}", id, title))
        }
        SectionCommand::Reset { yes } => {
            if !yes {
                println!("{} This discards every section. Re-run with --yes", "⚠️".yellow());
                return Ok(None);
            }
            let id = document.store_mut().reset(&ctx.config.new_section_title);
            Some(format!("Reset report, new section {}", id))
        }
    };
    Ok(message)
}
