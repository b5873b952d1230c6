use super::{resolve_section, Context};
use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use folio_editor::ReportDocument;
use folio_model::{Block, BlockId, BlockKind, BlockPatch, ColumnLayout, Mutation, Outcome};

#[derive(Debug, Args)]
pub struct BlockArgs {
    /// Section holding the block (id, id prefix or 1-based position)
    pub section: String,

    #[command(subcommand)]
    pub command: BlockCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlockCommand {
    /// Add a fresh block at the end of the section, or of a layout column
    Add {
        kind: BlockKind,
        /// Layout block to add into
        #[arg(long)]
        layout: Option<String>,
        /// Column of that layout (0-based)
        #[arg(long, requires = "layout")]
        column: Option<usize>,
    },

    /// Replace the content of a text or subheader block
    Text { id: String, content: String },

    /// Delete a block and everything inside it
    Delete { id: String },

    /// Move a block to sit before another
    Move {
        id: String,
        #[arg(long)]
        before: String,
    },

    /// Move a block to the end of the section
    MoveToEnd { id: String },

    /// Move a block to the end of a layout column (which may be empty)
    MoveInto {
        id: String,
        layout: String,
        /// Column of that layout (0-based)
        #[arg(long)]
        column: Option<usize>,
    },

    /// Change a layout block's column count
    Layout {
        id: String,
        layout: ColumnLayout,
        /// Allow discarding blocks in removed columns
        #[arg(long)]
        force: bool,
    },

    /// Edit a table block
    Table {
        id: String,
        #[command(subcommand)]
        action: TableAction,
    },

    /// Edit an image grid block
    Image {
        id: String,
        #[command(subcommand)]
        action: ImageAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TableAction {
    AddRow,
    AddColumn,
    RemoveRow { index: usize },
    RemoveColumn { index: usize },
    Cell { row: usize, column: usize, value: String },
}

#[derive(Debug, Subcommand)]
pub enum ImageAction {
    Add,
    Remove { image: String },
    /// Set (or with no value, clear) an image's source
    Src { image: String, src: Option<String> },
    Caption { image: String, caption: String },
    /// Images per row
    Columns { count: u32 },
}

pub fn block(args: BlockArgs, ctx: &Context) -> Result<()> {
    let mut document = ctx.open()?;
    let section = resolve_section(document.store(), &args.section)?;

    let mutation = mutation_for(args.command, &document, &section)?;
    let applied = document.apply(&section, &mutation)?;

    match &applied.outcome {
        Outcome::Applied => println!("{} {}", "✓".green(), mutation.name()),
        Outcome::Fallback(reason) => println!("{} {} ({})", "✓".yellow(), mutation.name(), reason),
        Outcome::Noop(reason) => println!("{} Nothing changed: {}", "ℹ".blue(), reason),
    }
    if document.is_dirty() {
        document.save()?;
    }
    Ok(())
}

fn find(document: &ReportDocument, section: &str, id: &str) -> Result<Block> {
    document
        .store()
        .get(section)
        .and_then(|forest| forest.find(id))
        .cloned()
        .ok_or_else(|| anyhow!("No block {} in section {}", id, section))
}

fn update(id: &str, patch: Option<BlockPatch>, refused: &str) -> Result<Mutation> {
    match patch {
        Some(patch) => Ok(Mutation::UpdateBlock { id: BlockId::from(id), patch }),
        None => bail!("{}", refused),
    }
}

fn mutation_for(command: BlockCommand, document: &ReportDocument, section: &str) -> Result<Mutation> {
    let mutation = match command {
        BlockCommand::Add { kind, layout, column } => {
            let block = Block::new(kind);
            println!("  new {} block {}", kind, block.id().to_string().dimmed());
            match layout {
                Some(layout_id) => Mutation::InsertIntoColumn {
                    layout_id: layout_id.into(),
                    column,
                    block,
                },
                None => Mutation::InsertTopLevel { block },
            }
        }
        BlockCommand::Text { id, content } => {
            let kind = find(document, section, &id)?.kind();
            let patch = BlockPatch::content(kind, content);
            update(&id, patch, &format!("{} blocks have no text content", kind))?
        }
        BlockCommand::Delete { id } => Mutation::DeleteBlock { id: id.into() },
        BlockCommand::Move { id, before } => Mutation::MoveBefore {
            source_id: id.into(),
            target_id: before.into(),
        },
        BlockCommand::MoveToEnd { id } => Mutation::MoveToEnd { source_id: id.into() },
        BlockCommand::MoveInto { id, layout, column } => Mutation::MoveIntoColumn {
            source_id: id.into(),
            layout_id: layout.into(),
            column,
        },
        BlockCommand::Layout { id, layout, force } => {
            let block = find(document, section, &id)?;
            let current = block.as_layout().ok_or_else(|| anyhow!("{} is not a layout block", id))?;
            let dropped = current.dropped_by(layout);
            if !dropped.is_empty() && !force {
                bail!(
                    "Switching to {} would discard {} block(s); re-run with --force",
                    layout,
                    dropped.len()
                );
            }
            update(&id, Some(current.set_layout(layout)), "")?
        }
        BlockCommand::Table { id, action } => {
            let block = find(document, section, &id)?;
            let Block::Table(table) = &block else {
                bail!("{} is not a table block", id);
            };
            let patch = match action {
                TableAction::AddRow => Some(table.add_row()),
                TableAction::AddColumn => Some(table.add_column()),
                TableAction::RemoveRow { index } => table.remove_row(index),
                TableAction::RemoveColumn { index } => table.remove_column(index),
                TableAction::Cell { row, column, value } => table.set_cell(row, column, value),
            };
            update(&id, patch, "Table edit refused (out of range, or the last row/column)")?
        }
        BlockCommand::Image { id, action } => {
            let block = find(document, section, &id)?;
            let Block::ImageGrid(grid) = &block else {
                bail!("{} is not an image grid block", id);
            };
            let patch = match action {
                ImageAction::Add => Some(grid.add_image()),
                ImageAction::Remove { image } => grid.remove_image(&image),
                ImageAction::Src { image, src } => grid.set_image_src(&image, src),
                ImageAction::Caption { image, caption } => grid.set_caption(&image, caption),
                ImageAction::Columns { count } => Some(grid.set_grid_columns(count)),
            };
            update(&id, patch, "Image edit refused (unknown image, or the last image)")?
        }
    };
    Ok(mutation)
}
