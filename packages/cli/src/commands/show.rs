use super::{resolve_section, Context};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::DocumentStore;
use folio_model::visitor::{walk_block, walk_forest};
use folio_model::{Block, Forest, LayoutBlock, Visitor};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Only show this section (id, id prefix or 1-based position)
    pub section: Option<String>,

    /// Print block ids
    #[arg(short, long)]
    pub ids: bool,

    /// Print the raw JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let document = ctx.open()?;
    let store = document.store();

    let sections = match &args.section {
        Some(query) => vec![resolve_section(store, query)?],
        None => store.sections().iter().map(|s| s.id.clone()).collect(),
    };

    if args.json {
        match (&args.section, sections.first()) {
            (Some(_), Some(id)) => println!("{}", serde_json::to_string_pretty(&store.get(id))?),
            _ => println!("{}", document.to_json()?),
        }
        return Ok(());
    }

    for id in &sections {
        print!("{}", render_section(store, id, args.ids));
    }

    let orphans = store.orphaned_forests();
    if args.section.is_none() && !orphans.is_empty() {
        println!("{} {} deleted section(s) still stored", "ℹ".blue(), orphans.len());
    }
    Ok(())
}

fn render_section(store: &DocumentStore, id: &str, show_ids: bool) -> String {
    let title = store.title(id).unwrap_or("(untitled)");
    let locked = match store.section(id) {
        Some(section) if section.is_locked => " 🔒",
        _ => "",
    };
    let mut out = format!("{} {} {}{}\n", "■".cyan(), title.bold(), format!("({})", id).dimmed(), locked);

    match store.get(id) {
        Some(forest) if !forest.is_empty() => out.push_str(&render_tree(forest, show_ids)),
        _ => out.push_str("  (no blocks)\n"),
    }
    out.push('\n');
    out
}

/// Indented outline of a forest, one line per block and per layout column
pub fn render_tree(forest: &Forest, show_ids: bool) -> String {
    let mut printer = TreePrinter {
        out: String::new(),
        depth: 1,
        show_ids,
    };
    printer.visit_forest(forest);
    printer.out
}

struct TreePrinter {
    out: String,
    depth: usize,
    show_ids: bool,
}

impl TreePrinter {
    fn line(&mut self, text: &str) {
        self.out.push_str(&"  ".repeat(self.depth));
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Visitor for TreePrinter {
    fn visit_block(&mut self, block: &Block) {
        let mut text = summary(block);
        if self.show_ids {
            text = format!("{} {}", text, format!("[{}]", block.id()).dimmed());
        }
        self.line(&text);

        self.depth += 1;
        walk_block(self, block);
        self.depth -= 1;
    }

    fn visit_column(&mut self, layout: &LayoutBlock, column: usize, forest: &Forest) {
        let empty = if forest.is_empty() { " (empty)" } else { "" };
        self.line(&format!("column {}/{}{}", column + 1, layout.layout.column_count(), empty));

        self.depth += 1;
        walk_forest(self, forest);
        self.depth -= 1;
    }
}

fn summary(block: &Block) -> String {
    let kind = block.kind().as_str().yellow();
    match block {
        Block::Text(b) => format!("{} \"{}\"", kind, excerpt(&b.content)),
        Block::Subheader(b) => format!("{} \"{}\"", kind, excerpt(&b.content)),
        Block::ImageGrid(b) => {
            let uploaded = b.images.iter().filter(|img| img.src.is_some()).count();
            format!(
                "{} {} image(s), {} uploaded, {} per row",
                kind,
                b.images.len(),
                uploaded,
                b.grid_columns
            )
        }
        Block::Table(b) => format!("{} {}×{}", kind, b.row_count(), b.column_count()),
        Block::Layout(b) => format!("{} {}", kind, b.layout),
    }
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 40;
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > MAX || line.len() < text.len() {
        format!("{}…", line.chars().take(MAX).collect::<String>())
    } else {
        line.to_string()
    }
}
