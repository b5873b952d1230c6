use super::Context;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::ReportFile;
use folio_model::visitor::walk_block;
use folio_model::{Block, Forest, TreeStats, Visitor};
use std::collections::HashMap;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Print per-section block counts
    #[arg(short, long)]
    pub stats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub section: String,
    pub message: String,
}

/// Inspects the file as written, before any normalization on load
pub fn check(args: CheckArgs, ctx: &Context) -> Result<()> {
    println!("🔍 {} {}", "Checking".green().bold(), ctx.report.display());

    let file: ReportFile = serde_json::from_str(&std::fs::read_to_string(&ctx.report)?)?;
    let issues = inspect(&file, args.stats);

    for issue in &issues {
        let label = match issue.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("  {} [{}] {}", label, issue.section, issue.message);
    }

    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
    println!();
    if errors > 0 {
        bail!("{} error(s) found", errors);
    }
    println!("✨ {} {} warning(s)", "Done".green().bold(), issues.len());
    Ok(())
}

pub fn inspect(file: &ReportFile, print_stats: bool) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut owners: HashMap<String, String> = HashMap::new();

    for section in &file.sections {
        let issue = |severity, message: String| Issue {
            severity,
            section: section.id.clone(),
            message,
        };

        let Some(value) = file.report_data.get(&section.id) else {
            issues.push(issue(Severity::Warning, "section has no blocks".to_string()));
            continue;
        };
        let forest: Forest = match serde_json::from_value(value.clone()) {
            Ok(forest) => forest,
            Err(err) => {
                issues.push(issue(Severity::Error, format!("unreadable blocks: {}", err)));
                continue;
            }
        };

        let mut inspector = Inspector::default();
        inspector.visit_forest(&forest);
        issues.extend(inspector.problems.into_iter().map(|(severity, message)| issue(severity, message)));

        for id in forest.duplicate_ids() {
            issues.push(issue(Severity::Error, format!("block id {} appears more than once", id)));
        }
        for id in forest.ids() {
            if let Some(other) = owners.insert(id.clone(), section.id.clone()) {
                if other != section.id {
                    issues.push(issue(Severity::Warning, format!("block id {} is also used in {}", id, other)));
                }
            }
        }

        if print_stats {
            let stats = TreeStats::of(&forest);
            println!(
                "  {} {} blocks (text {}, subheader {}, image_grid {}, table {}, layout {}), nesting {}",
                section.id.cyan(),
                stats.total(),
                stats.text,
                stats.subheader,
                stats.image_grid,
                stats.table,
                stats.layout,
                stats.max_depth
            );
        }
    }

    issues
}

#[derive(Default)]
struct Inspector {
    problems: Vec<(Severity, String)>,
}

impl Visitor for Inspector {
    fn visit_block(&mut self, block: &Block) {
        match block {
            Block::Layout(layout) if layout.children.len() != layout.layout.column_count() => {
                self.problems.push((
                    Severity::Error,
                    format!(
                        "layout {} is {} but has {} column(s)",
                        layout.id,
                        layout.layout,
                        layout.children.len()
                    ),
                ));
            }
            Block::Table(table) if !table.is_rectangular() => {
                self.problems.push((Severity::Warning, format!("table {} has rows of different widths", table.id)));
            }
            Block::ImageGrid(grid) if grid.images.is_empty() => {
                self.problems.push((Severity::Warning, format!("image grid {} has no image slots", grid.id)));
            }
            _ => {}
        }
        walk_block(self, block);
    }
}
