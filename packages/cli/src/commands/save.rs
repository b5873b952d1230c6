use super::Context;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{RecentReports, ReportDocument};

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Snapshot name (defaults to the report's file name)
    pub name: Option<String>,

    /// List saved snapshots instead of saving
    #[arg(short, long)]
    pub list: bool,

    /// Overwrite the report with the newest snapshot of this name
    #[arg(long, conflicts_with = "list")]
    pub restore: Option<String>,

    /// Remove a snapshot by id, or the newest one with this name
    #[arg(long, conflicts_with_all = ["list", "restore"])]
    pub delete: Option<String>,
}

pub fn save(args: SaveArgs, ctx: &Context) -> Result<()> {
    let recent_path = ctx.config.recent_path(&ctx.cwd);
    let mut recent = RecentReports::load(&recent_path, ctx.config.recent_limit)?;

    if args.list {
        if recent.is_empty() {
            println!("No saved reports");
        }
        for entry in recent.entries() {
            println!("  {} {} {}", entry.id.to_string().dimmed(), entry.timestamp.dimmed(), entry.name.bold());
        }
        return Ok(());
    }

    if let Some(name) = args.restore {
        let entry = recent.find(&name).ok_or_else(|| anyhow!("No saved report named {}", name))?;
        let mut document = ReportDocument::from_store(entry.data.clone().into_store()?);
        document.save_as(&ctx.report)?;
        println!("{} Restored {} from {}", "✓".green(), ctx.report.display(), entry.timestamp);
        return Ok(());
    }

    if let Some(key) = args.delete {
        let removed = key
            .parse::<i64>()
            .ok()
            .and_then(|id| recent.remove(id))
            .or_else(|| recent.remove_named(&key))
            .ok_or_else(|| anyhow!("No saved report {}", key))?;
        recent.save(&recent_path)?;
        println!("{} Deleted {} ({} kept)", "✓".green(), removed.name, recent.len());
        return Ok(());
    }

    let document = ctx.open()?;
    let name = args.name.unwrap_or_else(|| {
        ctx.report
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string())
    });
    recent.record(name.clone(), document.to_file()?);

    if let Some(parent) = recent_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    recent.save(&recent_path)?;
    println!("{} Saved {} ({} kept)", "✓".green(), name, recent.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::INITIAL_SECTION_ID;
    use folio_model::{Block, Mutation};

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None).unwrap();
        let mut document = ReportDocument::new("Title");
        document.save_as(&ctx.report).unwrap();

        save(SaveArgs { name: None, list: false, restore: None, delete: None }, &ctx).unwrap();
        let recent = RecentReports::load(ctx.config.recent_path(&ctx.cwd), 10).unwrap();
        assert_eq!(recent.entries()[0].name, "report");

        document
            .apply(INITIAL_SECTION_ID, &Mutation::InsertTopLevel { block: Block::text() })
            .unwrap();
        document.save().unwrap();

        save(SaveArgs { name: None, list: false, restore: Some("report".to_string()), delete: None }, &ctx).unwrap();
        assert_eq!(ctx.open().unwrap().store().get(INITIAL_SECTION_ID).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_by_name_and_id() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None).unwrap();
        ReportDocument::new("Title").save_as(&ctx.report).unwrap();
        let snapshot = |name: &str| SaveArgs { name: Some(name.to_string()), list: false, restore: None, delete: None };
        let delete = |key: String| SaveArgs { name: None, list: false, restore: None, delete: Some(key) };
        let recent_path = ctx.config.recent_path(&ctx.cwd);

        save(snapshot("draft"), &ctx).unwrap();
        save(snapshot("final"), &ctx).unwrap();

        save(delete("draft".to_string()), &ctx).unwrap();
        let recent = RecentReports::load(&recent_path, 10).unwrap();
        let names: Vec<&str> = recent.entries().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["final"]);

        save(delete(recent.entries()[0].id.to_string()), &ctx).unwrap();
        assert!(RecentReports::load(&recent_path, 10).unwrap().is_empty());

        assert!(save(delete("missing".to_string()), &ctx).is_err());
    }
}
