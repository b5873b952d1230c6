use super::Context;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::ReportDocument;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Title of the report's first section
    #[arg(short, long, default_value = "Your Section Title")]
    pub title: String,

    /// Force overwrite of an existing config and report
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(DEFAULT_CONFIG_NAME);

    if ctx.report.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), ctx.report.display().to_string().bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing folio report...".bright_blue().bold());

    if !config_path.exists() || args.force {
        let config = Config {
            report_path: ctx
                .report
                .strip_prefix(&ctx.cwd)
                .unwrap_or(ctx.report.as_path())
                .display()
                .to_string(),
            ..ctx.config.clone()
        };
        fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    if let Some(parent) = ctx.report.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut document = ReportDocument::new(&args.title);
    document.save_as(&ctx.report)?;
    println!("  {} Created {}", "✓".green(), ctx.report.display());

    println!();
    println!("{}", "✅ Report initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: folio block 1 add text");
    println!("  2. Run: folio show");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None).unwrap();

        init(InitArgs { title: "Findings".to_string(), force: false }, &ctx).unwrap();

        assert!(dir.path().join(DEFAULT_CONFIG_NAME).exists());
        let document = ctx.open().unwrap();
        assert_eq!(document.store().sections().len(), 1);
        let section = &document.store().sections()[0].id;
        assert_eq!(document.store().title(section), Some("Findings"));
    }

    #[test]
    fn test_init_keeps_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None).unwrap();
        init(InitArgs { title: "First".to_string(), force: false }, &ctx).unwrap();
        init(InitArgs { title: "Second".to_string(), force: false }, &ctx).unwrap();

        let document = ctx.open().unwrap();
        let section = &document.store().sections()[0].id;
        assert_eq!(document.store().title(section), Some("First"));
    }
}
