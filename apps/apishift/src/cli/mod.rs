//! CLI command handling

use anyhow::{bail, Context};
use apishift_config::{logging, MigrationConfig};
use apishift_services::{FsTree, MigrationReport, MigrationRunner};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// The main CLI struct.
#[derive(Parser, Debug)]
#[command(name = "apishift")]
#[command(about = "Rewrite a project so it tracks a library's breaking API changes")]
#[command(version)]
pub struct Cli {
    /// Project root to migrate
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Rule-set file read when the project has none at the configured path
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Only touch files under this prefix (repeatable, replaces the configured roots)
    #[arg(long = "scope-root", value_name = "PREFIX")]
    pub scope_roots: Vec<String>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Configuration for the project, with command-line overrides applied.
    fn config(&self) -> anyhow::Result<MigrationConfig> {
        let mut config = MigrationConfig::load(&self.root)
            .with_context(|| format!("Failed to load configuration for {}", self.root.display()))?;
        if let Some(rules) = &self.rules {
            config.rule_set_file = Some(rules.clone());
        }
        if !self.scope_roots.is_empty() {
            config.scope_roots = self.scope_roots.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run one migration and print its report.
///
/// Fails (non-zero exit) only when the rule-set is invalid.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.root.is_dir() {
        bail!("Project root {} is not a directory", cli.root.display());
    }

    let config = cli.config()?;
    logging::initialize(&config.logging);
    debug!(root = %cli.root.display(), dry_run = cli.dry_run, "Starting API migration");

    let mut tree = if cli.dry_run {
        FsTree::dry_run(&cli.root)
    } else {
        FsTree::new(&cli.root)
    };
    let report = MigrationRunner::new(config).run(&mut tree);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, cli.dry_run);
    }

    if report.is_invalid() {
        bail!("{}", report.summary());
    }
    Ok(())
}

fn print_report(report: &MigrationReport, dry_run: bool) {
    let prefix = if dry_run { "[dry run] " } else { "" };
    for change in &report.changes {
        println!("{}{} ({}, {})", prefix, change.path, change.strategy, change.change_set);
    }
    for issue in &report.issues {
        println!("{}skipped {}: {}", prefix, issue.path, issue.reason);
    }
    println!("{}{}", prefix, report.summary());
}
