//! Command-line interface for rulesort.
//!
//! This module handles:
//! - Argument parsing
//! - Resolving configuration, rule record and target directory
//! - Sorting runs (real and dry)
//! - Rule management (add, list, remove)

use crate::category::CategoryTable;
use crate::classifier::RuleSet;
use crate::config::SorterConfig;
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use crate::rule::{Rule, RuleType};
use crate::store::RuleStore;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rulesort")]
#[command(about = "Sort a downloads folder into category subfolders using your own rules")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: .rulesortrc.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule record to use instead of the configured one
    #[arg(long, global = true)]
    pub rules_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move every file in the target directory into its category folder
    Organize {
        /// Directory to sort (default: the configured or platform download dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Show what would be moved without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the category each file name would be sorted into
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Manage sorting rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Show the built-in extension categories
    Categories,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List rules in the order they are applied
    List,

    /// Append a rule (applied after existing ones)
    Add {
        /// How the pattern is matched
        #[arg(short = 't', long = "type", value_enum)]
        rule_type: RuleType,

        /// Extension without the dot, a name fragment, or a regular expression
        #[arg(short, long)]
        pattern: String,

        /// Destination folder name
        #[arg(short, long)]
        folder: String,
    },

    /// Remove the rule at a 1-based position (see `rules list`)
    Remove {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
}

/// Runs a parsed command line.
///
/// Returns a printable message on failure.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = SorterConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let rules_file = cli.rules_file.clone().unwrap_or_else(|| config.rules_file());
    let store = RuleStore::new(rules_file);
    let table = CategoryTable::builtin();

    match cli.command {
        Command::Organize { dir, dry_run } => {
            let dir = match dir {
                Some(dir) => dir,
                None => config.target_dir().map_err(|e| e.to_string())?,
            };
            organize(&config, &store, &table, &dir, dry_run)
        }
        Command::Classify { names } => classify_names(&store, &table, &names),
        Command::Rules { action } => run_rules_action(&store, action),
        Command::Categories => {
            OutputFormatter::category_table(&table);
            Ok(())
        }
    }
}

/// Sorts `dir`, printing progress and a summary.
fn organize(
    config: &SorterConfig,
    store: &RuleStore,
    table: &CategoryTable,
    dir: &Path,
    dry_run: bool,
) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()));
    }

    let filter = config
        .entry_filter()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let rules = store
        .load()
        .map_err(|e| format!("Error loading rules: {}", e))?;
    let organizer = FileOrganizer::new(&rules, table, &filter);

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", dir.display()));
        let report = organizer
            .organize(dir, true, |_| {})
            .map_err(|e| e.to_string())?;
        for placement in &report.placements {
            println!(" - {}", placement.file_name);
            println!("   → Would move to {}/", placement.category);
        }
        OutputFormatter::summary_table(&report);
        OutputFormatter::dry_run_notice("No files were modified.");
        return Ok(());
    }

    OutputFormatter::info(&format!("Sorting contents of: {}", dir.display()));
    let scan = organizer.candidates(dir).map_err(|e| e.to_string())?;
    if scan.is_empty() {
        OutputFormatter::info("No files found to sort.");
        return Ok(());
    }

    let pb = OutputFormatter::create_progress_bar(scan.files.len() as u64);
    let report = organizer.organize_scan(dir, scan, false, |name| {
        pb.set_message(name.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    OutputFormatter::summary_table(&report);
    if report.is_complete_success() {
        OutputFormatter::success("Sorting complete!");
    } else {
        OutputFormatter::warning("Some files could not be sorted. Please review errors above.");
    }

    Ok(())
}

fn classify_names(
    store: &RuleStore,
    table: &CategoryTable,
    names: &[String],
) -> Result<(), String> {
    let rules = store
        .load()
        .map_err(|e| format!("Error loading rules: {}", e))?;
    let rule_set = RuleSet::new(&rules);

    let mut failed = false;
    for name in names {
        match rule_set.classify(name, table) {
            Ok(category) => println!("{} -> {}", name, category),
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                failed = true;
            }
        }
    }

    if failed {
        Err("Some names could not be classified".to_string())
    } else {
        Ok(())
    }
}

fn run_rules_action(store: &RuleStore, action: RulesAction) -> Result<(), String> {
    let rules = store
        .load()
        .map_err(|e| format!("Error loading rules: {}", e))?;

    match action {
        RulesAction::List => {
            OutputFormatter::rule_list(&rules);
        }
        RulesAction::Add {
            rule_type,
            pattern,
            folder,
        } => {
            let rule = Rule::new(rule_type, &pattern, &folder).map_err(|e| e.to_string())?;
            store
                .append(&rules, rule.clone())
                .map_err(|e| format!("Error saving rules: {}", e))?;
            OutputFormatter::success("Rule created!");
            OutputFormatter::rule_detail(&rule);
        }
        RulesAction::Remove { index } => {
            let (_, removed) = store.remove_at(&rules, index).map_err(|e| e.to_string())?;
            OutputFormatter::success("Rule removed!");
            OutputFormatter::rule_detail(&removed);
        }
    }

    Ok(())
}
