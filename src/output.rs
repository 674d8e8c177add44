//! Console presentation for the command-line front end.
//!
//! Colored status lines, the rule listing, the category table and the
//! post-run summary all go through [`OutputFormatter`].

use crate::category::CategoryTable;
use crate::file_organizer::OrganizeReport;
use crate::rule::Rule;
use crate::store::RuleStore;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const RULE_SEPARATOR_WIDTH: usize = 60;

/// Styled console output.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a green ✓ line.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints a red ✗ line to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a yellow ⚠ line.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` files.
    ///
    /// Falls back to the default bar style if the template is rejected.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    /// Prints the rules with their 1-based positions.
    pub fn rule_list(rules: &[Rule]) {
        if rules.is_empty() {
            Self::info("No user rules defined.");
            return;
        }

        Self::header("RULES");
        println!("{}", "=".repeat(RULE_SEPARATOR_WIDTH));
        for (position, rule) in RuleStore::list(rules) {
            println!("{}", format!("RULE #{}", position).bold());
            println!("  Type:    {}", rule.rule_type().as_str().to_uppercase());
            println!("  Pattern: {}", rule.pattern());
            println!("  Folder:  {}", rule.folder.green());
            println!("{}", "-".repeat(RULE_SEPARATOR_WIDTH));
        }
    }

    /// Prints one rule's fields after it was added or removed.
    pub fn rule_detail(rule: &Rule) {
        println!("  Type:    {}", rule.rule_type());
        println!("  Pattern: {}", rule.pattern());
        println!("  Folder:  {}", rule.folder);
    }

    /// Prints the built-in category table in lookup order.
    pub fn category_table(table: &CategoryTable) {
        Self::header("BUILT-IN CATEGORIES");
        for entry in table.entries() {
            let mut extensions: Vec<&str> = entry.extensions.iter().map(|e| e.as_str()).collect();
            extensions.sort_unstable();
            let listed = if extensions.is_empty() {
                "(everything else)".dimmed().to_string()
            } else {
                extensions.join(", ")
            };
            println!("{:<10} {}", entry.name.bold(), listed);
        }
    }

    /// Prints per-category counts and the failure list after a run.
    pub fn summary_table(report: &OrganizeReport) {
        Self::header("SUMMARY");

        let counts = report.category_counts();
        let width = counts
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(8); // "Category"

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        let total = report.placements.len();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );

        if !report.failures.is_empty() {
            Self::header("ERRORS");
            for (file_name, error) in &report.failures {
                Self::error(&format!("{}: {}", file_name, error));
            }
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
