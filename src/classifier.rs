//! Category resolution for a single file name.
//!
//! Resolution order, stopping at the first hit:
//! 1. user rules, in stored order
//! 2. the built-in table, keyed on the text after the last `.`
//! 3. [`FALLBACK_CATEGORY`]

use crate::category::{CategoryTable, FALLBACK_CATEGORY};
use crate::error::ClassifyError;
use crate::rule::{Rule, RuleKind};
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Resolves the destination category for `file_name`.
///
/// Every pattern is lowercased before use. `extension` and `contains`
/// rules compare against the lowercased name; `regex` rules run
/// case-insensitively against the name as given.
///
/// Compiles `rules` on every call. When classifying many names against
/// the same rules, build a [`RuleSet`] once instead.
///
/// # Errors
///
/// Returns `ClassifyError::Pattern` when a `regex` rule is reached whose
/// pattern does not compile. Rules after it are not consulted.
///
/// # Examples
///
/// ```
/// use rulesort::category::CategoryTable;
/// use rulesort::classifier::classify;
/// use rulesort::rule::{Rule, RuleType};
///
/// let table = CategoryTable::default();
/// let rules = vec![Rule::new(RuleType::Extension, "pdf", "Invoices").unwrap()];
///
/// assert_eq!(classify("report.pdf", &rules, &table).unwrap(), "Invoices");
/// assert_eq!(classify("photo.JPG", &rules, &table).unwrap(), "Images");
/// assert_eq!(classify("README", &rules, &table).unwrap(), "Others");
/// ```
pub fn classify(
    file_name: &str,
    rules: &[Rule],
    table: &CategoryTable,
) -> Result<String, ClassifyError> {
    RuleSet::new(rules).classify(file_name, table)
}

/// A rule with its pattern prepared for matching.
#[derive(Debug)]
enum CompiledMatcher {
    /// `.<pattern>`, lowercased.
    Suffix(String),
    /// Lowercased pattern.
    Substring(String),
    /// Compile result, kept so a bad pattern only fails when reached.
    Regex(Result<Regex, regex::Error>),
}

#[derive(Debug)]
struct CompiledRule<'a> {
    rule: &'a Rule,
    matcher: CompiledMatcher,
}

/// Rules compiled once for a sorting session.
///
/// Regex compile errors are held back until a file actually reaches the
/// offending rule, so a broken rule late in the list does not affect
/// names matched by an earlier one.
#[derive(Debug)]
pub struct RuleSet<'a> {
    rules: Vec<CompiledRule<'a>>,
}

impl<'a> RuleSet<'a> {
    pub fn new(rules: &'a [Rule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let matcher = match &rule.kind {
                    RuleKind::Extension(pattern) => {
                        CompiledMatcher::Suffix(format!(".{}", pattern.to_lowercase()))
                    }
                    RuleKind::Contains(pattern) => {
                        CompiledMatcher::Substring(pattern.to_lowercase())
                    }
                    RuleKind::Regex(pattern) => CompiledMatcher::Regex(
                        RegexBuilder::new(&pattern.to_lowercase())
                            .case_insensitive(true)
                            .build(),
                    ),
                };
                CompiledRule { rule, matcher }
            })
            .collect();
        Self { rules }
    }

    /// Resolves the destination category for `file_name`. See [`classify`].
    pub fn classify(
        &self,
        file_name: &str,
        table: &CategoryTable,
    ) -> Result<String, ClassifyError> {
        let lower_name = file_name.to_lowercase();

        for (index, compiled) in self.rules.iter().enumerate() {
            let position = index + 1;
            let matched = match &compiled.matcher {
                CompiledMatcher::Suffix(suffix) => lower_name.ends_with(suffix.as_str()),
                CompiledMatcher::Substring(needle) => lower_name.contains(needle.as_str()),
                CompiledMatcher::Regex(Ok(regex)) => regex.is_match(file_name),
                CompiledMatcher::Regex(Err(source)) => {
                    return Err(ClassifyError::Pattern {
                        file_name: file_name.to_string(),
                        rule_position: position,
                        pattern: compiled.rule.pattern().to_string(),
                        source: source.clone(),
                    });
                }
            };

            if matched {
                tracing::trace!(
                    file_name,
                    position,
                    folder = %compiled.rule.folder,
                    "rule matched"
                );
                return Ok(compiled.rule.folder.clone());
            }
        }

        let ext = file_extension(file_name);
        Ok(table.lookup(&ext).unwrap_or(FALLBACK_CATEGORY).to_string())
    }
}

/// Returns the lowercased text after the last `.` of `file_name`.
///
/// Names without a dot, and dot-files such as `.bashrc`, have no extension
/// and yield an empty string. Compound suffixes are not recognised:
/// `archive.tar.gz` yields `gz`.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleType;

    fn rule(rule_type: RuleType, pattern: &str, folder: &str) -> Rule {
        Rule::new(rule_type, pattern, folder).unwrap()
    }

    #[test]
    fn test_builtin_fallback() {
        let table = CategoryTable::default();
        assert_eq!(classify("photo.JPG", &[], &table).unwrap(), "Images");
        assert_eq!(classify("song.flac", &[], &table).unwrap(), "Music");
        assert_eq!(classify("setup.exe", &[], &table).unwrap(), "Programs");
    }

    #[test]
    fn test_extension_rule_overrides_builtin() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Extension, "pdf", "Invoices")];
        assert_eq!(classify("report.pdf", &rules, &table).unwrap(), "Invoices");
        assert_eq!(classify("REPORT.PDF", &rules, &table).unwrap(), "Invoices");
    }

    #[test]
    fn test_extension_rule_requires_dot() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Extension, "pdf", "Invoices")];
        // "notapdf" ends with "pdf" but not ".pdf"
        assert_eq!(classify("notapdf", &rules, &table).unwrap(), "Others");
    }

    #[test]
    fn test_extension_rule_matches_compound_suffix() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Extension, "tar.gz", "Tarballs")];
        assert_eq!(
            classify("archive.tar.gz", &rules, &table).unwrap(),
            "Tarballs"
        );
    }

    #[test]
    fn test_contains_rule_unicode() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Contains, "отчёт", "Reports")];
        assert_eq!(
            classify("годовой_отчёт.xlsx", &rules, &table).unwrap(),
            "Reports"
        );
        assert_eq!(
            classify("ГОДОВОЙ_ОТЧЁТ.xlsx", &rules, &table).unwrap(),
            "Reports"
        );
    }

    #[test]
    fn test_contains_rule_uppercase_pattern() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Contains, "Invoice", "Invoices")];
        assert_eq!(
            classify("my_invoice_2023.zip", &rules, &table).unwrap(),
            "Invoices"
        );
    }

    #[test]
    fn test_regex_rule_case_insensitive() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Regex, r".*invoice.*\.docx", "Invoices")];
        assert_eq!(
            classify("Invoice_2023.docx", &rules, &table).unwrap(),
            "Invoices"
        );
        assert_eq!(classify("letter.docx", &rules, &table).unwrap(), "Documents");
    }

    #[test]
    fn test_regex_rule_searches_anywhere() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Regex, r"\d{4}-\d{2}", "Dated")];
        assert_eq!(
            classify("scan 2023-11 final.png", &rules, &table).unwrap(),
            "Dated"
        );
    }

    #[test]
    fn test_regex_pattern_is_lowercased() {
        let table = CategoryTable::default();
        // `\D` becomes `\d` and `\W` becomes `\w` once lowercased.
        let rules = vec![rule(RuleType::Regex, r"^\D+$", "Numbers")];
        assert_eq!(classify("2023", &rules, &table).unwrap(), "Numbers");

        let rules = vec![rule(RuleType::Regex, r"^\W+$", "Word")];
        assert_eq!(classify("abc", &rules, &table).unwrap(), "Word");
    }

    #[test]
    fn test_pattern_error_keeps_stored_pattern() {
        let table = CategoryTable::default();
        let rules = vec![rule(RuleType::Regex, "[A-Z", "Broken")];
        match classify("x.png", &rules, &table) {
            Err(ClassifyError::Pattern { pattern, .. }) => assert_eq!(pattern, "[A-Z"),
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_rule_set_reused_across_names() {
        let table = CategoryTable::default();
        let rules = vec![
            rule(RuleType::Extension, "txt", "Text"),
            rule(RuleType::Regex, "(unclosed", "Broken"),
            rule(RuleType::Contains, "never", "Unreached"),
        ];
        let set = RuleSet::new(&rules);

        assert_eq!(set.classify("a.txt", &table).unwrap(), "Text");
        assert!(set.classify("never.png", &table).is_err());
        assert_eq!(set.classify("b.TXT", &table).unwrap(), "Text");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = CategoryTable::default();
        let rules = vec![
            rule(RuleType::Contains, "report", "Reports"),
            rule(RuleType::Extension, "pdf", "Invoices"),
        ];
        assert_eq!(classify("report.pdf", &rules, &table).unwrap(), "Reports");
        assert_eq!(classify("bill.pdf", &rules, &table).unwrap(), "Invoices");
    }

    #[test]
    fn test_invalid_regex_fails_at_classification() {
        let table = CategoryTable::default();
        let rules = vec![
            rule(RuleType::Extension, "txt", "Text"),
            rule(RuleType::Regex, "[unclosed(", "Broken"),
        ];

        // An earlier match short-circuits before the bad pattern is reached.
        assert_eq!(classify("notes.txt", &rules, &table).unwrap(), "Text");

        match classify("photo.png", &rules, &table) {
            Err(ClassifyError::Pattern {
                file_name,
                rule_position,
                pattern,
                ..
            }) => {
                assert_eq!(file_name, "photo.png");
                assert_eq!(rule_position, 2);
                assert_eq!(pattern, "[unclosed(");
            }
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_extension_goes_to_others() {
        let table = CategoryTable::default();
        assert_eq!(classify("README", &[], &table).unwrap(), "Others");
    }

    #[test]
    fn test_last_dot_only() {
        let table = CategoryTable::default();
        assert_eq!(classify("archive.tar.gz", &[], &table).unwrap(), "Others");
        assert_eq!(classify("backup.tar.bz2", &[], &table).unwrap(), "Archives");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.JPG"), "jpg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".bashrc"), "");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let table = CategoryTable::default();
        let rules = vec![
            rule(RuleType::Regex, "^IMG_", "Camera"),
            rule(RuleType::Contains, "draft", "Drafts"),
        ];
        for name in ["IMG_0001.heic", "draft.md", "x.mp4", "noext"] {
            let first = classify(name, &rules, &table).unwrap();
            let second = classify(name, &rules, &table).unwrap();
            assert_eq!(first, second);
            assert!(!first.is_empty());
        }
    }
}
