//! User-defined classification rules.
//!
//! A rule pairs a matcher with a destination folder. Rules live in an
//! ordered sequence and the first one that matches a file name wins.
//!
//! # Examples
//!
//! ```
//! use rulesort::rule::{Rule, RuleKind, RuleType};
//!
//! let rule = Rule::new(RuleType::Extension, "pdf", "Invoices").unwrap();
//! assert_eq!(rule.kind, RuleKind::Extension("pdf".to_string()));
//! assert_eq!(rule.folder, "Invoices");
//! ```

use crate::error::RuleError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted tag naming how a rule's pattern is interpreted.
///
/// The command line accepts the same names as the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// The file name ends with `.<pattern>`.
    Extension,
    /// The pattern occurs anywhere in the file name.
    Contains,
    /// The pattern is a case-insensitive regular expression.
    Regex,
}

impl RuleType {
    /// Returns the name used in the persisted record.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Extension => "extension",
            RuleType::Contains => "contains",
            RuleType::Regex => "regex",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule matches, with the pattern text it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Extension(String),
    Contains(String),
    Regex(String),
}

impl RuleKind {
    /// Builds the variant for `rule_type` around `pattern`.
    pub fn from_parts(rule_type: RuleType, pattern: String) -> Self {
        match rule_type {
            RuleType::Extension => RuleKind::Extension(pattern),
            RuleType::Contains => RuleKind::Contains(pattern),
            RuleType::Regex => RuleKind::Regex(pattern),
        }
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::Extension(_) => RuleType::Extension,
            RuleKind::Contains(_) => RuleType::Contains,
            RuleKind::Regex(_) => RuleType::Regex,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            RuleKind::Extension(p) | RuleKind::Contains(p) | RuleKind::Regex(p) => p,
        }
    }
}

/// A single classification rule.
///
/// Rules are never edited in place: they are appended to or removed
/// from the sequence as a whole. Serialized as a flat record with the
/// fields `rule_type`, `pattern` and `folder`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleRecord", into = "RuleRecord")]
pub struct Rule {
    pub kind: RuleKind,
    /// Destination category folder.
    pub folder: String,
}

impl Rule {
    /// Creates a rule, trimming both inputs.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::EmptyPattern` or `RuleError::EmptyFolder` when the
    /// corresponding input is blank. Regex syntax is not checked here; a bad
    /// pattern only surfaces when a file is classified.
    pub fn new(rule_type: RuleType, pattern: &str, folder: &str) -> Result<Self, RuleError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        let folder = folder.trim();
        if folder.is_empty() {
            return Err(RuleError::EmptyFolder);
        }

        Ok(Self {
            kind: RuleKind::from_parts(rule_type, pattern.to_string()),
            folder: folder.to_string(),
        })
    }

    pub fn rule_type(&self) -> RuleType {
        self.kind.rule_type()
    }

    pub fn pattern(&self) -> &str {
        self.kind.pattern()
    }
}

/// On-disk shape of a rule. Field order here is the serialized order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuleRecord {
    rule_type: RuleType,
    pattern: String,
    folder: String,
}

// Loading does not re-validate: records written by hand with empty
// fields are kept as-is.
impl From<RuleRecord> for Rule {
    fn from(record: RuleRecord) -> Self {
        Self {
            kind: RuleKind::from_parts(record.rule_type, record.pattern),
            folder: record.folder,
        }
    }
}

impl From<Rule> for RuleRecord {
    fn from(rule: Rule) -> Self {
        let rule_type = rule.rule_type();
        let pattern = match rule.kind {
            RuleKind::Extension(p) | RuleKind::Contains(p) | RuleKind::Regex(p) => p,
        };
        Self {
            rule_type,
            pattern,
            folder: rule.folder,
        }
    }
}
