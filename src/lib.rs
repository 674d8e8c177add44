//! rulesort - sort a downloads folder with ordered user rules
//!
//! The core is the rule engine: an ordered, persisted list of user rules
//! ([`store::RuleStore`]), a built-in extension table
//! ([`category::CategoryTable`]) and the resolution algorithm
//! ([`classifier::classify`]) that turns a file name into a folder name.
//! Around it sit directory sorting, configuration and the command line.

pub mod category;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod rule;
pub mod store;

pub use category::{CategoryTable, FALLBACK_CATEGORY};
pub use classifier::{RuleSet, classify};
pub use config::{EntryFilter, SorterConfig};
pub use error::{ClassifyError, ConfigError, OrganizeError, RuleError, StoreError};
pub use file_organizer::{FileOrganizer, OrganizeReport, Placement, Scan};
pub use rule::{Rule, RuleKind, RuleType};
pub use store::RuleStore;
