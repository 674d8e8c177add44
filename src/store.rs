/// Persisted, ordered rule collection.
///
/// The rule sequence is stored as a pretty-printed JSON array in a single
/// file. Every mutation rewrites the whole file. The store holds no rules
/// itself: callers pass the current sequence in and get the new one back.
use crate::error::{StoreError, StoreResult};
use crate::rule::Rule;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of the rule record.
pub const RULES_FILE_NAME: &str = "rules.json";

/// Reads and writes the rule record at a fixed path.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    /// Creates a store bound to `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the persisted record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the rule sequence, recovering from a malformed record.
    ///
    /// A missing record is created empty. A record that fails to parse is
    /// reported with a warning and treated as empty; the file itself is left
    /// untouched so it can be repaired by hand.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StorageRead` if an existing record cannot be read
    /// and `StoreError::StorageWrite` if a missing record cannot be created.
    pub fn load(&self) -> StoreResult<Vec<Rule>> {
        match self.try_load() {
            Err(StoreError::MalformedRecord { path, source }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "Could not parse rule record; continuing with an empty rule list"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Loads the rule sequence without recovering from a malformed record.
    ///
    /// Like [`RuleStore::load`], creates the record empty if it is missing.
    pub fn try_load(&self) -> StoreResult<Vec<Rule>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "Rule record missing; creating it empty");
            self.save(&[])?;
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path).map_err(|source| StoreError::StorageRead {
            path: self.path.clone(),
            source,
        })?;

        // Invalid UTF-8 is a parse failure like any other malformed content.
        let rules: Vec<Rule> =
            serde_json::from_slice(&content).map_err(|source| StoreError::MalformedRecord {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), count = rules.len(), "Loaded rules");
        Ok(rules)
    }

    /// Overwrites the record with `rules`.
    ///
    /// Output is indented by two spaces and keeps non-ASCII text verbatim.
    /// The parent directory is not created.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StorageWrite` if the file cannot be written.
    pub fn save(&self, rules: &[Rule]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(rules).map_err(StoreError::Serialize)?;

        fs::write(&self.path, json).map_err(|source| StoreError::StorageWrite {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), count = rules.len(), "Saved rules");
        Ok(())
    }

    /// Appends `rule` after the existing rules and persists the result.
    ///
    /// Returns the new sequence; `rules` itself is not modified.
    pub fn append(&self, rules: &[Rule], rule: Rule) -> StoreResult<Vec<Rule>> {
        let mut updated = rules.to_vec();
        updated.push(rule);
        self.save(&updated)?;

        tracing::info!(count = updated.len(), "Rule added");
        Ok(updated)
    }

    /// Removes the rule at 1-based `index` and persists the result.
    ///
    /// Returns the new sequence together with the removed rule.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OutOfRange` when `index` is not within
    /// `1..=rules.len()`. Nothing is written in that case.
    pub fn remove_at(&self, rules: &[Rule], index: i64) -> StoreResult<(Vec<Rule>, Rule)> {
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| (1..=rules.len()).contains(&i))
            .ok_or(StoreError::OutOfRange {
                index,
                len: rules.len(),
            })?;

        let mut updated = rules.to_vec();
        let removed = updated.remove(position - 1);
        self.save(&updated)?;

        tracing::info!(index, folder = %removed.folder, "Rule removed");
        Ok((updated, removed))
    }

    /// Pairs each rule with its 1-based position, in stored order.
    pub fn list(rules: &[Rule]) -> impl Iterator<Item = (usize, &Rule)> {
        rules.iter().enumerate().map(|(i, rule)| (i + 1, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleType;
    use tempfile::TempDir;

    fn sample_rules() -> Vec<Rule> {
        vec![
            Rule::new(RuleType::Extension, "pdf", "Invoices").unwrap(),
            Rule::new(RuleType::Contains, "отчёт", "Reports").unwrap(),
            Rule::new(RuleType::Regex, r"^IMG_\d+", "Camera").unwrap(),
        ]
    }

    #[test]
    fn test_load_creates_missing_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        let store = RuleStore::new(&path);

        let rules = store.load().expect("Load failed");

        assert!(rules.is_empty());
        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_load_malformed_returns_empty_and_keeps_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let store = RuleStore::new(&path);

        let rules = store.load().expect("Load should recover");

        assert!(rules.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_try_load_reports_malformed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        fs::write(&path, r#"[{"rule_type": "glob"}]"#).unwrap();
        let store = RuleStore::new(&path);

        let result = store.try_load();
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_load_invalid_utf8_is_malformed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        let bytes = [0xff, 0xfe, b'[', b']'];
        fs::write(&path, bytes).unwrap();
        let store = RuleStore::new(&path);

        assert!(matches!(
            store.try_load(),
            Err(StoreError::MalformedRecord { .. })
        ));
        let rules = store.load().expect("Load should recover");

        assert!(rules.is_empty());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RuleStore::new(temp_dir.path().join(RULES_FILE_NAME));
        let rules = sample_rules();

        store.save(&rules).expect("Save failed");
        let loaded = store.load().expect("Load failed");

        assert_eq!(loaded, rules);
    }

    #[test]
    fn test_save_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        let store = RuleStore::new(&path);
        let rules = vec![Rule::new(RuleType::Contains, "отчёт", "Reports").unwrap()];

        store.save(&rules).expect("Save failed");

        let content = fs::read_to_string(&path).unwrap();
        let expected = "[\n  {\n    \"rule_type\": \"contains\",\n    \"pattern\": \"отчёт\",\n    \"folder\": \"Reports\"\n  }\n]";
        assert_eq!(content, expected);
    }

    #[test]
    fn test_save_missing_parent_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RuleStore::new(temp_dir.path().join("missing").join(RULES_FILE_NAME));

        let result = store.save(&sample_rules());
        assert!(matches!(result, Err(StoreError::StorageWrite { .. })));
    }

    #[test]
    fn test_save_load_round_trip_is_stable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(RULES_FILE_NAME);
        let store = RuleStore::new(&path);
        store.save(&sample_rules()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_append_persists_at_end() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RuleStore::new(temp_dir.path().join(RULES_FILE_NAME));
        let rules = store.load().unwrap();

        let rules = store
            .append(&rules, Rule::new(RuleType::Extension, "pdf", "Invoices").unwrap())
            .unwrap();
        let new_rule = Rule::new(RuleType::Contains, "draft", "Drafts").unwrap();
        let rules = store.append(&rules, new_rule.clone()).unwrap();

        let reloaded = RuleStore::new(store.path()).load().unwrap();
        assert_eq!(reloaded, rules);
        assert_eq!(reloaded.last(), Some(&new_rule));
    }

    #[test]
    fn test_remove_at_valid_index() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RuleStore::new(temp_dir.path().join(RULES_FILE_NAME));
        let rules = sample_rules();
        store.save(&rules).unwrap();

        let (remaining, removed) = store.remove_at(&rules, 2).unwrap();

        assert_eq!(removed, rules[1]);
        assert_eq!(remaining, vec![rules[0].clone(), rules[2].clone()]);
        assert_eq!(store.load().unwrap(), remaining);
    }

    #[test]
    fn test_remove_at_invalid_index() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RuleStore::new(temp_dir.path().join(RULES_FILE_NAME));
        let rules = sample_rules();
        store.save(&rules).unwrap();

        for index in [0, -1, 4] {
            match store.remove_at(&rules, index) {
                Err(StoreError::OutOfRange { index: i, len }) => {
                    assert_eq!(i, index);
                    assert_eq!(len, 3);
                }
                other => panic!("expected OutOfRange, got {:?}", other),
            }
        }

        assert_eq!(store.load().unwrap(), rules);
    }

    #[test]
    fn test_list_is_one_based() {
        let rules = sample_rules();
        let positions: Vec<usize> = RuleStore::list(&rules).map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }
}
