/// Directory sorting: classify each file in a directory and move it into
/// the matching category subdirectory.
///
/// Only the top level of the directory is scanned. Subdirectories, including
/// category folders from earlier runs, are left alone. A failure on one file
/// is recorded and sorting continues with the next.
use crate::category::CategoryTable;
use crate::classifier::RuleSet;
use crate::config::EntryFilter;
use crate::error::{OrganizeError, OrganizeResult};
use crate::rule::Rule;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file placed (or, in a dry run, to be placed) in a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub file_name: String,
    pub category: String,
    pub destination: PathBuf,
}

/// Outcome of sorting one directory.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Files moved, or planned in a dry run, in scan order.
    pub placements: Vec<Placement>,
    /// Entries that could not be listed, classified or moved.
    pub failures: Vec<(String, OrganizeError)>,
    /// Entries left alone: directories, hidden and excluded files.
    pub skipped: usize,
}

impl OrganizeReport {
    /// Number of files per category.
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for placement in &self.placements {
            *counts.entry(placement.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One listing of a directory, taken before anything is moved.
#[derive(Debug, Default)]
pub struct Scan {
    /// Files to sort, in name order.
    pub files: Vec<PathBuf>,
    /// Entries left alone.
    pub skipped: usize,
    /// Entries the listing could not read.
    pub failures: Vec<(String, OrganizeError)>,
}

impl Scan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.failures.is_empty()
    }
}

/// Sorts files into category subdirectories.
pub struct FileOrganizer<'a> {
    rules: RuleSet<'a>,
    table: &'a CategoryTable,
    filter: &'a EntryFilter,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(rules: &'a [Rule], table: &'a CategoryTable, filter: &'a EntryFilter) -> Self {
        Self {
            rules: RuleSet::new(rules),
            table,
            filter,
        }
    }

    /// Lists the entries of `base_path` that take part in sorting.
    ///
    /// Anything that is not a directory is a candidate; symlinks are
    /// followed for that check. Entries the listing fails on are kept in
    /// [`Scan::failures`] rather than dropped.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::ReadDir` if the directory cannot be listed.
    pub fn candidates(&self, base_path: &Path) -> OrganizeResult<Scan> {
        let entries = fs::read_dir(base_path).map_err(|source| OrganizeError::ReadDir {
            path: base_path.to_path_buf(),
            source,
        })?;

        Ok(self.scan_entries(base_path, entries.map(|entry| entry.map(|e| e.path()))))
    }

    fn scan_entries(
        &self,
        base_path: &Path,
        entries: impl IntoIterator<Item = io::Result<PathBuf>>,
    ) -> Scan {
        let mut scan = Scan::default();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(source) => {
                    tracing::warn!(
                        dir = %base_path.display(),
                        error = %source,
                        "Could not read directory entry"
                    );
                    scan.failures.push((
                        base_path.display().to_string(),
                        OrganizeError::ReadEntry {
                            path: base_path.to_path_buf(),
                            source,
                        },
                    ));
                    continue;
                }
            };

            let is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if !is_dir && self.filter.accepts(&name) {
                scan.files.push(path);
            } else {
                scan.skipped += 1;
            }
        }
        scan.files.sort();
        scan
    }

    /// Sorts every candidate file in `base_path`.
    ///
    /// With `dry_run` set, the plan is computed but nothing on disk changes.
    /// `on_file` is called after each file with its name, for progress display.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::ReadDir` if the directory cannot be listed.
    /// Per-file errors end up in [`OrganizeReport::failures`].
    pub fn organize(
        &self,
        base_path: &Path,
        dry_run: bool,
        on_file: impl FnMut(&str),
    ) -> OrganizeResult<OrganizeReport> {
        let scan = self.candidates(base_path)?;
        Ok(self.organize_scan(base_path, scan, dry_run, on_file))
    }

    /// Sorts the files of an earlier [`FileOrganizer::candidates`] listing.
    ///
    /// Files that appeared in `base_path` after the listing are not touched.
    pub fn organize_scan(
        &self,
        base_path: &Path,
        scan: Scan,
        dry_run: bool,
        mut on_file: impl FnMut(&str),
    ) -> OrganizeReport {
        let mut report = OrganizeReport {
            skipped: scan.skipped,
            failures: scan.failures,
            ..Default::default()
        };

        for file_path in scan.files {
            let file_name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let result = self
                .rules
                .classify(&file_name, self.table)
                .map_err(OrganizeError::from)
                .and_then(|category| {
                    let destination = base_path.join(&category).join(&file_name);
                    if !dry_run {
                        Self::move_to_category(base_path, &file_path, &category)?;
                    }
                    Ok(Placement {
                        file_name: file_name.clone(),
                        category,
                        destination,
                    })
                });

            match result {
                Ok(placement) => {
                    tracing::info!(
                        file = %placement.file_name,
                        category = %placement.category,
                        dry_run,
                        "File sorted"
                    );
                    report.placements.push(placement);
                }
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Could not sort file");
                    report.failures.push((file_name.clone(), e));
                }
            }
            on_file(&file_name);
        }

        report
    }

    /// Moves `file_path` into `<base_path>/<category>/`, creating the folder
    /// if needed. Returns the destination path.
    ///
    /// An existing file at the destination is handled however `fs::rename`
    /// handles it on the current platform.
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> OrganizeResult<PathBuf> {
        let category_path = base_path.join(category);

        fs::create_dir_all(&category_path).map_err(|source| {
            OrganizeError::DirectoryCreation {
                path: category_path.clone(),
                source,
            }
        })?;

        let file_name = file_path.file_name().ok_or_else(|| OrganizeError::Move {
            from: file_path.to_path_buf(),
            to: category_path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;
        let destination = category_path.join(file_name);

        fs::rename(file_path, &destination).map_err(|source| OrganizeError::Move {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source,
        })?;

        Ok(destination)
    }
}
