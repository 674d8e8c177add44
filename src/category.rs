/// Built-in extension-to-category table.
///
/// The table is the fallback consulted when no user rule matches. It is
/// ordered: lookups return the first category whose extension set holds
/// the extension. `Others` has no extensions and catches everything else.
///
/// # Examples
///
/// ```
/// use rulesort::category::{CategoryTable, FALLBACK_CATEGORY};
///
/// let table = CategoryTable::default();
/// assert_eq!(table.lookup("jpg"), Some("Images"));
/// assert_eq!(table.lookup("PDF"), Some("Documents"));
/// assert_eq!(table.lookup("xyz"), None);
/// assert_eq!(FALLBACK_CATEGORY, "Others");
/// ```
use std::collections::HashSet;

/// Category returned when nothing else matches.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Built-in categories in lookup order.
const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Images",
        &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "heic"],
    ),
    (
        "Videos",
        &["mp4", "mov", "avi", "mkv", "flv", "wmv", "mpeg", "webm"],
    ),
    (
        "Documents",
        &[
            "pdf", "docx", "doc", "xlsx", "xls", "pptx", "ppt", "txt", "rtf", "odt",
        ],
    ),
    ("Archives", &["zip", "rar", "7z", "tar", "bz2"]),
    ("Music", &["mp3", "wav", "flac", "aac", "ogg", "m4a"]),
    ("Programs", &["exe", "msi", "dmg", "pkg", "deb"]),
    (
        "Code",
        &[
            "py", "js", "html", "css", "json", "xml", "java", "cpp", "c", "h",
        ],
    ),
    (FALLBACK_CATEGORY, &[]),
];

/// One named category and the lowercase extensions (no leading dot) it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub extensions: HashSet<String>,
}

/// Ordered mapping from category name to extension set.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    /// Creates the table with the built-in categories.
    pub fn builtin() -> Self {
        let entries = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, extensions)| CategoryEntry {
                name: name.to_string(),
                extensions: extensions.iter().map(|e| e.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Creates a table from explicit entries, kept in the given order.
    ///
    /// Extensions are lowercased and stripped of a leading dot.
    pub fn from_entries<I, N, E, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, extensions)| CategoryEntry {
                name: name.into(),
                extensions: extensions
                    .into_iter()
                    .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// Returns the first category owning `ext`, compared case-insensitively.
    ///
    /// An empty extension never matches.
    pub fn lookup(&self, ext: &str) -> Option<&str> {
        let ext = ext.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.extensions.contains(&ext))
            .map(|entry| entry.name.as_str())
    }

    /// Iterates the categories in lookup order.
    pub fn entries(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.iter()
    }

    /// Category names in lookup order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
