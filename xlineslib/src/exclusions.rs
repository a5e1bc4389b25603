//! Persisted exclusion list.
//!
//! An exclusion token is a plain string fragment. A path is excluded when any
//! token occurs anywhere in it, so the same list can name extensions
//! (`.min.js`), partial file names or whole directory names (`node_modules`).
//!
//! The list lives in a flat file, one token per line. Every edit rewrites the
//! file in full; there is no locking, the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::XlinesError;
use crate::Result;

/// Ordered list of exclusion tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    tokens: Vec<String>,
}

impl ExclusionList {
    /// Create an empty list (excludes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from raw tokens. Tokens are trimmed and empty ones dropped,
    /// otherwise they are kept verbatim.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        list.extend(tokens);
        list
    }

    /// Parse exclusion file contents, one token per line.
    pub fn parse(contents: &str) -> Self {
        Self::from_tokens(contents.lines())
    }

    /// Append tokens for this run only. Nothing is written to disk.
    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tokens.extend(
            tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty()),
        );
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True if any token is a substring of the path.
    pub fn contains(&self, path: &Path) -> bool {
        self.matches(&path.to_string_lossy())
    }

    /// True if any token is a substring of `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.tokens.iter().any(|token| text.contains(token.as_str()))
    }

    /// Serialized form: one token per line, newline terminated.
    pub fn to_file_contents(&self) -> String {
        self.tokens.iter().map(|t| format!("{t}\n")).collect()
    }

    fn occurrences(&self, token: &str) -> usize {
        self.tokens.iter().filter(|t| t.as_str() == token).count()
    }
}

/// Normalize a token entered by the user for persisting.
///
/// Surrounding whitespace is trimmed and a leading `.` is added unless one is
/// already present. Returns `None` for blank input.
pub fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else if token.starts_with('.') {
        Some(token.to_string())
    } else {
        Some(format!(".{token}"))
    }
}

/// The on-disk file backing an [`ExclusionList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionFile {
    path: PathBuf,
}

impl ExclusionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list from disk.
    ///
    /// Fails with [`XlinesError::ConfigUnavailable`] when the file is missing
    /// or unreadable.
    pub fn load(&self) -> Result<ExclusionList> {
        fs::read_to_string(&self.path)
            .map(|contents| ExclusionList::parse(&contents))
            .map_err(|source| XlinesError::ConfigUnavailable {
                path: self.path.clone(),
                source,
            })
    }

    /// Read the list, treating an unavailable file as an empty list.
    pub fn load_or_empty(&self) -> ExclusionList {
        match self.load() {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!("{e}; continuing without exclusions");
                ExclusionList::new()
            }
        }
    }

    /// Overwrite the file with the full list.
    pub fn persist(&self, list: &ExclusionList) -> Result<()> {
        let persist_err = |source| XlinesError::PersistFailure {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }
        fs::write(&self.path, list.to_file_contents()).map_err(persist_err)
    }

    /// Normalize and append tokens, then persist the whole list.
    ///
    /// Existing tokens are not checked for duplicates. Returns the tokens that
    /// were appended.
    pub fn add<I, S>(&self, list: &mut ExclusionList, tokens: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added: Vec<String> = tokens
            .into_iter()
            .filter_map(|t| normalize_token(t.as_ref()))
            .collect();
        list.tokens.extend(added.iter().cloned());
        self.persist(list)?;
        tracing::debug!(count = added.len(), path = %self.path.display(), "exclusions added");
        Ok(added)
    }

    /// Remove the token at a 1-based `index`, persist, and verify the result.
    ///
    /// An out-of-range index fails with [`XlinesError::IndexOutOfRange`] and
    /// touches neither the list nor the file.
    pub fn remove(&self, list: &mut ExclusionList, index: usize) -> Result<String> {
        if index == 0 || index > list.len() {
            return Err(XlinesError::IndexOutOfRange {
                index,
                len: list.len(),
            });
        }

        let removed = list.tokens.remove(index - 1);
        self.persist(list)?;
        self.verify_removed(list, &removed)?;
        tracing::debug!(token = %removed, path = %self.path.display(), "exclusion removed");
        Ok(removed)
    }

    /// Re-read the file and check that `token` occurs exactly as often as in
    /// `expected` (zero unless the list held duplicates).
    pub fn verify_removed(&self, expected: &ExclusionList, token: &str) -> Result<()> {
        let on_disk = self.load()?;
        if on_disk.occurrences(token) != expected.occurrences(token) {
            return Err(XlinesError::RemovalNotPersisted {
                token: token.to_string(),
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_list(dir: &Path, contents: &str) -> ExclusionFile {
        let path = dir.join("exclusions.list");
        fs::write(&path, contents).unwrap();
        ExclusionFile::new(path)
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let list = ExclusionList::parse("  .min.js \n\n.lock\n   \nnode_modules\n");
        assert_eq!(list.tokens(), &[".min.js", ".lock", "node_modules"]);
    }

    #[test]
    fn test_contains_is_substring_match() {
        let list = ExclusionList::from_tokens([".min.js", "vendor"]);

        assert!(list.contains(Path::new("/src/app.min.js")));
        assert!(list.contains(Path::new("/repo/vendor/lib.rs")));
        assert!(list.contains(Path::new("/repo/vendored.rs")));
        assert!(!list.contains(Path::new("/src/app.js")));
    }

    #[test]
    fn test_empty_list_excludes_nothing() {
        let list = ExclusionList::new();
        assert!(!list.contains(Path::new("/any/path.rs")));
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("py"), Some(".py".to_string()));
        assert_eq!(normalize_token(" .min.js "), Some(".min.js".to_string()));
        assert_eq!(normalize_token("   "), None);
    }

    #[test]
    fn test_load_missing_file_is_config_unavailable() {
        let temp = tempdir().unwrap();
        let file = ExclusionFile::new(temp.path().join("missing.list"));

        assert!(matches!(
            file.load(),
            Err(XlinesError::ConfigUnavailable { .. })
        ));
        assert!(file.load_or_empty().is_empty());
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".lock\n");
        let mut list = file.load().unwrap();

        let added = file.add(&mut list, ["foo", " .bar"]).unwrap();
        assert_eq!(added, vec![".foo", ".bar"]);

        let reloaded = file.load().unwrap();
        assert_eq!(reloaded.tokens(), &[".lock", ".foo", ".bar"]);
        assert_eq!(reloaded, list);
    }

    #[test]
    fn test_add_tolerates_duplicates() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".foo\n");
        let mut list = file.load().unwrap();

        file.add(&mut list, [".foo"]).unwrap();
        assert_eq!(file.load().unwrap().tokens(), &[".foo", ".foo"]);
    }

    #[test]
    fn test_add_creates_missing_config_dir() {
        let temp = tempdir().unwrap();
        let file = ExclusionFile::new(temp.path().join("xlines/exclusions.list"));
        let mut list = file.load_or_empty();

        file.add(&mut list, ["foo"]).unwrap();
        assert_eq!(file.load().unwrap().tokens(), &[".foo"]);
    }

    #[test]
    fn test_remove_valid_index() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".a\n.b\n.c\n");
        let mut list = file.load().unwrap();

        let removed = file.remove(&mut list, 2).unwrap();
        assert_eq!(removed, ".b");

        let contents = fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, ".a\n.c\n");
        assert!(!file.load().unwrap().tokens().contains(&".b".to_string()));
    }

    #[test]
    fn test_remove_one_of_duplicates() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".a\n.b\n.a\n");
        let mut list = file.load().unwrap();

        file.remove(&mut list, 1).unwrap();
        assert_eq!(file.load().unwrap().tokens(), &[".b", ".a"]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_file_unchanged() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".a\n\n.b\n");
        let mut list = file.load().unwrap();

        for index in [0, 3, 99] {
            let err = file.remove(&mut list, index).unwrap_err();
            assert!(matches!(err, XlinesError::IndexOutOfRange { len: 2, .. }));
        }

        assert_eq!(list.len(), 2);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), ".a\n\n.b\n");
    }

    #[test]
    fn test_verify_removed_detects_stale_file() {
        let temp = tempdir().unwrap();
        let file = write_list(temp.path(), ".a\n.b\n");
        let expected = ExclusionList::from_tokens([".a"]);

        let err = file.verify_removed(&expected, ".b").unwrap_err();
        assert!(matches!(err, XlinesError::RemovalNotPersisted { .. }));
    }

    #[test]
    fn test_persist_failure() {
        let temp = tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = temp.path().join("exclusions.list");
        fs::create_dir(&path).unwrap();
        let file = ExclusionFile::new(path);

        let err = file.persist(&ExclusionList::from_tokens([".a"])).unwrap_err();
        assert!(matches!(err, XlinesError::PersistFailure { .. }));
    }
}
