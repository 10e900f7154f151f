//! Suffix-keyed template lookup
//!
//! Modules and backends receive this once at discovery and pick their named
//! fragments by filename suffix (`fragment_blend.txt` matches
//! `shaders/templates/fragment_blend.txt`). First registered match wins.

use crate::Result;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct TemplateLookup {
    entries: Vec<(String, String)>,
}

impl TemplateLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every path from disk
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut lookup = Self::new();
        for path in paths {
            let path = path.as_ref();
            let contents = std::fs::read_to_string(path)?;
            log::debug!("Loaded template {}", path.display());
            lookup.insert(path.to_string_lossy(), contents);
        }
        Ok(lookup)
    }

    pub fn insert(&mut self, path: impl AsRef<str>, contents: impl Into<String>) {
        let path = path.as_ref().replace('\\', "/");
        self.entries.push((path, contents.into()));
    }

    pub fn with_entry(mut self, path: impl AsRef<str>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// First template whose path ends with `suffix`
    pub fn find(&self, suffix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(path, _)| path.ends_with(suffix))
            .map(|(_, contents)| contents.as_str())
    }

    /// Owned copy of the template for `suffix`, or `fallback`
    pub fn find_or(&self, suffix: &str, fallback: &str) -> String {
        self.find(suffix).unwrap_or(fallback).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_find_matches_suffix() {
        let lookup = TemplateLookup::new()
            .with_entry("assets/templates/fragment_standard.txt", "standard")
            .with_entry("assets\\templates\\fragment_blend.txt", "blend");

        assert_eq!(lookup.find("fragment_blend.txt"), Some("blend"));
        assert_eq!(lookup.find("fragment_standard.txt"), Some("standard"));
        assert_eq!(lookup.find("templates/fragment_blend.txt"), Some("blend"));
        assert_eq!(lookup.find("missing.txt"), None);
        assert_eq!(lookup.find_or("missing.txt", "default"), "default");
    }

    #[test]
    fn test_first_match_wins() {
        let lookup = TemplateLookup::new()
            .with_entry("a/vertex.txt", "first")
            .with_entry("b/vertex.txt", "second");
        assert_eq!(lookup.find("vertex.txt"), Some("first"));
    }

    #[test]
    fn test_from_paths_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass_scriptable.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Pass {{ }}").unwrap();

        let lookup = TemplateLookup::from_paths([&path]).unwrap();
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.find("pass_scriptable.txt"), Some("Pass { }\n"));
    }

    #[test]
    fn test_from_paths_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TemplateLookup::from_paths([dir.path().join("nope.txt")]).is_err());
    }
}
