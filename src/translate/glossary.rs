//! Food glossary loading and matching.
//! Loads fixed term pairs from JSON. A hit short-circuits translation in
//! either direction without touching the cache or the external service.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// A display-language term and its provider-language counterpart.
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryEntry {
    pub source: String,
    pub target: String,
}

/// On-disk glossary file format.
#[derive(Debug, Deserialize)]
struct GlossaryFile {
    version: u32,
    entries: Vec<GlossaryEntry>,
}

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("glossary IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("glossary parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loaded glossary, indexed both ways by lowercased trimmed term.
pub struct Glossary {
    version: u32,
    to_provider: HashMap<String, String>,
    to_display: HashMap<String, String>,
}

impl Glossary {
    /// Load glossary from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, GlossaryError> {
        let content = std::fs::read_to_string(path)?;
        let file: GlossaryFile = serde_json::from_str(&content)?;
        Ok(Self::from_entries(file.version, file.entries))
    }

    pub fn from_entries(version: u32, entries: Vec<GlossaryEntry>) -> Self {
        let mut to_provider = HashMap::with_capacity(entries.len());
        let mut to_display = HashMap::with_capacity(entries.len());
        for entry in entries {
            to_provider.insert(key(&entry.source), entry.target.clone());
            // first display term wins when several share a provider term
            to_display
                .entry(key(&entry.target))
                .or_insert(entry.source);
        }
        Self {
            version,
            to_provider,
            to_display,
        }
    }

    /// Create an empty glossary (fallback when file is missing).
    pub fn empty() -> Self {
        Self::from_entries(0, Vec::new())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.to_provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_provider.is_empty()
    }

    /// Provider-language term for a display-language `text`.
    pub fn lookup_provider(&self, text: &str) -> Option<&str> {
        self.to_provider.get(&key(text)).map(String::as_str)
    }

    /// Display-language term for a provider-language `text`.
    pub fn lookup_display(&self, text: &str) -> Option<&str> {
        self.to_display.get(&key(text)).map(String::as_str)
    }
}

fn key(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(source: &str, target: &str) -> GlossaryEntry {
        GlossaryEntry {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn lookups_are_case_insensitive_and_trimmed() {
        let glossary = Glossary::from_entries(1, vec![entry("納豆", "Natto")]);
        assert_eq!(glossary.lookup_provider(" 納豆 "), Some("Natto"));
        assert_eq!(glossary.lookup_display("natto"), Some("納豆"));
        assert_eq!(glossary.lookup_display("tofu"), None);
    }

    #[test]
    fn first_display_term_wins() {
        let glossary = Glossary::from_entries(
            1,
            vec![entry("りんご", "apple"), entry("林檎", "apple")],
        );
        assert_eq!(glossary.lookup_display("apple"), Some("りんご"));
        assert_eq!(glossary.lookup_provider("林檎"), Some("apple"));
        assert_eq!(glossary.len(), 2);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": 3, "entries": [{{"source": "豆腐", "target": "tofu"}}]}}"#
        )
        .unwrap();

        let glossary = Glossary::load_from_file(file.path()).unwrap();
        assert_eq!(glossary.version(), 3);
        assert_eq!(glossary.lookup_provider("豆腐"), Some("tofu"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Glossary::load_from_file(file.path()),
            Err(GlossaryError::Parse(_))
        ));
    }
}
