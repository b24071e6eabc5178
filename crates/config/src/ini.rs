//! Minimal `[section]` / `key = value` reader and writer. No secrets are
//! ever written through this module; callers pass only the non-secret
//! fields that are meant to persist.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Document {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections.entry(section.to_owned()).or_default().insert(key.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Self::new();
        let mut current_section = String::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
                    return Err(ConfigError::Malformed { line_no: idx + 1, line: raw_line.to_owned() });
                };
                current_section = name.trim().to_owned();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Malformed { line_no: idx + 1, line: raw_line.to_owned() });
            };
            doc.set(&current_section, key.trim(), value.trim());
        }
        Ok(doc)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (section, entries) in &self.sections {
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(ConfigError::Read { path: path.display().to_string(), source }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        fs::write(path, self.render()).map_err(|source| ConfigError::Write { path: path.display().to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sections_and_keys() {
        let mut doc = Document::new();
        doc.set("peer", "lastServerId", "ABCD-EFGH");
        doc.set("peer", "lastRelayPartnerId", "192 168 001 100");

        let rendered = doc.render();
        let reparsed = Document::parse(&rendered).unwrap();
        assert_eq!(reparsed.get("peer", "lastServerId"), Some("ABCD-EFGH"));
        assert_eq!(reparsed.get("peer", "lastRelayPartnerId"), Some("192 168 001 100"));
    }

    #[test]
    fn missing_file_yields_empty_document() {
        let doc = Document::load(Path::new("/nonexistent/path/meshdesk.ini")).unwrap();
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn malformed_line_is_rejected() {
        assert!(Document::parse("[peer]\nnotakeyvalue").is_err());
    }
}
