//! Chapter summaries supplied by the external summarizer

use crate::corpus::ChapterKey;
use crate::error::{IndexError, IndexResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// `ChapterKey → summary`, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct ChapterSummaries {
    entries: Vec<(ChapterKey, String)>,
    index: HashMap<ChapterKey, usize>,
}

impl ChapterSummaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a summary. Replacing keeps the original position.
    pub fn insert(&mut self, key: ChapterKey, summary: impl Into<String>) {
        let summary = summary.into();
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 = summary,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, summary));
            }
        }
    }

    /// Parse a JSON object of string values.
    pub fn from_json(content: &str, source_name: &str) -> IndexResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| IndexError::schema_mismatch(source_name, format!("invalid JSON: {}", e)))?;
        let object = value.as_object().ok_or_else(|| {
            IndexError::schema_mismatch(
                source_name,
                "summaries must be a JSON object of chapter → text",
            )
        })?;

        let mut summaries = Self::new();
        for (key, summary) in object {
            let summary = summary.as_str().ok_or_else(|| {
                let reason = format!("summary for `{}` is not a string", key);
                IndexError::schema_mismatch(source_name, reason)
            })?;
            summaries.insert(ChapterKey::from(key.as_str()), summary.trim());
        }
        Ok(summaries)
    }

    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let summaries = Self::from_json(&content, &path.display().to_string())?;
        tracing::info!(path = %path.display(), summaries = summaries.len(), "summaries loaded");
        Ok(summaries)
    }

    pub fn get(&self, key: &ChapterKey) -> Option<&str> {
        self.index.get(key).map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChapterKey, &str)> {
        self.entries.iter().map(|(k, s)| (k, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<ChapterKey>, S: Into<String>> FromIterator<(K, S)> for ChapterSummaries {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut summaries = Self::new();
        for (key, summary) in iter {
            summaries.insert(key.into(), summary);
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_file_order() {
        let summaries = ChapterSummaries::from_json(
            r#"{"Genesis 2": "Eden garden", "Genesis 1": "God creates heavens, earth, life"}"#,
            "s.json",
        )
        .unwrap();
        let keys: Vec<_> = summaries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Genesis 2", "Genesis 1"]);
        assert_eq!(
            summaries.get(&ChapterKey::from("Genesis 1")),
            Some("God creates heavens, earth, life")
        );
    }

    #[test]
    fn non_object_or_non_string_is_schema_mismatch() {
        let err = ChapterSummaries::from_json(r#"["Genesis 1"]"#, "s.json").unwrap_err();
        assert!(matches!(err, IndexError::SchemaMismatch { .. }));
        let err =
            ChapterSummaries::from_json(r#"{"Genesis 1": {"text": "x"}}"#, "s.json").unwrap_err();
        assert!(matches!(err, IndexError::SchemaMismatch { .. }));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = ChapterSummaries::load(Path::new("/no/such/summaries.json")).unwrap_err();
        assert!(matches!(err, IndexError::InputNotFound(_)));
    }
}
