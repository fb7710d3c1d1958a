//! Curated word sets used by role classification

use crate::error::{IndexError, IndexResult};
use std::collections::HashSet;
use std::path::Path;

/// Named people, places and peoples always treated as subjects.
pub const KNOWN_ENTITIES: &[&str] = &[
    "god", "lord", "jesus", "christ", "spirit", "father", "abraham", "isaac",
    "jacob", "israel", "moses", "aaron", "david", "solomon", "elijah", "elisha",
    "isaiah", "jeremiah", "ezekiel", "daniel", "peter", "paul", "john", "james",
    "matthew", "mark", "luke", "pharaoh", "nebuchadnezzar", "darius", "cyrus",
    "herod", "pilate", "adam", "eve", "noah", "lot", "sarah", "rachel", "ruth",
    "esther", "samson", "gideon", "joshua", "samuel", "saul", "jonathan",
    "judah", "benjamin", "joseph", "ephraim", "manasseh", "moab", "edom",
    "assyria", "babylon", "egypt", "persia", "rome", "jerusalem", "zion",
    "bethlehem", "nazareth", "galilee", "sinai",
];

/// Common nouns that act as subjects when tagged as nouns.
pub const SUBJECT_NOUNS: &[&str] = &[
    "prophets", "prophet", "priests", "priest", "king", "kings", "queen",
    "people", "nation", "nations", "israelites", "jews", "gentiles",
    "disciples", "apostles", "believers", "church", "servant", "servants",
    "man", "men", "woman", "women", "children", "son", "sons", "daughter",
    "angel", "angels", "satan", "devil", "enemy", "enemies", "wisdom", "love",
    "faith", "hope", "grace", "sin", "death",
];

/// A lowercased word set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet(HashSet<String>);

impl WordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    /// Parse either a JSON array of strings or one word per line (`#`
    /// starts a comment line).
    pub fn parse(content: &str, source_name: &str) -> IndexResult<Self> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            let words: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
                let reason = format!("expected a JSON array of strings: {}", e);
                IndexError::schema_mismatch(source_name, reason)
            })?;
            return Ok(Self::from_words(words));
        }
        Ok(Self::from_words(
            content.lines().filter(|line| !line.trim_start().starts_with('#')),
        ))
    }

    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two curated sets consulted by the subject pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleVocabulary {
    pub entities: WordSet,
    pub subject_nouns: WordSet,
}

impl Default for RoleVocabulary {
    fn default() -> Self {
        Self {
            entities: WordSet::from_words(KNOWN_ENTITIES),
            subject_nouns: WordSet::from_words(SUBJECT_NOUNS),
        }
    }
}

impl RoleVocabulary {
    /// Built-in sets, each replaced by a file when one is given.
    pub fn load(
        entities_file: Option<&Path>,
        subject_words_file: Option<&Path>,
    ) -> IndexResult<Self> {
        let mut vocab = Self::default();
        if let Some(path) = entities_file {
            vocab.entities = WordSet::load(path)?;
            tracing::info!(
                path = %path.display(),
                words = vocab.entities.len(),
                "loaded entity list"
            );
        }
        if let Some(path) = subject_words_file {
            vocab.subject_nouns = WordSet::load(path)?;
            tracing::info!(
                path = %path.display(),
                words = vocab.subject_nouns.len(),
                "loaded subject-noun list"
            );
        }
        Ok(vocab)
    }
}
