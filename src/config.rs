//! Build configuration
//!
//! Loaded from YAML; every field has a default so an empty file (or no file
//! at all) is a valid configuration.
//!
//! ```yaml
//! snippet_window: 60
//! lemma_chunk_size: 5000
//! extra_stopwords: [behold, thus]
//! entities_file: curated/entities.txt
//! nlp:
//!   command: python3
//!   args: [tools/nlp_server.py]
//!   timeout_seconds: 120
//! ```

use crate::concordance::MIN_KEY_LEN;
use crate::error::{IndexError, IndexResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How to reach the external NLP helper process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    /// Executable to spawn
    pub command: String,
    /// Arguments passed to the executable
    pub args: Vec<String>,
    /// Working directory for the helper
    pub working_dir: Option<PathBuf>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            command: "versegraph-nlp".to_string(),
            args: Vec::new(),
            working_dir: None,
            timeout_seconds: 120,
        }
    }
}

/// Tunables for a build run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Characters of context on each side of a snippet match
    pub snippet_window: usize,
    /// Minimum token length considered by the concordance (at least 3)
    pub min_word_len: usize,
    /// Vocabulary words per lemmatization call
    pub lemma_chunk_size: usize,
    /// Chapter references kept on each word node of the graph
    pub max_chapter_refs: usize,
    /// Added to the built-in stopword list
    pub extra_stopwords: Vec<String>,
    /// Replaces the built-in known-entity list (one word per line or JSON array)
    pub entities_file: Option<PathBuf>,
    /// Replaces the built-in subject-noun list
    pub subject_words_file: Option<PathBuf>,
    pub nlp: NlpConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            snippet_window: 60,
            min_word_len: 3,
            lemma_chunk_size: 5000,
            max_chapter_refs: 30,
            extra_stopwords: Vec::new(),
            entities_file: None,
            subject_words_file: None,
            nlp: NlpConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> IndexResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| IndexError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file. A missing file is an error; use
    /// [`BuildConfig::load_or_default`] for optional config.
    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::InputNotFound(path.to_path_buf()));
        }
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&yaml)?;
        config.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(config)
    }

    /// Explicit path if given, else the per-user config file when present,
    /// else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> IndexResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "using user configuration");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> IndexResult<()> {
        if self.lemma_chunk_size == 0 {
            return Err(IndexError::Config("lemma_chunk_size must be positive".to_string()));
        }
        if self.min_word_len < MIN_KEY_LEN {
            return Err(IndexError::Config(format!(
                "min_word_len must be at least {}",
                MIN_KEY_LEN
            )));
        }
        Ok(())
    }

    /// Relative file references are relative to the config file.
    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.entities_file,
            &mut self.subject_words_file,
            &mut self.nlp.working_dir,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// `~/.config/versegraph/config.yaml` (platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("versegraph").join("config.yaml"))
}
