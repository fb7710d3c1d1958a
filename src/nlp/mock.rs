//! Mock NLP capability for tests. Table-driven; counts its calls.

use super::{Dependency, LemmaService, NlpError, PartOfSpeech, PosTagger, TaggedToken};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

lazy_static! {
    static ref MOCK_TOKEN: Regex = Regex::new(r"[A-Za-z']+|[^\sA-Za-z']").unwrap();
}

/// Mock lemmatizer/tagger.
///
/// Unknown words lemmatize to their lowercased form and tag as
/// `Other`/`Other`, so tests only describe the words they care about.
pub struct MockNlp {
    available: bool,
    truncate_responses: bool,
    lemmas: HashMap<String, String>,
    tags: HashMap<String, (PartOfSpeech, Dependency)>,
    lemma_calls: AtomicUsize,
    words_requested: AtomicUsize,
    tag_calls: AtomicUsize,
}

impl MockNlp {
    /// Create a mock that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            truncate_responses: false,
            lemmas: HashMap::new(),
            tags: HashMap::new(),
            lemma_calls: AtomicUsize::new(0),
            words_requested: AtomicUsize::new(0),
            tag_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that reports as unavailable and fails every call.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    /// Return one lemma too few from every `lemmatize` call.
    pub fn with_truncated_responses(mut self) -> Self {
        self.truncate_responses = true;
        self
    }

    pub fn with_lemma(mut self, surface: &str, lemma: &str) -> Self {
        self.lemmas.insert(surface.to_lowercase(), lemma.to_string());
        self
    }

    pub fn with_tag(mut self, surface: &str, pos: PartOfSpeech, dep: Dependency) -> Self {
        self.tags.insert(surface.to_lowercase(), (pos, dep));
        self
    }

    /// Number of `lemmatize` calls received.
    pub fn lemma_calls(&self) -> usize {
        self.lemma_calls.load(Ordering::SeqCst)
    }

    /// Total words received across `lemmatize` calls.
    pub fn words_requested(&self) -> usize {
        self.words_requested.load(Ordering::SeqCst)
    }

    /// Number of `tag` calls received.
    pub fn tag_calls(&self) -> usize {
        self.tag_calls.load(Ordering::SeqCst)
    }

    fn lemma_of(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        self.lemmas.get(&lower).cloned().unwrap_or(lower)
    }

    fn unavailable_error() -> NlpError {
        NlpError::Unavailable("mock client configured as unavailable".to_string())
    }
}

#[async_trait]
impl LemmaService for MockNlp {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn lemmatize(&self, words: &[String]) -> Result<Vec<String>, NlpError> {
        if !self.available {
            return Err(Self::unavailable_error());
        }
        self.lemma_calls.fetch_add(1, Ordering::SeqCst);
        self.words_requested.fetch_add(words.len(), Ordering::SeqCst);

        let mut lemmas: Vec<String> = words.iter().map(|w| self.lemma_of(w)).collect();
        if self.truncate_responses {
            lemmas.pop();
        }
        Ok(lemmas)
    }
}

#[async_trait]
impl PosTagger for MockNlp {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn tag(&self, texts: &[String]) -> Result<Vec<Vec<TaggedToken>>, NlpError> {
        if !self.available {
            return Err(Self::unavailable_error());
        }
        self.tag_calls.fetch_add(1, Ordering::SeqCst);

        Ok(texts
            .iter()
            .map(|text| {
                MOCK_TOKEN
                    .find_iter(text)
                    .map(|m| {
                        let surface = m.as_str();
                        let (pos, dep) = self
                            .tags
                            .get(&surface.to_lowercase())
                            .copied()
                            .unwrap_or_default();
                        TaggedToken::new(surface, self.lemma_of(surface), pos, dep)
                    })
                    .collect()
            })
            .collect())
    }
}
