//! Batched, cached lemma resolution
//!
//! `LemmaResolver` owns the run's `LemmaCache` and is the only component that
//! talks to the `LemmaService`. Each `resolve` call sends at most one batch,
//! containing only words not seen before.

use crate::nlp::{LemmaService, NlpError};
use std::collections::{HashMap, HashSet};

/// Lowercased surface form → lemma. Grows monotonically for one build.
#[derive(Debug, Clone, Default)]
pub struct LemmaCache {
    entries: HashMap<String, String>,
}

impl LemmaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(&word.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&word.to_lowercase())
    }

    /// Record a lemma unless the word is already cached. Returns the lemma
    /// the cache holds afterwards.
    pub fn insert_if_absent(&mut self, word: &str, lemma: &str) -> &str {
        self.entries
            .entry(word.to_lowercase())
            .or_insert_with(|| lemma.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters for the end-of-build report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub cached_words: usize,
    pub service_calls: usize,
    pub words_sent: usize,
}

/// Resolves surface words to lemmas with minimal service traffic.
pub struct LemmaResolver<'a> {
    service: &'a dyn LemmaService,
    cache: LemmaCache,
    service_calls: usize,
    words_sent: usize,
}

impl<'a> LemmaResolver<'a> {
    pub fn new(service: &'a dyn LemmaService) -> Self {
        Self {
            service,
            cache: LemmaCache::new(),
            service_calls: 0,
            words_sent: 0,
        }
    }

    /// Lemma for every input word, same length and order.
    ///
    /// Novel words (by lowercased form) go to the service in one batch; a
    /// service failure is returned as-is and nothing is cached from it.
    pub async fn resolve(&mut self, words: &[String]) -> Result<Vec<String>, NlpError> {
        let mut seen = HashSet::new();
        let novel: Vec<String> = words
            .iter()
            .map(|w| w.to_lowercase())
            .filter(|w| !self.cache.entries.contains_key(w))
            .filter(|w| seen.insert(w.clone()))
            .collect();

        if !novel.is_empty() {
            tracing::debug!(words = novel.len(), cached = self.cache.len(), "lemmatizing batch");
            let lemmas = self.service.lemmatize(&novel).await?;
            if lemmas.len() != novel.len() {
                return Err(NlpError::ParseError(format!(
                    "lemmatized {} words, expected {}",
                    lemmas.len(),
                    novel.len()
                )));
            }
            self.service_calls += 1;
            self.words_sent += novel.len();

            for (word, lemma) in novel.into_iter().zip(lemmas) {
                let lemma = lemma.trim().to_lowercase();
                let lemma = if lemma.is_empty() { word.clone() } else { lemma };
                self.cache.entries.insert(word, lemma);
            }
        }

        Ok(words.iter().map(|w| self.lookup(w)).collect())
    }

    /// Cache-only lookup; unknown words map to their lowercased form.
    pub fn lookup(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.cache.entries.get(&lower) {
            Some(lemma) => lemma.clone(),
            None => lower,
        }
    }

    pub fn cache(&self) -> &LemmaCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut LemmaCache {
        &mut self.cache
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            cached_words: self.cache.len(),
            service_calls: self.service_calls,
            words_sent: self.words_sent,
        }
    }
}
