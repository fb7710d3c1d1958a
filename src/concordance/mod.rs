//! Concordance builder: lemma → chapters, ranked, with snippets
//!
//! Two passes over the verses so the whole vocabulary can be lemmatized in a
//! few large batches instead of one call per word:
//!
//! 1. collect every alphabetic token (≥ `min_word_len`) into one vocabulary
//!    and resolve it chunk by chunk;
//! 2. re-tokenize each verse, map tokens to lemmas from the cache and record
//!    each lemma at most once per verse.
//!
//! A lemma's chapter list is ranked by the number of verses containing it,
//! ties in chapter order.

mod snippet;
mod stopwords;

pub use snippet::extract_snippet;
pub use stopwords::{StopwordSet, STOPWORDS};

use crate::config::BuildConfig;
use crate::corpus::{ChapterKey, ParsedCorpus, VerseRecord};
use crate::lemma::LemmaResolver;
use crate::nlp::NlpError;
use crate::summaries::ChapterSummaries;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Shortest lemma kept as a concordance key.
pub const MIN_KEY_LEN: usize = 3;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\b[a-zA-Z]+\b").unwrap();
}

/// Alphabetic tokens of at least `min_len` characters.
fn tokens(text: &str, min_len: usize) -> impl Iterator<Item = &str> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(move |w| w.chars().count() >= min_len)
}

/// One chapter in a lemma's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcordanceEntry {
    pub chapter: ChapterKey,
    pub summary: String,
    /// Reference of the representative (first) verse
    #[serde(rename = "ref")]
    pub reference: String,
    pub snippet: String,
    /// Distinct verses in the chapter containing the lemma
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcordanceMeta {
    pub total_words: usize,
    pub total_chapters: usize,
    pub total_verses: usize,
}

/// The serialized concordance: lemma keys in sorted order.
#[derive(Debug, Clone, Serialize)]
pub struct Concordance {
    pub meta: ConcordanceMeta,
    pub concordance: BTreeMap<String, Vec<ConcordanceEntry>>,
}

impl Concordance {
    pub fn get(&self, lemma: &str) -> Option<&[ConcordanceEntry]> {
        self.concordance.get(lemma).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.concordance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concordance.is_empty()
    }

    /// Lemmas referenced by the most chapters (ties alphabetical).
    pub fn top_lemmas(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .concordance
            .iter()
            .map(|(lemma, entries)| (lemma.as_str(), entries.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Per-chapter accumulation: lemma → verses, lemmas in first-seen order.
#[derive(Default)]
struct ChapterOccurrences<'c> {
    order: Vec<String>,
    verses: HashMap<String, Vec<&'c VerseRecord>>,
}

impl<'c> ChapterOccurrences<'c> {
    fn record(&mut self, lemma: String, verse: &'c VerseRecord) {
        match self.verses.get_mut(&lemma) {
            Some(list) => list.push(verse),
            None => {
                self.order.push(lemma.clone());
                self.verses.insert(lemma, vec![verse]);
            }
        }
    }
}

/// Builds a [`Concordance`] from a parsed corpus.
#[derive(Debug, Clone)]
pub struct ConcordanceBuilder {
    stopwords: StopwordSet,
    snippet_window: usize,
    min_word_len: usize,
    chunk_size: usize,
}

impl Default for ConcordanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcordanceBuilder {
    pub fn new() -> Self {
        Self {
            stopwords: StopwordSet::new(),
            snippet_window: 60,
            min_word_len: MIN_KEY_LEN,
            chunk_size: 5000,
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            stopwords: StopwordSet::new().with_extra(&config.extra_stopwords),
            snippet_window: config.snippet_window,
            min_word_len: config.min_word_len.max(MIN_KEY_LEN),
            chunk_size: config.lemma_chunk_size.max(1),
        }
    }

    pub fn with_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_snippet_window(mut self, window: usize) -> Self {
        self.snippet_window = window;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Pass 1: the corpus-wide lowercased vocabulary, sorted.
    pub fn collect_vocabulary(&self, corpus: &ParsedCorpus) -> BTreeSet<String> {
        let min_len = self.min_word_len;
        corpus
            .verses()
            .flat_map(|verse| tokens(&verse.text, min_len))
            .map(str::to_lowercase)
            .collect()
    }

    /// Run both passes and finalize.
    pub async fn build(
        &self,
        corpus: &ParsedCorpus,
        summaries: &ChapterSummaries,
        resolver: &mut LemmaResolver<'_>,
    ) -> Result<Concordance, NlpError> {
        let vocabulary: Vec<String> = self.collect_vocabulary(corpus).into_iter().collect();
        tracing::info!(
            words = vocabulary.len(),
            verses = corpus.verse_count(),
            "collected vocabulary"
        );

        for (i, chunk) in vocabulary.chunks(self.chunk_size).enumerate() {
            resolver.resolve(chunk).await?;
            tracing::debug!(
                chunk = i + 1,
                done = ((i + 1) * self.chunk_size).min(vocabulary.len()),
                total = vocabulary.len(),
                "lemmatized chunk"
            );
        }
        tracing::info!(forms = resolver.cache().len(), "lemmatized word forms");

        let resolver = &*resolver;
        let per_chapter = self.index_chapters(corpus, resolver);
        let concordance = self.finalize(corpus, summaries, per_chapter, resolver);
        tracing::info!(lemmas = concordance.len(), "concordance built");
        Ok(concordance)
    }

    /// Pass 2: `ChapterKey → lemma → verses`, chapters in corpus order.
    fn index_chapters<'c>(
        &self,
        corpus: &'c ParsedCorpus,
        resolver: &LemmaResolver<'_>,
    ) -> Vec<(&'c ChapterKey, ChapterOccurrences<'c>)> {
        corpus
            .chapters()
            .iter()
            .map(|chapter| {
                let mut occurrences = ChapterOccurrences::default();
                for verse in &chapter.verses {
                    let mut seen_in_verse = HashSet::new();
                    for word in tokens(&verse.text, self.min_word_len) {
                        let lemma = resolver.lookup(word);
                        if lemma.chars().count() < self.min_word_len
                            || self.stopwords.contains(&lemma)
                        {
                            continue;
                        }
                        if seen_in_verse.insert(lemma.clone()) {
                            occurrences.record(lemma, verse);
                        }
                    }
                }
                (&chapter.key, occurrences)
            })
            .collect()
    }

    fn finalize(
        &self,
        corpus: &ParsedCorpus,
        summaries: &ChapterSummaries,
        per_chapter: Vec<(&ChapterKey, ChapterOccurrences<'_>)>,
        resolver: &LemmaResolver<'_>,
    ) -> Concordance {
        let mut index: BTreeMap<String, Vec<ConcordanceEntry>> = BTreeMap::new();

        for (key, mut occurrences) in per_chapter {
            let summary = summaries.get(key).unwrap_or_default();
            for lemma in occurrences.order {
                let verses = occurrences.verses.remove(&lemma).unwrap_or_default();
                let Some(best) = verses.first() else { continue };
                let snippet = extract_snippet(&best.text, &lemma, self.snippet_window, |w| {
                    resolver.lookup(w)
                });
                index.entry(lemma).or_default().push(ConcordanceEntry {
                    chapter: key.clone(),
                    summary: summary.to_string(),
                    reference: best.reference(),
                    snippet,
                    count: verses.len(),
                });
            }
        }

        for entries in index.values_mut() {
            entries.sort_by(|a, b| b.count.cmp(&a.count));
        }

        Concordance {
            meta: ConcordanceMeta {
                total_words: index.len(),
                total_chapters: corpus.len(),
                total_verses: corpus.verse_count(),
            },
            concordance: index,
        }
    }
}
