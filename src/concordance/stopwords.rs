//! Stopwords excluded from the concordance

use std::collections::HashSet;

/// Function words plus narrative filler too frequent to be useful as
/// search keys.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
    "with", "by", "from", "as", "is", "was", "are", "were", "been", "be", "have",
    "has", "had", "do", "does", "did", "will", "would", "could", "should", "may",
    "might", "must", "shall", "can", "need", "dare", "ought", "used", "it", "its",
    "this", "that", "these", "those", "i", "you", "he", "she", "we", "they", "me",
    "him", "her", "us", "them", "my", "your", "his", "our", "their", "mine",
    "yours", "hers", "ours", "theirs", "who", "whom", "which", "what", "whose",
    "where", "when", "why", "how", "all", "each", "every", "both", "few", "more",
    "most", "other", "some", "any", "no", "not", "only", "own", "same", "so",
    "than", "too", "very", "s", "t", "just", "don", "now", "then", "there", "here",
    "also", "into", "out", "up", "down", "over", "under", "again", "further",
    "once", "if", "because", "until", "while", "about", "against", "between",
    "through", "during", "before", "after", "above", "below", "such", "being",
    "say", "said", "tell", "told", "go", "went", "come", "came", "let", "make",
    "made", "take", "took", "give", "gave", "get", "got", "put", "see", "saw",
    "know", "knew", "think", "thought", "look", "looked", "want", "wanted",
    "way", "day", "man", "thing", "time", "year", "people", "son", "sons",
];

/// Stopword lookup, optionally extended from configuration.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordSet {
    pub fn new() -> Self {
        Self {
            words: STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(extra.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.words.contains(lemma)
    }
}
