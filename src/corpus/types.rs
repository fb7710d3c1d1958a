//! Parsed corpus types: chapter keys, verse records and parse statistics

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `"<Book> <chapter>"` identity shared by the corpus, the summaries file and
/// every derived output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterKey(String);

impl ChapterKey {
    pub fn new(book: &str, chapter: u32) -> Self {
        Self(format!("{} {}", book, chapter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Book part of the key (everything before the last space).
    pub fn book(&self) -> &str {
        self.0.rsplit_once(' ').map(|(book, _)| book).unwrap_or(&self.0)
    }

    /// Chapter number, when the key ends in one.
    pub fn number(&self) -> Option<u32> {
        self.0.rsplit_once(' ').and_then(|(_, n)| n.parse().ok())
    }
}

impl std::fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChapterKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChapterKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One verse of the corpus. Continuation lines have no verse number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub book: String,
    pub chapter: u32,
    pub verse: Option<u32>,
    pub text: String,
    /// Position within the chapter, strictly increasing in source order
    pub ordinal: usize,
}

impl VerseRecord {
    pub fn chapter_key(&self) -> ChapterKey {
        ChapterKey::new(&self.book, self.chapter)
    }

    /// Human-readable reference, e.g. `Genesis 1:1` (or `Genesis 1` for
    /// unnumbered continuation text).
    pub fn reference(&self) -> String {
        match self.verse {
            Some(verse) => format!("{} {}:{}", self.book, self.chapter, verse),
            None => format!("{} {}", self.book, self.chapter),
        }
    }
}

/// All verses of one chapter, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub key: ChapterKey,
    pub book: String,
    pub number: u32,
    pub verses: Vec<VerseRecord>,
}

impl Chapter {
    /// The chapter's verses joined with single spaces.
    pub fn full_text(&self) -> String {
        self.verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Counters that make the scanner's leniency observable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseStats {
    pub lines_read: usize,
    /// Blank and single-period lines
    pub skipped_lines: usize,
    pub trailing_references: usize,
    pub leading_references: usize,
    pub chapter_headers: usize,
    /// Unrecognized lines absorbed into the open chapter
    pub continuation_lines: usize,
    /// Unrecognized lines seen before any chapter was open (dropped)
    pub orphaned_lines: usize,
    /// Chapters whose key re-appeared after another chapter intervened
    pub reopened_chapters: usize,
}

/// Chapters in first-seen order with keyed lookup.
#[derive(Debug, Clone, Default)]
pub struct ParsedCorpus {
    chapters: Vec<Chapter>,
    index: HashMap<ChapterKey, usize>,
    pub stats: ParseStats,
}

impl ParsedCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append verse texts to a chapter, creating the group on first sight.
    ///
    /// Returns `true` when the chapter already existed (a reopened chapter).
    pub fn extend_chapter(
        &mut self,
        book: &str,
        number: u32,
        verses: impl IntoIterator<Item = (Option<u32>, String)>,
    ) -> bool {
        let key = ChapterKey::new(book, number);
        let (idx, existed) = match self.index.get(&key) {
            Some(&idx) => (idx, true),
            None => {
                self.chapters.push(Chapter {
                    key: key.clone(),
                    book: book.to_string(),
                    number,
                    verses: Vec::new(),
                });
                let idx = self.chapters.len() - 1;
                self.index.insert(key, idx);
                (idx, false)
            }
        };

        let chapter = &mut self.chapters[idx];
        for (verse, text) in verses {
            let ordinal = chapter.verses.len();
            chapter.verses.push(VerseRecord {
                book: chapter.book.clone(),
                chapter: number,
                verse,
                text,
                ordinal,
            });
        }
        existed
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn get(&self, key: &ChapterKey) -> Option<&Chapter> {
        self.index.get(key).map(|&idx| &self.chapters[idx])
    }

    pub fn contains(&self, key: &ChapterKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }

    pub fn verses(&self) -> impl Iterator<Item = &VerseRecord> {
        self.chapters.iter().flat_map(|c| c.verses.iter())
    }
}
