//! Line-grammar scanner for plain-text corpora
//!
//! Each trimmed line is classified into one [`LineShape`], tried in priority
//! order: trailing reference (`text -- book 1:1`), leading reference
//! (`Book 1:1 text`), chapter header (`Book [Chapter] 1`), continuation.
//! The shape drives a two-state machine:
//!
//! | state            | reference / header (new key) | continuation        |
//! |------------------|------------------------------|---------------------|
//! | `NoChapterOpen`  | open chapter                 | drop, count orphan  |
//! | `ChapterOpen`    | flush, open chapter          | append, count       |
//!
//! Nothing here fails: unrecognized lines become continuation text.

use super::books::title_case;
use super::types::{ParseStats, ParsedCorpus};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TRAILING_REFERENCE: Regex = Regex::new(
        r"(?i)^(.+?)\s+--\s+(\d?\s?[a-z]+(?:\s+of\s+[a-z]+|\s+[a-z]+)?)\s+(\d+):(\d+)\s*$"
    )
    .unwrap();
    static ref LEADING_REFERENCE: Regex =
        Regex::new(r"^(\d?\s?[A-Za-z]+)\s+(\d+):(\d+)\s+(.+)$").unwrap();
    static ref CHAPTER_HEADER: Regex =
        Regex::new(r"(?i)^((?:\d\s)?[a-z]+)\s+(?:chapter\s+)?(\d+)\s*$").unwrap();
}

/// Classification of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// Blank or a lone `.`
    Skip,
    TrailingReference {
        text: &'a str,
        book: String,
        chapter: u32,
        verse: u32,
    },
    LeadingReference {
        text: &'a str,
        book: String,
        chapter: u32,
        verse: u32,
    },
    ChapterHeader {
        book: String,
        chapter: u32,
    },
    Continuation(&'a str),
}

/// Classify a single line. Leading/trailing whitespace is ignored.
pub fn classify_line(line: &str) -> LineShape<'_> {
    let line = line.trim();
    if line.is_empty() || line == "." {
        return LineShape::Skip;
    }

    if let Some(caps) = TRAILING_REFERENCE.captures(line) {
        if let (Ok(chapter), Ok(verse)) = (caps[3].parse(), caps[4].parse()) {
            if let Some(text) = caps.get(1) {
                return LineShape::TrailingReference {
                    text: text.as_str(),
                    book: title_case(caps[2].trim()),
                    chapter,
                    verse,
                };
            }
        }
    }

    if let Some(caps) = LEADING_REFERENCE.captures(line) {
        if let (Ok(chapter), Ok(verse)) = (caps[2].parse(), caps[3].parse()) {
            if let Some(text) = caps.get(4) {
                return LineShape::LeadingReference {
                    text: text.as_str(),
                    book: title_case(caps[1].trim()),
                    chapter,
                    verse,
                };
            }
        }
    }

    if let Some(caps) = CHAPTER_HEADER.captures(line) {
        if let Ok(chapter) = caps[2].parse() {
            return LineShape::ChapterHeader {
                book: title_case(caps[1].trim()),
                chapter,
            };
        }
    }

    LineShape::Continuation(line)
}

/// The chapter currently accumulating text.
#[derive(Debug)]
struct OpenChapter {
    book: String,
    number: u32,
    buffer: Vec<(Option<u32>, String)>,
}

impl OpenChapter {
    fn is(&self, book: &str, number: u32) -> bool {
        self.book == book && self.number == number
    }
}

#[derive(Debug)]
enum ScanState {
    NoChapterOpen,
    ChapterOpen(OpenChapter),
}

/// Streaming scanner; feed lines, then [`finish`](CorpusScanner::finish).
#[derive(Debug)]
pub struct CorpusScanner {
    state: ScanState,
    corpus: ParsedCorpus,
}

impl Default for CorpusScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::NoChapterOpen,
            corpus: ParsedCorpus::new(),
        }
    }

    pub fn stats(&self) -> &ParseStats {
        &self.corpus.stats
    }

    /// Process one raw line.
    pub fn feed(&mut self, line: &str) {
        self.corpus.stats.lines_read += 1;
        let state = std::mem::replace(&mut self.state, ScanState::NoChapterOpen);

        self.state = match classify_line(line) {
            LineShape::Skip => {
                self.corpus.stats.skipped_lines += 1;
                state
            }
            LineShape::TrailingReference { text, book, chapter, verse } => {
                self.corpus.stats.trailing_references += 1;
                let mut open = self.open(state, book, chapter);
                open.buffer.push((Some(verse), text.to_string()));
                ScanState::ChapterOpen(open)
            }
            LineShape::LeadingReference { text, book, chapter, verse } => {
                self.corpus.stats.leading_references += 1;
                let mut open = self.open(state, book, chapter);
                open.buffer.push((Some(verse), text.to_string()));
                ScanState::ChapterOpen(open)
            }
            LineShape::ChapterHeader { book, chapter } => {
                self.corpus.stats.chapter_headers += 1;
                ScanState::ChapterOpen(self.open(state, book, chapter))
            }
            LineShape::Continuation(text) => match state {
                ScanState::NoChapterOpen => {
                    self.corpus.stats.orphaned_lines += 1;
                    tracing::debug!(line = text, "dropping text before first chapter");
                    ScanState::NoChapterOpen
                }
                ScanState::ChapterOpen(mut open) => {
                    self.corpus.stats.continuation_lines += 1;
                    tracing::debug!(
                        book = %open.book,
                        chapter = open.number,
                        "unrecognized line absorbed as continuation"
                    );
                    open.buffer.push((None, text.to_string()));
                    ScanState::ChapterOpen(open)
                }
            },
        };
    }

    /// Flush the open chapter and return the parsed corpus.
    pub fn finish(mut self) -> ParsedCorpus {
        let state = std::mem::replace(&mut self.state, ScanState::NoChapterOpen);
        if let ScanState::ChapterOpen(open) = state {
            self.flush(open);
        }
        self.corpus
    }

    /// Keep the open chapter when the key matches, otherwise flush it and
    /// start a new one.
    fn open(&mut self, state: ScanState, book: String, number: u32) -> OpenChapter {
        match state {
            ScanState::ChapterOpen(open) if open.is(&book, number) => open,
            ScanState::ChapterOpen(open) => {
                self.flush(open);
                OpenChapter { book, number, buffer: Vec::new() }
            }
            ScanState::NoChapterOpen => OpenChapter { book, number, buffer: Vec::new() },
        }
    }

    fn flush(&mut self, open: OpenChapter) {
        if open.buffer.is_empty() {
            return;
        }
        if self.corpus.extend_chapter(&open.book, open.number, open.buffer) {
            self.corpus.stats.reopened_chapters += 1;
        }
    }
}

/// Parse a whole plain-text corpus.
pub fn parse_text(content: &str) -> ParsedCorpus {
    let mut scanner = CorpusScanner::new();
    for line in content.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ChapterKey;

    #[test]
    fn classifies_trailing_reference_without_leaking_the_reference() {
        let shape = classify_line(
            "In the beginning God created the heavens and the earth. -- genesis 1:1",
        );
        assert_eq!(
            shape,
            LineShape::TrailingReference {
                text: "In the beginning God created the heavens and the earth.",
                book: "Genesis".to_string(),
                chapter: 1,
                verse: 1,
            }
        );
    }

    #[test]
    fn classifies_multi_word_trailing_books() {
        match classify_line("May he kiss me with the kisses of his mouth! -- song of solomon 1:2") {
            LineShape::TrailingReference { book, chapter, verse, .. } => {
                assert_eq!(book, "Song Of Solomon");
                assert_eq!((chapter, verse), (1, 2));
            }
            other => panic!("unexpected shape {:?}", other),
        }
        match classify_line("Now there was a man -- 1 samuel 1:1") {
            LineShape::TrailingReference { book, .. } => assert_eq!(book, "1 Samuel"),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn classifies_leading_reference() {
        assert_eq!(
            classify_line("John 3:16 For God so loved the world"),
            LineShape::LeadingReference {
                text: "For God so loved the world",
                book: "John".to_string(),
                chapter: 3,
                verse: 16,
            }
        );
    }

    #[test]
    fn classifies_headers_and_skips() {
        assert_eq!(
            classify_line("Genesis Chapter 2"),
            LineShape::ChapterHeader { book: "Genesis".to_string(), chapter: 2 }
        );
        assert_eq!(
            classify_line("1 Kings 4"),
            LineShape::ChapterHeader { book: "1 Kings".to_string(), chapter: 4 }
        );
        assert_eq!(classify_line("   "), LineShape::Skip);
        assert_eq!(classify_line(" . "), LineShape::Skip);
        assert_eq!(
            classify_line("and it was so."),
            LineShape::Continuation("and it was so.")
        );
    }

    #[test]
    fn groups_consecutive_lines_and_flushes_on_change() {
        let corpus = parse_text(
            "In the beginning God created the heavens and the earth. -- genesis 1:1\n\
             And the earth was formless and void. -- genesis 1:2\n\
             Thus the heavens and the earth were completed. -- genesis 2:1\n",
        );

        assert_eq!(corpus.len(), 2);
        let first = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
        assert_eq!(first.verses.len(), 2);
        assert_eq!(first.verses[0].verse, Some(1));
        assert_eq!(first.verses[1].text, "And the earth was formless and void.");
        assert_eq!(corpus.chapters()[1].key.as_str(), "Genesis 2");
        assert_eq!(corpus.stats.trailing_references, 3);
    }

    #[test]
    fn header_then_continuation_lines_fill_the_chapter() {
        let corpus =
            parse_text("Ruth Chapter 1\nIn the days when the judges ruled\nthere was a famine.\n");
        let chapter = corpus.get(&ChapterKey::from("Ruth 1")).unwrap();
        assert_eq!(chapter.verses.len(), 2);
        assert!(chapter.verses.iter().all(|v| v.verse.is_none()));
        assert_eq!(corpus.stats.chapter_headers, 1);
        assert_eq!(corpus.stats.continuation_lines, 2);
    }

    #[test]
    fn text_before_any_chapter_is_counted_as_orphaned() {
        let corpus =
            parse_text("THE HOLY BIBLE\nNew American Standard\nGenesis 1:1 In the beginning\n");
        assert_eq!(corpus.stats.orphaned_lines, 2);
        assert_eq!(corpus.verse_count(), 1);
    }

    #[test]
    fn empty_header_produces_no_chapter() {
        let corpus = parse_text("Genesis 1\nGenesis 2\nIn the beginning\n");
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.chapters()[0].key.as_str(), "Genesis 2");
    }

    #[test]
    fn malformed_reference_lines_degrade_to_continuation() {
        let corpus = parse_text(
            "Genesis 1:1 In the beginning\n\
             this line -- has no reference\n",
        );
        let chapter = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
        assert_eq!(chapter.verses.len(), 2);
        assert_eq!(chapter.verses[1].text, "this line -- has no reference");
        assert_eq!(corpus.stats.continuation_lines, 1);
    }

    #[test]
    fn reopened_chapter_continues_its_group() {
        let corpus = parse_text("Genesis 1:1 a\nGenesis 2:1 b\nGenesis 1:2 c\n");
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.stats.reopened_chapters, 1);
        let chapter = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
        let texts: Vec<_> = chapter.verses.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }
}
