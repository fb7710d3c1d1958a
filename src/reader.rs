//! Reader export: full chapter text in canonical order with prev/next links

use crate::corpus::books::{canonical_rank, CANONICAL_BOOKS};
use crate::corpus::{Chapter, ChapterKey, ParsedCorpus};
use crate::summaries::ChapterSummaries;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct ReaderVerse {
    pub verse: Option<u32>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReaderChapter {
    pub book: String,
    pub chapter: u32,
    pub summary: String,
    pub verses: Vec<ReaderVerse>,
    pub prev: Option<ChapterKey>,
    pub next: Option<ChapterKey>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderMeta {
    pub total_chapters: usize,
    pub books: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReaderExport {
    pub meta: ReaderMeta,
    pub order: Vec<ChapterKey>,
    pub chapters: HashMap<ChapterKey, ReaderChapter>,
}

impl ReaderExport {
    /// Chapters sorted by canonical book, then chapter number. Books outside
    /// the canon follow in the order they were first encountered.
    pub fn build(corpus: &ParsedCorpus, summaries: &ChapterSummaries) -> Self {
        let mut encounter: HashMap<&str, usize> = HashMap::new();
        for chapter in corpus.chapters() {
            let next = encounter.len();
            encounter.entry(chapter.book.as_str()).or_insert(next);
        }

        let mut ordered: Vec<&Chapter> = corpus.chapters().iter().collect();
        ordered.sort_by_key(|c| {
            let book_rank = match canonical_rank(&c.book) {
                Some(rank) => (0, rank),
                None => (1, encounter.get(c.book.as_str()).copied().unwrap_or(usize::MAX)),
            };
            (book_rank, c.number)
        });

        let order: Vec<ChapterKey> = ordered.iter().map(|c| c.key.clone()).collect();
        let mut chapters = HashMap::with_capacity(order.len());
        for (i, chapter) in ordered.iter().enumerate() {
            chapters.insert(
                chapter.key.clone(),
                ReaderChapter {
                    book: chapter.book.clone(),
                    chapter: chapter.number,
                    summary: summaries.get(&chapter.key).unwrap_or_default().to_string(),
                    verses: chapter
                        .verses
                        .iter()
                        .map(|v| ReaderVerse {
                            verse: v.verse,
                            text: v.text.clone(),
                        })
                        .collect(),
                    prev: i.checked_sub(1).map(|p| order[p].clone()),
                    next: order.get(i + 1).cloned(),
                },
            );
        }

        tracing::info!(chapters = order.len(), "reader export built");
        Self {
            meta: ReaderMeta {
                total_chapters: order.len(),
                books: CANONICAL_BOOKS.iter().map(|b| b.to_string()).collect(),
            },
            order,
            chapters,
        }
    }

    /// Serialize with chapters listed in reading order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut chapters = serde_json::Map::new();
        for key in &self.order {
            if let Some(chapter) = self.chapters.get(key) {
                chapters.insert(key.to_string(), serde_json::to_value(chapter)?);
            }
        }
        serde_json::to_string(&serde_json::json!({
            "meta": self.meta,
            "order": self.order,
            "chapters": chapters,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_text;

    fn corpus() -> ParsedCorpus {
        parse_text(
            "In the beginning was the Word -- john 1:1\n\
             Now there was a man of the Pharisees -- john 3:1\n\
             In the beginning God created -- genesis 1:1\n\
             The book of the genealogy -- matthew 1:1\n\
             And the earth was formless -- genesis 1:2\n",
        )
    }

    #[test]
    fn orders_canonically_with_navigation() {
        let summaries: ChapterSummaries = [("Genesis 1", "Creation")].into_iter().collect();
        let export = ReaderExport::build(&corpus(), &summaries);

        let order: Vec<_> = export.order.iter().map(ChapterKey::as_str).collect();
        assert_eq!(order, vec!["Genesis 1", "Matthew 1", "John 1", "John 3"]);

        let genesis = &export.chapters[&ChapterKey::from("Genesis 1")];
        assert_eq!(genesis.summary, "Creation");
        assert_eq!(genesis.verses.len(), 2);
        assert_eq!(genesis.prev, None);
        assert_eq!(genesis.next, Some(ChapterKey::from("Matthew 1")));

        let john3 = &export.chapters[&ChapterKey::from("John 3")];
        assert_eq!(john3.summary, "");
        assert_eq!(john3.prev, Some(ChapterKey::from("John 1")));
        assert_eq!(john3.next, None);

        assert_eq!(export.meta.total_chapters, 4);
        assert_eq!(export.meta.books.len(), 66);
    }

    #[test]
    fn unknown_books_follow_the_canon() {
        let corpus = parse_text(
            "Blessed is the man -- tobit 2:1\n\
             In the beginning -- genesis 1:1\n\
             And he said -- tobit 1:1\n",
        );
        let export = ReaderExport::build(&corpus, &ChapterSummaries::new());
        let order: Vec<_> = export.order.iter().map(ChapterKey::as_str).collect();
        assert_eq!(order, vec!["Genesis 1", "Tobit 1", "Tobit 2"]);
    }

    #[test]
    fn json_lists_chapters_in_reading_order() {
        let export = ReaderExport::build(&corpus(), &ChapterSummaries::new());
        let json = export.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value["chapters"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Genesis 1", "Matthew 1", "John 1", "John 3"]);
        assert_eq!(value["meta"]["totalChapters"], 4);
        assert_eq!(value["chapters"]["John 1"]["verses"][0]["verse"], 1);
    }
}
