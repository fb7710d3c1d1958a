//! Corpus loading: plain-text line grammars and JSON corpora

pub mod books;
mod json;
mod scanner;
mod types;

pub use json::parse_json;
pub use scanner::{classify_line, parse_text, CorpusScanner, LineShape};
pub use types::{Chapter, ChapterKey, ParseStats, ParsedCorpus, VerseRecord};

use crate::error::{IndexError, IndexResult};
use std::path::Path;

/// Load a corpus file, choosing the reader by extension (`.json` or text).
pub fn load_corpus(path: &Path) -> IndexResult<ParsedCorpus> {
    if !path.exists() {
        return Err(IndexError::InputNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let corpus = if is_json {
        parse_json(&content, &path.display().to_string())?
    } else {
        parse_text(&content)
    };

    let stats = &corpus.stats;
    tracing::info!(
        path = %path.display(),
        chapters = corpus.len(),
        verses = corpus.verse_count(),
        "corpus loaded"
    );
    if stats.continuation_lines > 0 || stats.orphaned_lines > 0 {
        tracing::warn!(
            continuation = stats.continuation_lines,
            orphaned = stats.orphaned_lines,
            "unrecognized lines absorbed leniently; check chapter attribution"
        );
    }
    Ok(corpus)
}
