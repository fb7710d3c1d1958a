//! JSON corpus input
//!
//! Two shapes are accepted:
//!
//! ```json
//! {"books": [{"name": "Genesis", "chapters": [{"chapter": 1, "text": "..."}]}]}
//! {"Genesis 1": "In the beginning ...", "Genesis 2": "..."}
//! ```
//!
//! In the nested form a chapter's `text` (or `content`) is either one string
//! or a list of verses, each a string or `{"verse": n, "text": "..."}`.

use super::books::title_case;
use super::types::{ChapterKey, ParsedCorpus};
use crate::error::{IndexError, IndexResult};
use serde_json::{Map, Value};

/// Parse a JSON corpus document.
pub fn parse_json(content: &str, source_name: &str) -> IndexResult<ParsedCorpus> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| IndexError::schema_mismatch(source_name, format!("invalid JSON: {}", e)))?;

    let root = value
        .as_object()
        .ok_or_else(|| IndexError::schema_mismatch(source_name, "corpus root must be an object"))?;

    let mut corpus = ParsedCorpus::new();
    match root.get("books") {
        Some(books) => parse_books(books, source_name, &mut corpus)?,
        None => parse_flat(root, source_name, &mut corpus)?,
    }
    Ok(corpus)
}

fn parse_books(books: &Value, source_name: &str, corpus: &mut ParsedCorpus) -> IndexResult<()> {
    let books = books
        .as_array()
        .ok_or_else(|| IndexError::schema_mismatch(source_name, "`books` must be an array"))?;

    for book in books {
        let name = book
            .get("name")
            .or_else(|| book.get("book"))
            .and_then(Value::as_str)
            .ok_or_else(|| IndexError::schema_mismatch(source_name, "book without a name"))?;
        let name = title_case(name.trim());

        let chapters = book
            .get("chapters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for chapter in chapters {
            let number = chapter
                .get("chapter")
                .or_else(|| chapter.get("number"))
                .and_then(as_number)
                .ok_or_else(|| {
                    IndexError::schema_mismatch(
                        source_name,
                        format!("chapter of {} without a number", name),
                    )
                })?;
            let content = chapter.get("text").or_else(|| chapter.get("content"));
            let verses = chapter_verses(content, source_name, &name, number)?;
            if corpus.extend_chapter(&name, number, verses) {
                corpus.stats.reopened_chapters += 1;
            }
        }
    }
    Ok(())
}

fn parse_flat(
    root: &Map<String, Value>,
    source_name: &str,
    corpus: &mut ParsedCorpus,
) -> IndexResult<()> {
    for (key, text) in root {
        let text = text.as_str().ok_or_else(|| {
            IndexError::schema_mismatch(source_name, format!("value for `{}` is not a string", key))
        })?;
        let key = ChapterKey::from(key.as_str());
        let number = key.number().ok_or_else(|| {
            IndexError::schema_mismatch(source_name, format!("`{}` is not a chapter key", key))
        })?;
        let book = title_case(key.book());
        if corpus.extend_chapter(&book, number, vec![(None, text.to_string())]) {
            corpus.stats.reopened_chapters += 1;
        }
    }
    Ok(())
}

fn chapter_verses(
    content: Option<&Value>,
    source_name: &str,
    book: &str,
    number: u32,
) -> IndexResult<Vec<(Option<u32>, String)>> {
    let mismatch = || {
        IndexError::schema_mismatch(
            source_name,
            format!("unsupported verse content in {} {}", book, number),
        )
    };

    match content {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(vec![(None, text.clone())]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok((None, text.clone())),
                Value::Object(obj) => {
                    let text = obj.get("text").and_then(Value::as_str).ok_or_else(mismatch)?;
                    Ok((obj.get("verse").and_then(as_number), text.to_string()))
                }
                _ => Err(mismatch()),
            })
            .collect(),
        Some(_) => Err(mismatch()),
    }
}

/// Accept numbers given either as JSON numbers or numeric strings.
fn as_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
