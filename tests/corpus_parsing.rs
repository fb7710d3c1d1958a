//! Corpus parsing across the supported line grammars
//!
//! Verse text must come through exactly as captured, chapters must group
//! consecutive lines in order, and leniency (continuation and orphaned
//! lines) must show up in the parse statistics.

mod common;

use common::{Workspace, HEADER_CORPUS, LEADING_CORPUS, TRAILING_CORPUS};
use versegraph::{load_corpus, parse_text, ChapterKey, IndexError};

#[test]
fn trailing_reference_text_is_preserved_exactly() {
    let corpus = parse_text(TRAILING_CORPUS);

    let keys: Vec<_> = corpus.chapters().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["Genesis 1", "Genesis 2", "John 3"]);

    let genesis = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
    assert_eq!(
        genesis.verses[0].text,
        "In the beginning God created the heavens and the earth."
    );
    assert_eq!(genesis.verses[0].verse, Some(1));
    assert_eq!(genesis.verses[1].verse, Some(2));
    assert_eq!(genesis.verses[1].reference(), "Genesis 1:2");

    assert_eq!(corpus.stats.trailing_references, 6);
    assert_eq!(corpus.stats.skipped_lines, 1);
    assert_eq!(corpus.stats.continuation_lines, 0);
}

#[test]
fn leading_references_absorb_continuation_lines() {
    let corpus = parse_text(LEADING_CORPUS);

    let psalm = corpus.get(&ChapterKey::from("Psalms 23")).unwrap();
    let texts: Vec<_> = psalm.verses.iter().map(|v| (v.verse, v.text.as_str())).collect();
    assert_eq!(
        texts,
        vec![
            (Some(1), "The LORD is my shepherd, I shall not want."),
            (Some(2), "He makes me lie down in green pastures;"),
            (None, "He leads me beside quiet waters."),
        ]
    );
    let ordinals: Vec<_> = psalm.verses.iter().map(|v| v.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);

    assert_eq!(corpus.stats.leading_references, 3);
    assert_eq!(corpus.stats.continuation_lines, 1);
    assert!(corpus.contains(&ChapterKey::from("Psalms 24")));
}

#[test]
fn chapter_headers_open_chapters_for_plain_text() {
    let corpus = parse_text(HEADER_CORPUS);

    let ruth1 = corpus.get(&ChapterKey::from("Ruth 1")).unwrap();
    assert_eq!(ruth1.verses.len(), 2);
    assert!(ruth1.verses.iter().all(|v| v.verse.is_none()));
    assert_eq!(corpus.get(&ChapterKey::from("Ruth 2")).unwrap().verses.len(), 1);
    assert_eq!(corpus.stats.chapter_headers, 2);
}

#[test]
fn text_before_any_chapter_is_dropped_and_counted() {
    let corpus = parse_text("THE HOLY BIBLE\nIn the beginning -- genesis 1:1\n");
    assert_eq!(corpus.verse_count(), 1);
    assert_eq!(corpus.stats.orphaned_lines, 1);
}

#[test]
fn returning_to_an_earlier_chapter_continues_its_group() {
    let corpus = parse_text(
        "first -- genesis 1:1\n\
         second -- genesis 2:1\n\
         third -- genesis 1:2\n",
    );
    let genesis1 = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
    let texts: Vec<_> = genesis1.verses.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "third"]);
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.stats.reopened_chapters, 1);
}

#[test]
fn multi_word_books_are_title_cased() {
    let corpus = parse_text(
        "I am the rose of Sharon -- song of solomon 2:1\n\
         Paul, an apostle -- 1 corinthians 1:1\n",
    );
    assert!(corpus.contains(&ChapterKey::from("Song Of Solomon 2")));
    assert!(corpus.contains(&ChapterKey::from("1 Corinthians 1")));
}

#[test]
fn load_corpus_reads_text_and_json_files() {
    let workspace = Workspace::standard();
    let corpus = load_corpus(&workspace.corpus).unwrap();
    assert_eq!(corpus.verse_count(), 6);

    let json_path = workspace.out("bible.json");
    std::fs::write(
        &json_path,
        r#"{"books": [{"name": "genesis", "chapters": [
              {"chapter": 1, "text": [{"verse": 1, "text": "In the beginning"}, "And the earth"]}
           ]}]}"#,
    )
    .unwrap();
    let corpus = load_corpus(&json_path).unwrap();
    let genesis = corpus.get(&ChapterKey::from("Genesis 1")).unwrap();
    assert_eq!(genesis.verses.len(), 2);
    assert_eq!(genesis.verses[0].verse, Some(1));

    std::fs::write(&json_path, r#"["not", "a", "corpus"]"#).unwrap();
    let err = load_corpus(&json_path).unwrap_err();
    assert!(matches!(err, IndexError::SchemaMismatch { .. }));
}
