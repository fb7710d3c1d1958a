//! versegraph: scripture concordance and semantic graph builder
//!
//! A batch pipeline that turns a raw scripture corpus plus short chapter
//! summaries into static JSON structures for a reader/visualizer.
//!
//! # Stages
//!
//! - **Corpus**: line-grammar scanner (or JSON loader) producing verses grouped by chapter
//! - **Lemmas**: batched, cached resolution through an external [`LemmaService`]
//! - **Concordance**: lemma → ranked chapters with context snippets
//! - **Semantic graph**: subject/verb/object chains from summaries, linked into chapter nodes
//! - **Reader export**: chapters in canonical order with prev/next navigation
//!
//! # Example
//!
//! ```
//! use versegraph::parse_text;
//!
//! let corpus = parse_text("In the beginning God created the heavens -- genesis 1:1\n");
//! assert_eq!(corpus.len(), 1);
//! assert_eq!(corpus.chapters()[0].key.as_str(), "Genesis 1");
//! ```

pub mod concordance;
pub mod config;
pub mod corpus;
mod error;
pub mod lemma;
pub mod nlp;
pub mod pipeline;
pub mod reader;
pub mod semantic;
mod summaries;

pub use concordance::{Concordance, ConcordanceBuilder, ConcordanceEntry, ConcordanceMeta};
pub use config::{BuildConfig, NlpConfig};
pub use corpus::{
    load_corpus, parse_json, parse_text, Chapter, ChapterKey, ParseStats, ParsedCorpus, VerseRecord,
};
pub use error::{IndexError, IndexResult};
pub use lemma::{LemmaCache, LemmaResolver, ResolverStats};
pub use nlp::{
    Dependency, LemmaService, MockNlp, NlpError, PartOfSpeech, PosTagger, ProcessNlpClient,
    TaggedToken,
};
pub use pipeline::{atomic_write, BuildPipeline, BuildReport, BuildRequest};
pub use reader::ReaderExport;
pub use semantic::{NodeKey, Role, RoleVocabulary, SemanticGraph, SemanticGraphBuilder};
pub use summaries::ChapterSummaries;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
