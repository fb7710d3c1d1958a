//! Common fixtures for versegraph integration tests
//!
//! Provides small corpora in each supported line grammar, a summaries file,
//! and a mock NLP client primed for them.

#![allow(dead_code, unused_imports)]

pub mod corpus;
pub mod mock_nlp;

pub use corpus::{Workspace, HEADER_CORPUS, LEADING_CORPUS, SUMMARIES_JSON, TRAILING_CORPUS};
pub use mock_nlp::fixture_nlp;
