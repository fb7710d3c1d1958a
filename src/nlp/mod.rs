//! NLP capability boundary: lemmatization and part-of-speech tagging
//!
//! The pipeline never talks to a language model directly. It depends on two
//! traits, each called in bulk:
//! - `LemmaService`: surface words → lemmas
//! - `PosTagger`: sentences → tokens with lemma, POS tag and dependency label
//!
//! Two implementations:
//! - `ProcessNlpClient`: spawns a helper process and exchanges JSON lines (production)
//! - `MockNlp`: table-driven responses with call counters (testing)

mod mock;
mod process;

pub use mock::MockNlp;
pub use process::ProcessNlpClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors from NLP capability calls. Any of them aborts a build.
#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    #[error("NLP service not available: {0}")]
    Unavailable(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Universal POS tags the builders distinguish; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "PROPN")]
    ProperNoun,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "ADJ")]
    Adjective,
    #[serde(rename = "ADV")]
    Adverb,
    #[default]
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    pub fn is_noun_like(self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun)
    }

    pub fn is_modifier(self) -> bool {
        matches!(self, Self::Adjective | Self::Adverb)
    }
}

/// Dependency labels (ClearNLP style) used for role classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dependency {
    #[serde(rename = "nsubj")]
    NominalSubject,
    #[serde(rename = "nsubjpass")]
    PassiveSubject,
    #[serde(rename = "dobj")]
    DirectObject,
    #[serde(rename = "pobj")]
    PrepositionalObject,
    #[serde(rename = "attr")]
    Attribute,
    #[default]
    #[serde(other)]
    Other,
}

impl Dependency {
    pub fn is_subject(self) -> bool {
        matches!(self, Self::NominalSubject | Self::PassiveSubject)
    }

    /// Direct or prepositional object, or predicate attribute.
    pub fn is_object(self) -> bool {
        matches!(
            self,
            Self::DirectObject | Self::PrepositionalObject | Self::Attribute
        )
    }
}

/// One token of a tagged sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: PartOfSpeech,
    #[serde(default)]
    pub dep: Dependency,
}

impl TaggedToken {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: PartOfSpeech,
        dep: Dependency,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            dep,
        }
    }
}

/// Batched lemmatization.
#[async_trait]
pub trait LemmaService: Send + Sync {
    /// Check if the service is reachable.
    async fn is_available(&self) -> bool;

    /// Lemmatize a batch of words in one call.
    ///
    /// Returns exactly one lemma per input word, in input order.
    async fn lemmatize(&self, words: &[String]) -> Result<Vec<String>, NlpError>;
}

/// Batched part-of-speech and dependency tagging.
#[async_trait]
pub trait PosTagger: Send + Sync {
    /// Check if the tagger is reachable.
    async fn is_available(&self) -> bool;

    /// Tag a batch of short texts in one call; one token list per text.
    async fn tag(&self, texts: &[String]) -> Result<Vec<Vec<TaggedToken>>, NlpError>;
}
