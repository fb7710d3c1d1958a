//! Semantic graph: role chains from chapter summaries
//!
//! Each summary is tagged, reduced to a chain of subject → verb →
//! object/modifier words, and folded into a graph where consecutive chain
//! words are linked and the last word links to the chapter node. Edge
//! weight is the number of chapters contributing the pair.

mod graph;
mod roles;
mod vocab;

pub use graph::{
    ChapterNode, GraphEdge, GraphMeta, NodeKey, SemanticGraph, SemanticGraphBuilder, WordNode,
};
pub use roles::{extract_chain, ChainLink, Role};
pub use vocab::{RoleVocabulary, WordSet, KNOWN_ENTITIES, SUBJECT_NOUNS};
