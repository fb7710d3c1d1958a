//! Weighted word/chapter graph built from role chains

use super::roles::{extract_chain, ChainLink, Role};
use super::vocab::RoleVocabulary;
use crate::config::BuildConfig;
use crate::corpus::ChapterKey;
use crate::error::IndexResult;
use crate::lemma::LemmaResolver;
use crate::nlp::{NlpError, PosTagger};
use crate::summaries::ChapterSummaries;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};

/// Node identity. Words and chapters live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Word(String),
    Chapter(ChapterKey),
}

impl NodeKey {
    pub fn id(&self) -> &str {
        match self {
            NodeKey::Word(word) => word,
            NodeKey::Chapter(key) => key.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordNode {
    pub word: String,
    /// Chapters whose chain contains the word
    pub count: usize,
    /// First chapters in processing order, capped
    pub chapters: Vec<ChapterKey>,
    role_counts: Vec<(Role, usize)>,
}

impl WordNode {
    fn new(word: String) -> Self {
        Self {
            word,
            count: 0,
            chapters: Vec::new(),
            role_counts: Vec::new(),
        }
    }

    fn observe(&mut self, role: Role, chapter: &ChapterKey, max_chapters: usize) {
        self.count += 1;
        if self.chapters.len() < max_chapters {
            self.chapters.push(chapter.clone());
        }
        match self.role_counts.iter_mut().find(|(r, _)| *r == role) {
            Some((_, n)) => *n += 1,
            None => self.role_counts.push((role, 1)),
        }
    }

    /// Most frequent role; the earliest seen wins a tie.
    pub fn role(&self) -> Role {
        let mut best: Option<(Role, usize)> = None;
        for &(role, n) in &self.role_counts {
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((role, n));
            }
        }
        best.map_or(Role::Object, |(role, _)| role)
    }
}

#[derive(Debug, Clone)]
pub struct ChapterNode {
    pub key: ChapterKey,
    pub summary: String,
    pub chain: Vec<String>,
}

impl ChapterNode {
    pub fn book(&self) -> &str {
        self.key.book()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMeta {
    pub subject_count: usize,
    pub verb_count: usize,
    pub object_count: usize,
    pub modifier_count: usize,
    pub chapter_count: usize,
    pub books: Vec<String>,
}

/// Word and chapter nodes plus weighted edges, all in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct SemanticGraph {
    words: Vec<WordNode>,
    word_index: HashMap<String, usize>,
    chapters: Vec<ChapterNode>,
    chapter_index: HashMap<ChapterKey, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(NodeKey, NodeKey), usize>,
    max_chapter_refs: usize,
}

impl SemanticGraph {
    pub fn new(max_chapter_refs: usize) -> Self {
        Self {
            max_chapter_refs,
            ..Self::default()
        }
    }

    /// Add one chapter's chain. Empty chains add nothing.
    pub fn add_chapter(&mut self, key: &ChapterKey, summary: &str, chain: &[ChainLink]) {
        let Some(last) = chain.last() else { return };

        for link in chain {
            let idx = match self.word_index.get(&link.word) {
                Some(&idx) => idx,
                None => {
                    self.words.push(WordNode::new(link.word.clone()));
                    self.word_index.insert(link.word.clone(), self.words.len() - 1);
                    self.words.len() - 1
                }
            };
            self.words[idx].observe(link.role, key, self.max_chapter_refs);
        }

        for pair in chain.windows(2) {
            self.bump_edge(
                NodeKey::Word(pair[0].word.clone()),
                NodeKey::Word(pair[1].word.clone()),
            );
        }
        self.bump_edge(NodeKey::Word(last.word.clone()), NodeKey::Chapter(key.clone()));

        match self.chapter_index.get(key) {
            Some(&idx) => {
                let node = &mut self.chapters[idx];
                node.summary = summary.to_string();
                node.chain = chain.iter().map(|l| l.word.clone()).collect();
            }
            None => {
                self.chapter_index.insert(key.clone(), self.chapters.len());
                self.chapters.push(ChapterNode {
                    key: key.clone(),
                    summary: summary.to_string(),
                    chain: chain.iter().map(|l| l.word.clone()).collect(),
                });
            }
        }
    }

    fn bump_edge(&mut self, source: NodeKey, target: NodeKey) {
        let pair = (source, target);
        match self.edge_index.get(&pair) {
            Some(&idx) => self.edges[idx].weight += 1,
            None => {
                self.edge_index.insert(pair.clone(), self.edges.len());
                self.edges.push(GraphEdge {
                    source: pair.0,
                    target: pair.1,
                    weight: 1,
                });
            }
        }
    }

    pub fn word(&self, word: &str) -> Option<&WordNode> {
        self.word_index.get(word).map(|&idx| &self.words[idx])
    }

    pub fn chapter(&self, key: &ChapterKey) -> Option<&ChapterNode> {
        self.chapter_index.get(key).map(|&idx| &self.chapters[idx])
    }

    pub fn words(&self) -> &[WordNode] {
        &self.words
    }

    pub fn chapters(&self) -> &[ChapterNode] {
        &self.chapters
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge_weight(&self, source: &NodeKey, target: &NodeKey) -> usize {
        self.edge_index
            .get(&(source.clone(), target.clone()))
            .map_or(0, |&idx| self.edges[idx].weight)
    }

    /// Sum of weights on edges ending at chapter nodes.
    pub fn terminal_weight(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| matches!(e.target, NodeKey::Chapter(_)))
            .map(|e| e.weight)
            .sum()
    }

    /// Word nodes of `role` by chapter count, ties in first-seen order.
    pub fn top_words(&self, role: Role, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .words
            .iter()
            .filter(|w| w.role() == role)
            .map(|w| (w.word.as_str(), w.count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn meta(&self) -> GraphMeta {
        let count = |role: Role| self.words.iter().filter(|w| w.role() == role).count();
        let books: BTreeSet<&str> = self.chapters.iter().map(ChapterNode::book).collect();
        GraphMeta {
            subject_count: count(Role::Subject),
            verb_count: count(Role::Verb),
            object_count: count(Role::Object),
            modifier_count: count(Role::Modifier),
            chapter_count: self.chapters.len(),
            books: books.into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeRecord<'g> {
    Word {
        id: &'g str,
        role: Role,
        count: usize,
        chapters: &'g [ChapterKey],
    },
    Chapter {
        id: &'g str,
        count: usize,
        summary: &'g str,
        book: &'g str,
        chain: &'g [String],
    },
}

#[derive(Serialize)]
struct LinkRecord<'g> {
    source: &'g str,
    target: &'g str,
    weight: usize,
}

#[derive(Serialize)]
struct GraphDocument<'g> {
    nodes: Vec<NodeRecord<'g>>,
    links: Vec<LinkRecord<'g>>,
    meta: GraphMeta,
}

impl Serialize for SemanticGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let words = self.words.iter().map(|w| NodeRecord::Word {
            id: &w.word,
            role: w.role(),
            count: w.count,
            chapters: &w.chapters,
        });
        let chapters = self.chapters.iter().map(|c| NodeRecord::Chapter {
            id: c.key.as_str(),
            count: 1,
            summary: &c.summary,
            book: c.book(),
            chain: &c.chain,
        });
        GraphDocument {
            nodes: words.chain(chapters).collect(),
            links: self
                .edges
                .iter()
                .map(|e| LinkRecord {
                    source: e.source.id(),
                    target: e.target.id(),
                    weight: e.weight,
                })
                .collect(),
            meta: self.meta(),
        }
        .serialize(serializer)
    }
}

/// Builds a [`SemanticGraph`] from chapter summaries.
#[derive(Debug, Clone)]
pub struct SemanticGraphBuilder {
    vocab: RoleVocabulary,
    max_chapter_refs: usize,
}

impl Default for SemanticGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticGraphBuilder {
    pub fn new() -> Self {
        Self {
            vocab: RoleVocabulary::default(),
            max_chapter_refs: 30,
        }
    }

    /// Loads curated word lists named in the config.
    pub fn from_config(config: &BuildConfig) -> IndexResult<Self> {
        Ok(Self {
            vocab: RoleVocabulary::load(
                config.entities_file.as_deref(),
                config.subject_words_file.as_deref(),
            )?,
            max_chapter_refs: config.max_chapter_refs,
        })
    }

    pub fn with_vocabulary(mut self, vocab: RoleVocabulary) -> Self {
        self.vocab = vocab;
        self
    }

    pub fn with_max_chapter_refs(mut self, max: usize) -> Self {
        self.max_chapter_refs = max;
        self
    }

    /// Tag every summary in one call, then fold the chains in file order.
    pub async fn build(
        &self,
        summaries: &ChapterSummaries,
        tagger: &dyn PosTagger,
        resolver: &mut LemmaResolver<'_>,
    ) -> Result<SemanticGraph, NlpError> {
        let mut graph = SemanticGraph::new(self.max_chapter_refs);
        if summaries.is_empty() {
            return Ok(graph);
        }

        let texts: Vec<String> = summaries.iter().map(|(_, s)| s.to_string()).collect();
        tracing::info!(summaries = texts.len(), "tagging summaries");
        let docs = tagger.tag(&texts).await?;
        if docs.len() != texts.len() {
            return Err(NlpError::ParseError(format!(
                "tagged {} summaries, expected {}",
                docs.len(),
                texts.len()
            )));
        }

        let mut empty_chains = 0usize;
        for ((key, summary), tokens) in summaries.iter().zip(&docs) {
            let chain = extract_chain(tokens, &self.vocab, resolver.cache_mut());
            if chain.is_empty() {
                empty_chains += 1;
                tracing::debug!(chapter = %key, "summary yielded no role chain");
                continue;
            }
            graph.add_chapter(key, summary, &chain);
        }

        let meta = graph.meta();
        tracing::info!(
            subjects = meta.subject_count,
            verbs = meta.verb_count,
            objects = meta.object_count,
            modifiers = meta.modifier_count,
            chapters = meta.chapter_count,
            links = graph.edges().len(),
            skipped = empty_chains,
            "semantic graph built"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Dependency, MockNlp, PartOfSpeech};

    fn link(word: &str, role: Role) -> ChainLink {
        ChainLink {
            word: word.to_string(),
            role,
        }
    }

    fn genesis_mock() -> MockNlp {
        MockNlp::available()
            .with_tag("creates", PartOfSpeech::Verb, Dependency::Other)
            .with_lemma("creates", "create")
            .with_tag("heavens", PartOfSpeech::Noun, Dependency::DirectObject)
            .with_tag("earth", PartOfSpeech::Noun, Dependency::Other)
            .with_tag("life", PartOfSpeech::Noun, Dependency::Other)
            .with_tag("god", PartOfSpeech::ProperNoun, Dependency::NominalSubject)
    }

    #[tokio::test]
    async fn genesis_summary_builds_chain_and_edges() {
        let summaries: ChapterSummaries =
            [("Genesis 1", "God creates heavens, earth, life")].into_iter().collect();
        let mock = genesis_mock();
        let mut resolver = LemmaResolver::new(&mock);

        let graph = SemanticGraphBuilder::new()
            .build(&summaries, &mock, &mut resolver)
            .await
            .unwrap();

        let genesis = ChapterKey::from("Genesis 1");
        let chapter = graph.chapter(&genesis).unwrap();
        assert_eq!(chapter.chain, vec!["god", "create", "heavens", "earth", "life"]);
        assert_eq!(chapter.book(), "Genesis");

        let word = |w: &str| NodeKey::Word(w.to_string());
        assert_eq!(graph.edge_weight(&word("god"), &word("create")), 1);
        assert_eq!(graph.edge_weight(&word("earth"), &word("life")), 1);
        assert_eq!(graph.edge_weight(&word("life"), &NodeKey::Chapter(genesis.clone())), 1);
        assert_eq!(graph.edges().len(), 5);

        assert_eq!(graph.word("god").unwrap().role(), Role::Subject);
        assert_eq!(graph.word("create").unwrap().role(), Role::Verb);
        assert_eq!(graph.word("life").unwrap().role(), Role::Object);
        assert_eq!(mock.tag_calls(), 1);
        assert_eq!(resolver.cache().get("creates"), Some("create"));
    }

    #[tokio::test]
    async fn terminal_weight_counts_chapters_with_chains() {
        let summaries: ChapterSummaries = [
            ("Genesis 1", "God creates heavens, earth, life"),
            ("Genesis 2", "God rests"),
            ("Genesis 3", "of it"),
            ("Exodus 1", "Israel multiplies in Egypt"),
        ]
        .into_iter()
        .collect();
        let mock = genesis_mock()
            .with_tag("rests", PartOfSpeech::Verb, Dependency::Other)
            .with_tag("multiplies", PartOfSpeech::Verb, Dependency::Other);
        let mut resolver = LemmaResolver::new(&mock);

        let graph = SemanticGraphBuilder::new()
            .build(&summaries, &mock, &mut resolver)
            .await
            .unwrap();

        assert_eq!(graph.chapters().len(), 3);
        assert_eq!(graph.terminal_weight(), 3);
        assert_eq!(graph.word("god").unwrap().count, 2);
        assert!(graph.chapter(&ChapterKey::from("Genesis 3")).is_none());

        let meta = graph.meta();
        assert_eq!(meta.books, vec!["Exodus", "Genesis"]);
        assert_eq!(meta.chapter_count, 3);
    }

    #[test]
    fn majority_role_with_first_seen_tie_break() {
        let mut graph = SemanticGraph::new(30);
        graph.add_chapter(&ChapterKey::from("Psalms 1"), "", &[link("light", Role::Object)]);
        graph.add_chapter(&ChapterKey::from("Psalms 2"), "", &[link("light", Role::Subject)]);
        assert_eq!(graph.word("light").unwrap().role(), Role::Object);

        graph.add_chapter(&ChapterKey::from("Psalms 3"), "", &[link("light", Role::Subject)]);
        assert_eq!(graph.word("light").unwrap().role(), Role::Subject);
        assert_eq!(graph.word("light").unwrap().count, 3);
    }

    #[test]
    fn chapter_references_are_capped_but_counted() {
        let mut graph = SemanticGraph::new(2);
        for n in 1..=4 {
            graph.add_chapter(&ChapterKey::new("Psalms", n), "", &[link("praise", Role::Verb)]);
        }
        let node = graph.word("praise").unwrap();
        assert_eq!(node.count, 4);
        assert_eq!(node.chapters.len(), 2);
        assert_eq!(graph.terminal_weight(), 4);
    }

    #[test]
    fn serializes_nodes_links_and_meta() {
        let mut graph = SemanticGraph::new(30);
        graph.add_chapter(
            &ChapterKey::from("Ruth 1"),
            "Ruth follows Naomi",
            &[link("ruth", Role::Subject), link("follow", Role::Verb)],
        );

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["id"], "ruth");
        assert_eq!(json["nodes"][0]["type"], "word");
        assert_eq!(json["nodes"][0]["role"], "subject");
        assert_eq!(json["nodes"][0]["chapters"][0], "Ruth 1");
        assert_eq!(json["nodes"][2]["type"], "chapter");
        assert_eq!(json["nodes"][2]["chain"][1], "follow");
        assert_eq!(json["links"][1]["source"], "follow");
        assert_eq!(json["links"][1]["target"], "Ruth 1");
        assert_eq!(json["meta"]["subjectCount"], 1);
        assert_eq!(json["meta"]["verbCount"], 1);
        assert_eq!(json["meta"]["books"][0], "Ruth");
    }

    #[test]
    fn top_words_rank_within_role() {
        let mut graph = SemanticGraph::new(30);
        graph.add_chapter(&ChapterKey::from("John 1"), "", &[link("word", Role::Subject)]);
        graph.add_chapter(&ChapterKey::from("John 2"), "", &[link("jesus", Role::Subject)]);
        graph.add_chapter(&ChapterKey::from("John 3"), "", &[link("jesus", Role::Subject)]);
        graph.add_chapter(&ChapterKey::from("John 4"), "", &[link("water", Role::Object)]);

        assert_eq!(graph.top_words(Role::Subject, 5), vec![("jesus", 2), ("word", 1)]);
        assert_eq!(graph.top_words(Role::Object, 5), vec![("water", 1)]);
    }
}
