//! Role chains: subject → verb → object/modifier sequences from one summary

use super::vocab::RoleVocabulary;
use crate::lemma::LemmaCache;
use crate::nlp::{PartOfSpeech, TaggedToken};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Subject,
    Verb,
    Object,
    Modifier,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Subject, Role::Verb, Role::Object, Role::Modifier];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Verb => "verb",
            Role::Object => "object",
            Role::Modifier => "modifier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub word: String,
    pub role: Role,
}

impl ChainLink {
    fn new(word: String, role: Role) -> Self {
        Self { word, role }
    }
}

/// Classify the tokens of one summary into a role chain.
///
/// Three passes over the tokens (subjects, verbs, then objects and
/// modifiers); a word appears at most once. Verbs are represented by the
/// tagger's lemma, which is also recorded in `cache` for words it lacks. A
/// verb without a tagger lemma falls back to `cache`, then to its surface.
pub fn extract_chain(
    tokens: &[TaggedToken],
    vocab: &RoleVocabulary,
    cache: &mut LemmaCache,
) -> Vec<ChainLink> {
    let mut seen: HashSet<String> = HashSet::new();

    let mut subjects = Vec::new();
    for token in tokens {
        let word = token.text.to_lowercase();
        if vocab.entities.contains(&word) {
            if seen.insert(word.clone()) {
                subjects.push(ChainLink::new(word, Role::Subject));
            }
            continue;
        }
        let subject_like = token.dep.is_subject() || vocab.subject_nouns.contains(&word);
        if subject_like
            && token.pos.is_noun_like()
            && long_enough(&word, 2)
            && seen.insert(word.clone())
        {
            subjects.push(ChainLink::new(word, Role::Subject));
        }
    }

    let mut verbs = Vec::new();
    for token in tokens {
        let word = token.text.to_lowercase();
        if token.pos != PartOfSpeech::Verb || seen.contains(&word) || !long_enough(&word, 2) {
            continue;
        }
        let lemma = match token.lemma.trim() {
            "" => cache.get(&word).unwrap_or(word.as_str()).to_string(),
            tagged => {
                let tagged = tagged.to_lowercase();
                cache.insert_if_absent(&word, &tagged);
                tagged
            }
        };
        if seen.insert(lemma.clone()) {
            verbs.push(ChainLink::new(lemma, Role::Verb));
        }
    }

    let mut objects = Vec::new();
    for token in tokens {
        let word = token.text.to_lowercase();
        if seen.contains(&word) {
            continue;
        }
        let role = if token.dep.is_object() && token.pos.is_noun_like() {
            long_enough(&word, 2).then_some(Role::Object)
        } else if token.pos.is_modifier() {
            long_enough(&word, 3).then_some(Role::Modifier)
        } else if token.pos.is_noun_like() {
            long_enough(&word, 2).then_some(Role::Object)
        } else {
            None
        };
        if let Some(role) = role {
            seen.insert(word.clone());
            objects.push(ChainLink::new(word, role));
        }
    }

    if subjects.is_empty() {
        if let Some(first) = objects.first_mut() {
            first.role = Role::Subject;
        }
    }

    let mut chain = subjects;
    chain.extend(verbs);
    chain.extend(objects);
    chain
}

fn long_enough(word: &str, more_than: usize) -> bool {
    word.chars().count() > more_than
}
