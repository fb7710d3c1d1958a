//! Mock NLP configured for the fixture corpus and summaries

use versegraph::{Dependency, MockNlp, PartOfSpeech};

/// Lemmas and tags for every fixture word the assertions depend on.
pub fn fixture_nlp() -> MockNlp {
    MockNlp::available()
        .with_lemma("created", "create")
        .with_lemma("creates", "create")
        .with_lemma("heavens", "heaven")
        .with_lemma("formed", "form")
        .with_lemma("forms", "form")
        .with_lemma("planted", "plant")
        .with_lemma("plants", "plant")
        .with_lemma("loved", "love")
        .with_lemma("teaches", "teach")
        .with_lemma("raises", "raise")
        .with_tag("god", PartOfSpeech::ProperNoun, Dependency::NominalSubject)
        .with_tag("creates", PartOfSpeech::Verb, Dependency::Other)
        .with_tag("forms", PartOfSpeech::Verb, Dependency::Other)
        .with_tag("plants", PartOfSpeech::Verb, Dependency::Other)
        .with_tag("teaches", PartOfSpeech::Verb, Dependency::Other)
        .with_tag("raises", PartOfSpeech::Verb, Dependency::Other)
        .with_tag("heavens", PartOfSpeech::Noun, Dependency::DirectObject)
        .with_tag("earth", PartOfSpeech::Noun, Dependency::Other)
        .with_tag("life", PartOfSpeech::Noun, Dependency::Other)
        .with_tag("man", PartOfSpeech::Noun, Dependency::DirectObject)
        .with_tag("eden", PartOfSpeech::ProperNoun, Dependency::DirectObject)
        .with_tag("jesus", PartOfSpeech::ProperNoun, Dependency::NominalSubject)
        .with_tag("nicodemus", PartOfSpeech::ProperNoun, Dependency::DirectObject)
        .with_tag("rebirth", PartOfSpeech::Noun, Dependency::Other)
        .with_tag("moses", PartOfSpeech::ProperNoun, Dependency::NominalSubject)
        .with_tag("tabernacle", PartOfSpeech::Noun, Dependency::DirectObject)
}
