//! Build pipeline: load inputs, build every requested structure, then write
//!
//! Nothing is written until all requested structures have been built. Every
//! output is then staged as a synced temporary sibling, and only once all of
//! them are staged are they renamed into place, so a failed run leaves
//! previous outputs untouched.

use crate::concordance::{Concordance, ConcordanceBuilder};
use crate::config::BuildConfig;
use crate::corpus::{load_corpus, ParseStats, ParsedCorpus};
use crate::error::{IndexError, IndexResult};
use crate::lemma::{LemmaResolver, ResolverStats};
use crate::nlp::{LemmaService, NlpError, PosTagger};
use crate::reader::ReaderExport;
use crate::semantic::{Role, SemanticGraph, SemanticGraphBuilder};
use crate::summaries::ChapterSummaries;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const REPORT_TOP_N: usize = 20;

/// Inputs and requested outputs of one run.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub corpus: PathBuf,
    pub summaries: PathBuf,
    pub concordance_out: Option<PathBuf>,
    pub graph_out: Option<PathBuf>,
    pub chapters_out: Option<PathBuf>,
}

impl BuildRequest {
    pub fn new(corpus: impl Into<PathBuf>, summaries: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            summaries: summaries.into(),
            ..Self::default()
        }
    }

    pub fn concordance_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.concordance_out = Some(path.into());
        self
    }

    pub fn graph_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.graph_out = Some(path.into());
        self
    }

    pub fn chapters_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.chapters_out = Some(path.into());
        self
    }

    fn needs_lemmas(&self) -> bool {
        self.concordance_out.is_some()
    }

    fn needs_tagger(&self) -> bool {
        self.graph_out.is_some()
    }
}

/// End-of-build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub parse_stats: ParseStats,
    pub chapters: usize,
    pub verses: usize,
    pub summaries: usize,
    pub lemmas: usize,
    pub graph_chapters: usize,
    pub resolver: ResolverStats,
    pub top_lemmas: Vec<(String, usize)>,
    pub top_subjects: Vec<(String, usize)>,
    pub top_verbs: Vec<(String, usize)>,
    pub written: Vec<PathBuf>,
}

/// Runs a build against injected NLP capabilities.
pub struct BuildPipeline<'a> {
    config: BuildConfig,
    lemmas: &'a dyn LemmaService,
    tagger: &'a dyn PosTagger,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        config: BuildConfig,
        lemmas: &'a dyn LemmaService,
        tagger: &'a dyn PosTagger,
    ) -> Self {
        Self { config, lemmas, tagger }
    }

    pub async fn run(&self, request: &BuildRequest) -> IndexResult<BuildReport> {
        let corpus = load_corpus(&request.corpus)?;
        let summaries = ChapterSummaries::load(&request.summaries)?;
        // curated lists load before any NLP traffic
        let graph_builder = SemanticGraphBuilder::from_config(&self.config)?;
        self.ensure_available(request).await?;
        warn_unmatched_summaries(&corpus, &summaries);

        let mut resolver = LemmaResolver::new(self.lemmas);
        let mut report = BuildReport {
            parse_stats: corpus.stats.clone(),
            chapters: corpus.len(),
            verses: corpus.verse_count(),
            summaries: summaries.len(),
            ..BuildReport::default()
        };

        let mut outputs: Vec<(&Path, String)> = Vec::new();

        if let Some(path) = &request.concordance_out {
            let concordance = ConcordanceBuilder::from_config(&self.config)
                .build(&corpus, &summaries, &mut resolver)
                .await?;
            record_concordance(&mut report, &concordance);
            outputs.push((path.as_path(), serde_json::to_string(&concordance)?));
        }

        if let Some(path) = &request.graph_out {
            let graph = graph_builder.build(&summaries, self.tagger, &mut resolver).await?;
            record_graph(&mut report, &graph);
            outputs.push((path.as_path(), serde_json::to_string(&graph)?));
        }

        if let Some(path) = &request.chapters_out {
            let export = ReaderExport::build(&corpus, &summaries);
            outputs.push((path.as_path(), export.to_json()?));
        }

        report.resolver = resolver.stats();

        write_outputs(&outputs)?;
        for (path, content) in &outputs {
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
            report.written.push(path.to_path_buf());
        }

        tracing::info!(
            chapters = report.chapters,
            verses = report.verses,
            lemmas = report.lemmas,
            graph_chapters = report.graph_chapters,
            lemma_calls = report.resolver.service_calls,
            "build complete"
        );
        Ok(report)
    }

    async fn ensure_available(&self, request: &BuildRequest) -> IndexResult<()> {
        if request.needs_lemmas() && !self.lemmas.is_available().await {
            let reason = "lemmatization service is not reachable".to_string();
            return Err(NlpError::Unavailable(reason).into());
        }
        if request.needs_tagger() && !self.tagger.is_available().await {
            let reason = "part-of-speech tagger is not reachable".to_string();
            return Err(NlpError::Unavailable(reason).into());
        }
        Ok(())
    }
}

fn warn_unmatched_summaries(corpus: &ParsedCorpus, summaries: &ChapterSummaries) {
    let unmatched: Vec<&str> = summaries
        .iter()
        .filter(|(key, _)| !corpus.contains(key))
        .map(|(key, _)| key.as_str())
        .collect();
    if !unmatched.is_empty() {
        tracing::warn!(
            count = unmatched.len(),
            first = unmatched[0],
            "summaries reference chapters missing from the corpus"
        );
    }
}

fn record_concordance(report: &mut BuildReport, concordance: &Concordance) {
    report.lemmas = concordance.len();
    report.top_lemmas = owned(concordance.top_lemmas(REPORT_TOP_N));
}

fn record_graph(report: &mut BuildReport, graph: &SemanticGraph) {
    report.graph_chapters = graph.chapters().len();
    report.top_subjects = owned(graph.top_words(Role::Subject, REPORT_TOP_N));
    report.top_verbs = owned(graph.top_words(Role::Verb, REPORT_TOP_N));
}

fn owned(ranked: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    ranked.into_iter().map(|(w, n)| (w.to_string(), n)).collect()
}

/// Write `content` to `path` via a synced temporary file and a rename.
pub fn atomic_write(path: &Path, content: &str) -> IndexResult<()> {
    write_outputs(&[(path, content.to_string())])
}

/// Stage every output, then rename them all into place. A staging failure
/// removes the temporaries already written and leaves every target as it was.
fn write_outputs(outputs: &[(&Path, String)]) -> IndexResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for (path, content) in outputs {
        match stage(path, content) {
            Ok(temp_path) => staged.push((temp_path, *path)),
            Err(e) => {
                discard(&staged);
                return Err(IndexError::Io(e));
            }
        }
    }

    for (i, (temp_path, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(temp_path, path) {
            discard(&staged[i..]);
            return Err(IndexError::Io(e));
        }
    }
    Ok(())
}

fn stage(path: &Path, content: &str) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    })();

    match result {
        Ok(()) => Ok(temp_path),
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (temp_path, _) in staged {
        let _ = fs::remove_file(temp_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("concordance.json");

        atomic_write(&path, "{\"a\":1}").unwrap();
        atomic_write(&path, "{\"a\":2}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":2}");
        assert!(!dir.path().join("out").join("concordance.json.tmp").exists());
    }

    #[test]
    fn failed_output_leaves_earlier_outputs_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let concordance = dir.path().join("concordance.json");
        fs::write(&concordance, "old").unwrap();
        // a regular file where the graph's parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let graph = blocker.join("network_data.json");

        let result = write_outputs(&[
            (concordance.as_path(), "new".to_string()),
            (graph.as_path(), "{}".to_string()),
        ]);

        assert!(matches!(result, Err(IndexError::Io(_))));
        assert_eq!(fs::read_to_string(&concordance).unwrap(), "old");
        assert!(!dir.path().join("concordance.json.tmp").exists());
        assert!(!graph.exists());
    }

    #[test]
    fn request_builder_sets_outputs() {
        let request = BuildRequest::new("bible.txt", "summaries.json")
            .concordance_to("c.json")
            .chapters_to("ch.json");
        assert!(request.needs_lemmas());
        assert!(!request.needs_tagger());
        assert_eq!(request.chapters_out, Some(PathBuf::from("ch.json")));
    }
}
