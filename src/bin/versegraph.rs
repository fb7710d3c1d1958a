//! versegraph CLI: build concordance, semantic graph and reader exports.
//!
//! Usage:
//!   versegraph build --corpus bible.txt --summaries summaries.json
//!       [--concordance-out path] [--graph-out path] [--chapters-out path]
//!   versegraph parse --corpus bible.txt

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use versegraph::{
    load_corpus, BuildConfig, BuildPipeline, BuildReport, BuildRequest, ProcessNlpClient,
};

#[derive(Parser)]
#[command(
    name = "versegraph",
    version,
    about = "Scripture concordance and semantic graph builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the derived outputs. Without any --*-out flag, all three are
    /// written to the current directory.
    Build {
        /// Corpus file (.txt line grammar or .json)
        #[arg(long)]
        corpus: PathBuf,
        /// Chapter summaries JSON (chapter key → summary)
        #[arg(long)]
        summaries: PathBuf,
        /// Concordance output path
        #[arg(long)]
        concordance_out: Option<PathBuf>,
        /// Semantic graph output path
        #[arg(long)]
        graph_out: Option<PathBuf>,
        /// Reader export output path
        #[arg(long)]
        chapters_out: Option<PathBuf>,
    },
    /// Parse a corpus and print parse statistics
    Parse {
        /// Corpus file (.txt line grammar or .json)
        #[arg(long)]
        corpus: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_request(
    corpus: PathBuf,
    summaries: PathBuf,
    concordance_out: Option<PathBuf>,
    graph_out: Option<PathBuf>,
    chapters_out: Option<PathBuf>,
) -> BuildRequest {
    let mut request = BuildRequest::new(corpus, summaries);
    if concordance_out.is_none() && graph_out.is_none() && chapters_out.is_none() {
        return request
            .concordance_to("concordance.json")
            .graph_to("network_data.json")
            .chapters_to("chapters.json");
    }
    request.concordance_out = concordance_out;
    request.graph_out = graph_out;
    request.chapters_out = chapters_out;
    request
}

fn print_report(report: &BuildReport) {
    println!(
        "{} chapters, {} verses, {} summaries",
        report.chapters, report.verses, report.summaries
    );
    if !report.top_lemmas.is_empty() {
        println!(
            "Concordance: {} lemmas ({} lemmatizer calls, {} words sent)",
            report.lemmas, report.resolver.service_calls, report.resolver.words_sent
        );
        print_ranked("Top lemmas (chapters)", &report.top_lemmas);
    }
    if report.graph_chapters > 0 {
        println!("Semantic graph: {} chapter nodes", report.graph_chapters);
        print_ranked("Top subjects", &report.top_subjects);
        print_ranked("Top verbs", &report.top_verbs);
    }
    for path in &report.written {
        println!("Wrote {}", path.display());
    }
}

fn print_ranked(title: &str, ranked: &[(String, usize)]) {
    println!("{}:", title);
    for (word, count) in ranked {
        println!("  {:<20} {:>6}", word, count);
    }
}

async fn cmd_build(config: BuildConfig, request: BuildRequest) -> i32 {
    let client = ProcessNlpClient::new(config.nlp.clone());
    let pipeline = BuildPipeline::new(config, &client, &client);
    match pipeline.run(&request).await {
        Ok(report) => {
            print_report(&report);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_parse(corpus: &Path) -> i32 {
    let parsed = match load_corpus(corpus) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!("{} chapters, {} verses", parsed.len(), parsed.verse_count());
    match serde_json::to_string_pretty(&parsed.stats) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let code = match cli.command {
        Commands::Build {
            corpus,
            summaries,
            concordance_out,
            graph_out,
            chapters_out,
        } => {
            let config = match BuildConfig::load_or_default(cli.config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let request =
                build_request(corpus, summaries, concordance_out, graph_out, chapters_out);
            cmd_build(config, request).await
        }
        Commands::Parse { corpus } => cmd_parse(&corpus),
    };
    std::process::exit(code);
}
