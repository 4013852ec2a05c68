use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termindex_core::pipeline::{run, Stage};
use termindex_core::{DfMode, PipelineConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build TF-IDF statistics and inverted indexes over an HTML corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    opts: Opts,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-document statistics and both inverted indexes (default)
    Build,
    /// Per-document token and lemma TF-IDF files only
    Stats,
    /// Vocabulary and lemma inverted indexes only
    Index,
}

#[derive(Clone, Copy, ValueEnum)]
enum DfArg {
    Substring,
    Token,
}

#[derive(Args)]
struct Opts {
    /// JSON config file; flags below override its fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory of input documents
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Extension of input documents
    #[arg(long, global = true)]
    extension: Option<String>,
    /// Newline-delimited accepted terms
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,
    /// `<lemma> <form> ...` lines
    #[arg(long, global = true)]
    lemma_table: Option<PathBuf>,
    /// Newline-delimited stopwords
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,
    /// Precomputed `token<TAB>normal<TAB>tags<TAB>score` analyses
    #[arg(long, global = true)]
    analysis_table: Option<PathBuf>,
    /// Stemmer language
    #[arg(long, global = true)]
    language: Option<String>,
    /// Minimum analysis score for lemma grouping
    #[arg(long, global = true)]
    confidence: Option<f64>,
    /// Document frequency by substring containment or exact token membership
    #[arg(long, value_enum, global = true)]
    df_mode: Option<DfArg>,
    /// Output directory for token statistics
    #[arg(long, global = true)]
    tokens_out: Option<PathBuf>,
    /// Output directory for lemma statistics
    #[arg(long, global = true)]
    lemmas_out: Option<PathBuf>,
    /// Output file for the vocabulary inverted index
    #[arg(long, global = true)]
    index_out: Option<PathBuf>,
    /// Output file for the lemma inverted index
    #[arg(long, global = true)]
    lemma_index_out: Option<PathBuf>,
}

impl Opts {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(v) = self.input { cfg.input_dir = v; }
        if let Some(v) = self.extension { cfg.extension = v; }
        if let Some(v) = self.vocabulary { cfg.vocabulary = v; }
        if let Some(v) = self.lemma_table { cfg.lemma_table = v; }
        if let Some(v) = self.stopwords { cfg.stopwords = Some(v); }
        if let Some(v) = self.analysis_table { cfg.analysis_table = Some(v); }
        if let Some(v) = self.language { cfg.language = v; }
        if let Some(v) = self.confidence { cfg.confidence = v; }
        if let Some(v) = self.df_mode {
            cfg.df_mode = match v {
                DfArg::Substring => DfMode::Substring,
                DfArg::Token => DfMode::Token,
            };
        }
        if let Some(v) = self.tokens_out { cfg.tokens_out = v; }
        if let Some(v) = self.lemmas_out { cfg.lemmas_out = v; }
        if let Some(v) = self.index_out { cfg.index_out = v; }
        if let Some(v) = self.lemma_index_out { cfg.lemma_index_out = v; }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let stage = match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => Stage::All,
        Commands::Stats => Stage::Stats,
        Commands::Index => Stage::Index,
    };
    let cfg = cli.opts.into_config()?;
    tracing::debug!(config = %serde_json::to_string(&cfg).unwrap_or_default(), "effective config");

    let summary = run(&cfg, stage)?;
    tracing::info!(
        documents = summary.documents,
        token_lines = summary.token_lines,
        lemma_lines = summary.lemma_lines,
        index_terms = summary.index_terms,
        lemma_index_terms = summary.lemma_index_terms,
        clear_failures = summary.clear_failures.len(),
        "run complete"
    );
    Ok(())
}
