//! End-to-end batch run: load resources, clear outputs, load the corpus,
//! score every document, build both inverted indexes, write everything.

use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::extract::HtmlTextExtractor;
use crate::filter::{default_stopwords, load_stopwords, TokenFilter};
use crate::inverted::{InvertedIndex, Vocabulary};
use crate::lemma::LemmaTable;
use crate::morph::{LookupAnalyzer, MorphAnalyzer, StemmingAnalyzer};
use crate::output::{clear_directory, write_document_stats, write_inverted_index};
use crate::stats::StatisticsEngine;
use crate::tokenizer::{lowercase_words, WordPunctTokenizer};

/// Which outputs a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    All,
    /// Per-document TF-IDF files only.
    Stats,
    /// Inverted index files only.
    Index,
}

impl Stage {
    fn stats(self) -> bool {
        matches!(self, Stage::All | Stage::Stats)
    }

    fn index(self) -> bool {
        matches!(self, Stage::All | Stage::Index)
    }
}

/// Read-only inputs loaded before any output is touched.
pub struct Resources {
    pub vocabulary: Vocabulary,
    pub lemma_table: LemmaTable,
    pub filter: TokenFilter,
    pub analyzer: Box<dyn MorphAnalyzer>,
}

impl Resources {
    pub fn load(cfg: &PipelineConfig) -> Result<Self> {
        let vocabulary = Vocabulary::from_file(&cfg.vocabulary)?;
        let lemma_table = LemmaTable::from_file(&cfg.lemma_table)?;
        let stopwords = match &cfg.stopwords {
            Some(path) => load_stopwords(path)?,
            None => default_stopwords(&cfg.language),
        };
        let filter = TokenFilter::new(stopwords, cfg.tag_blacklist.iter().cloned());
        let stemmer = StemmingAnalyzer::new(&cfg.language)?;
        let analyzer: Box<dyn MorphAnalyzer> = match &cfg.analysis_table {
            Some(path) => Box::new(LookupAnalyzer::from_file(path, stemmer)?),
            None => Box::new(stemmer),
        };
        tracing::info!(
            vocabulary = vocabulary.len(),
            lemmas = lemma_table.len(),
            "loaded resources"
        );
        Ok(Self { vocabulary, lemma_table, filter, analyzer })
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub documents: usize,
    pub token_lines: usize,
    pub lemma_lines: usize,
    pub index_terms: usize,
    pub lemma_index_terms: usize,
    /// Non-fatal failures hit while clearing output directories.
    pub clear_failures: Vec<Error>,
}

pub fn run(cfg: &PipelineConfig, stage: Stage) -> Result<RunSummary> {
    let resources = Resources::load(cfg)?;
    let mut summary = RunSummary::default();

    if stage.stats() {
        for dir in [&cfg.tokens_out, &cfg.lemmas_out] {
            let report = clear_directory(dir);
            tracing::info!(dir = %dir.display(), removed = report.removed, failed = report.failures.len(), "cleared output directory");
            summary.clear_failures.extend(report.failures);
        }
    }

    let corpus = Corpus::load(&cfg.input_dir, &cfg.extension, &HtmlTextExtractor)?;
    summary.documents = corpus.len();
    tracing::info!(num_docs = corpus.len(), input = %cfg.input_dir.display(), "loaded corpus");

    if stage.stats() {
        let (tokens, lemmas) = write_statistics(cfg, &corpus, &resources)?;
        summary.token_lines = tokens;
        summary.lemma_lines = lemmas;
    }

    if stage.index() {
        let (terms, lemma_index) = build_indexes(&corpus, &resources);
        terms.verify()?;
        lemma_index.verify()?;
        write_inverted_index(&cfg.index_out, terms.records())?;
        write_inverted_index(&cfg.lemma_index_out, lemma_index.records())?;
        summary.index_terms = terms.len();
        summary.lemma_index_terms = lemma_index.len();
        tracing::info!(num_terms = terms.len(), output = %cfg.index_out.display(), "wrote inverted index");
        tracing::info!(num_terms = lemma_index.len(), output = %cfg.lemma_index_out.display(), "wrote lemma inverted index");
    }

    Ok(summary)
}

/// Score every document and write its token and lemma files. Returns the
/// number of token and lemma lines written.
pub fn write_statistics(cfg: &PipelineConfig, corpus: &Corpus, res: &Resources) -> Result<(usize, usize)> {
    let mut engine = StatisticsEngine::new(
        corpus,
        &WordPunctTokenizer,
        &res.filter,
        &*res.analyzer,
        cfg.confidence,
        cfg.df_mode,
    );
    let (mut token_lines, mut lemma_lines) = (0, 0);
    for doc in corpus.documents() {
        let scores = engine.score_document(doc)?;
        let file_name = doc.stats_file_name();
        write_document_stats(&cfg.tokens_out, &file_name, &scores.tokens)?;
        write_document_stats(&cfg.lemmas_out, &file_name, &scores.lemmas)?;
        token_lines += scores.tokens.len();
        lemma_lines += scores.lemmas.len();
    }
    tracing::info!(token_lines, lemma_lines, "wrote tf-idf statistics");
    Ok((token_lines, lemma_lines))
}

/// Vocabulary index and lemma index over the lowercase whitespace view.
pub fn build_indexes(corpus: &Corpus, res: &Resources) -> (InvertedIndex, InvertedIndex) {
    let mut terms = InvertedIndex::new();
    let mut lemmas = InvertedIndex::new();
    for doc in corpus.documents() {
        let words: Vec<String> = lowercase_words(&doc.text).collect();
        terms.add_document(doc.id, res.vocabulary.terms_in(words.iter().cloned()));
        lemmas.add_document(doc.id, res.lemma_table.lemmas_in(&words));
    }
    (terms, lemmas)
}
