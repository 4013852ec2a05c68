//! TF-IDF over surface tokens and lemma groups.
//!
//! Scoring needs the whole corpus in memory first: document frequency is a
//! corpus-wide count, so a [`StatisticsEngine`] borrows a loaded [`Corpus`]
//! and scores its documents one at a time.

use crate::config::DfMode;
use crate::corpus::{Corpus, Document};
use crate::error::{Error, Result};
use crate::filter::TokenFilter;
use crate::lemma::{self, LemmaGroups};
use crate::morph::MorphAnalyzer;
use crate::tokenizer::Tokenizer;
use crate::DocId;
use std::collections::{BTreeSet, HashMap, HashSet};

/// One output line: `<term> <idf> <tf_idf>` for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdf {
    pub doc_id: DocId,
    pub term: String,
    pub idf: f64,
    pub tf_idf: f64,
}

/// `ln(N / df)`. A zero `df` means the corpus changed under us or a term was
/// scored against the wrong corpus.
pub fn idf(num_docs: usize, df: usize, term: &str) -> Result<f64> {
    if df == 0 {
        return Err(Error::integrity(term, format!("document frequency is 0 across {num_docs} documents")));
    }
    if df > num_docs {
        return Err(Error::integrity(term, format!("document frequency {df} exceeds corpus size {num_docs}")));
    }
    Ok((num_docs as f64 / df as f64).ln())
}

/// Corpus-wide document frequency with a per-run cache.
pub struct DocumentFrequency<'c> {
    corpus: &'c Corpus,
    mode: DfMode,
    token_sets: Vec<HashSet<String>>,
    cache: HashMap<String, usize>,
}

impl<'c> DocumentFrequency<'c> {
    pub fn new(corpus: &'c Corpus, mode: DfMode, tokenizer: &dyn Tokenizer) -> Self {
        let token_sets: Vec<HashSet<String>> = match mode {
            DfMode::Substring => Vec::new(),
            DfMode::Token => corpus.texts().map(|t| tokenizer.tokenize(t).into_iter().collect()).collect(),
        };
        Self { corpus, mode, token_sets, cache: HashMap::new() }
    }

    fn count_docs<F>(&self, mut contains: F) -> usize
    where
        F: FnMut(&str, Option<&HashSet<String>>) -> bool,
    {
        match self.mode {
            DfMode::Substring => self.corpus.texts().filter(|t| contains(*t, None)).count(),
            DfMode::Token => self.token_sets.iter().filter(|s| contains("", Some(*s))).count(),
        }
    }

    fn has(text: &str, set: Option<&HashSet<String>>, term: &str) -> bool {
        match set {
            Some(tokens) => tokens.contains(term),
            None => text.contains(term),
        }
    }

    pub fn of_term(&mut self, term: &str) -> usize {
        if let Some(&df) = self.cache.get(term) {
            return df;
        }
        let df = self.count_docs(|text, set| Self::has(text, set, term));
        self.cache.insert(term.to_string(), df);
        df
    }

    /// Documents containing the lemma string or any one of its forms.
    pub fn of_lemma(&mut self, lemma: &str, forms: &BTreeSet<String>) -> usize {
        let key = std::iter::once(lemma)
            .chain(forms.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\u{0}");
        if let Some(&df) = self.cache.get(&key) {
            return df;
        }
        let df = self.count_docs(|text, set| {
            Self::has(text, set, lemma) || forms.iter().any(|f| Self::has(text, set, f.as_str()))
        });
        self.cache.insert(key, df);
        df
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentScores {
    pub doc_id: DocId,
    pub total_tokens: usize,
    /// Sorted by token.
    pub tokens: Vec<TfIdf>,
    /// Sorted by lemma.
    pub lemmas: Vec<TfIdf>,
}

pub struct StatisticsEngine<'a> {
    corpus: &'a Corpus,
    tokenizer: &'a dyn Tokenizer,
    filter: &'a TokenFilter,
    analyzer: &'a dyn MorphAnalyzer,
    threshold: f64,
    df: DocumentFrequency<'a>,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(
        corpus: &'a Corpus,
        tokenizer: &'a dyn Tokenizer,
        filter: &'a TokenFilter,
        analyzer: &'a dyn MorphAnalyzer,
        threshold: f64,
        mode: DfMode,
    ) -> Self {
        let df = DocumentFrequency::new(corpus, mode, tokenizer);
        Self { corpus, tokenizer, filter, analyzer, threshold, df }
    }

    pub fn score_document(&mut self, doc: &Document) -> Result<DocumentScores> {
        let n = self.corpus.len();
        let tokens = self.tokenizer.tokenize(&doc.text);
        let total = tokens.len();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in &tokens {
            *counts.entry(t.as_str()).or_insert(0) += 1;
        }
        let raw_count = |s: &str| counts.get(s).copied().unwrap_or(0);

        let retained = self.filter.retain(&tokens, self.analyzer);
        let mut token_scores = Vec::with_capacity(retained.len());
        for term in &retained {
            let tf = raw_count(term.as_str()) as f64 / total as f64;
            let idf = idf(n, self.df.of_term(term), term)?;
            token_scores.push(TfIdf { doc_id: doc.id, term: term.clone(), idf, tf_idf: tf * idf });
        }

        let groups: LemmaGroups = lemma::aggregate(&retained, self.analyzer, self.threshold);
        let mut lemma_scores = Vec::with_capacity(groups.len());
        for (lemma, forms) in &groups {
            let tf = lemma_occurrences(lemma, forms, raw_count) as f64 / total as f64;
            let idf = idf(n, self.df.of_lemma(lemma, forms), lemma)?;
            lemma_scores.push(TfIdf { doc_id: doc.id, term: lemma.clone(), idf, tf_idf: tf * idf });
        }

        tracing::debug!(
            doc_id = doc.id,
            total_tokens = total,
            tokens = token_scores.len(),
            lemmas = lemma_scores.len(),
            "scored document"
        );
        Ok(DocumentScores { doc_id: doc.id, total_tokens: total, tokens: token_scores, lemmas: lemma_scores })
    }
}

/// Raw occurrences of the lemma string plus each of its forms. A lemma that
/// is also listed among its forms contributes twice.
pub fn lemma_occurrences<F>(lemma: &str, forms: &BTreeSet<String>, raw_count: F) -> usize
where
    F: Fn(&str) -> usize,
{
    raw_count(lemma) + forms.iter().map(|f| raw_count(f.as_str())).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TAG_BLACKLIST;
    use crate::morph::{Analysis, StemmingAnalyzer};
    use crate::tokenizer::WordPunctTokenizer;
    use std::path::PathBuf;

    fn doc(id: DocId, text: &str) -> Document {
        Document { id, name: format!("doc_{id}.html"), path: PathBuf::new(), text: text.to_string() }
    }

    fn corpus(texts: &[&str]) -> Corpus {
        Corpus::from_documents(texts.iter().enumerate().map(|(i, t)| doc(i as DocId + 1, t)).collect())
    }

    #[test]
    fn idf_rejects_zero_df() {
        assert!(matches!(idf(3, 0, "x"), Err(Error::DataIntegrity { .. })));
        assert_eq!(idf(2, 2, "dog").unwrap(), 0.0);
        assert!(idf(2, 1, "cat").unwrap() > 0.0);
    }

    #[test]
    fn substring_df_matches_inside_words() {
        let c = corpus(&["catalog", "dog"]);
        let mut substring = DocumentFrequency::new(&c, DfMode::Substring, &WordPunctTokenizer);
        assert_eq!(substring.of_term("cat"), 1);
        let mut exact = DocumentFrequency::new(&c, DfMode::Token, &WordPunctTokenizer);
        assert_eq!(exact.of_term("cat"), 0);
        assert_eq!(exact.of_term("dog"), 1);
    }

    #[test]
    fn lemma_df_counts_any_form() {
        let c = corpus(&["a cats", "a dog", "the cat"]);
        let mut df = DocumentFrequency::new(&c, DfMode::Token, &WordPunctTokenizer);
        let forms: BTreeSet<String> = ["cats".to_string()].into_iter().collect();
        assert_eq!(df.of_lemma("cat", &forms), 2);
    }

    #[test]
    fn token_scores_follow_counts() {
        let c = corpus(&["cat dog cat", "dog bird"]);
        let filter = TokenFilter::new(HashSet::new(), DEFAULT_TAG_BLACKLIST.iter().copied());
        let analyzer = StemmingAnalyzer::new("english").unwrap();
        let mut engine =
            StatisticsEngine::new(&c, &WordPunctTokenizer, &filter, &analyzer, 0.5, DfMode::Substring);
        let scores = engine.score_document(&c.documents()[0]).unwrap();
        assert_eq!(scores.total_tokens, 3);
        let terms: Vec<&str> = scores.tokens.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(terms, vec!["cat", "dog"]);

        let cat = &scores.tokens[0];
        assert_eq!(cat.idf, 2f64.ln());
        assert_eq!(cat.tf_idf, (2.0 / 3.0) * 2f64.ln());
        let dog = &scores.tokens[1];
        assert_eq!(dog.idf, 0.0);
        assert_eq!(dog.tf_idf, 0.0);
    }

    #[test]
    fn punctuation_never_scored() {
        let c = corpus(&["cat, dog!", "bird"]);
        let filter = TokenFilter::new(HashSet::new(), DEFAULT_TAG_BLACKLIST.iter().copied());
        let analyzer = StemmingAnalyzer::new("english").unwrap();
        let mut engine =
            StatisticsEngine::new(&c, &WordPunctTokenizer, &filter, &analyzer, 0.5, DfMode::Substring);
        let scores = engine.score_document(&c.documents()[0]).unwrap();
        assert_eq!(scores.total_tokens, 4);
        assert!(scores.tokens.iter().all(|s| s.term != "," && s.term != "!"));
        assert!(scores.lemmas.iter().all(|s| s.term != "," && s.term != "!"));
    }

    struct Table;

    impl MorphAnalyzer for Table {
        fn analyze(&self, token: &str) -> Vec<Analysis> {
            let (normal, score) = match token {
                "cats" | "cat" => ("cat", 0.9),
                "kitty" => ("cat", 0.8),
                "dogs" => ("dog", 0.2),
                other => (other, 1.0),
            };
            vec![Analysis::new(normal, "NOUN", score)]
        }
    }

    #[test]
    fn lemma_tf_sums_lemma_and_forms() {
        let c = corpus(&["cats kitty cats cat dogs bird", "bird"]);
        let filter = TokenFilter::new(HashSet::new(), DEFAULT_TAG_BLACKLIST.iter().copied());
        let mut engine = StatisticsEngine::new(&c, &WordPunctTokenizer, &filter, &Table, 0.5, DfMode::Substring);
        let scores = engine.score_document(&c.documents()[0]).unwrap();
        let lemmas: Vec<&str> = scores.lemmas.iter().map(|s| s.term.as_str()).collect();
        // "dogs" is below the threshold, so no "dog" group
        assert_eq!(lemmas, vec!["bird", "cat"]);
        let cat = &scores.lemmas[1];
        assert_eq!(cat.idf, 2f64.ln());
        assert_eq!(cat.tf_idf, (5.0 / 6.0) * 2f64.ln());
        // "dogs" still has token-level stats
        assert!(scores.tokens.iter().any(|s| s.term == "dogs"));
    }

    #[test]
    fn lemma_string_added_to_form_counts() {
        let counts: HashMap<&str, usize> = [("a", 2), ("b", 1), ("l", 3)].into_iter().collect();
        let raw = |s: &str| counts.get(s).copied().unwrap_or(0);
        let forms: BTreeSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        assert_eq!(lemma_occurrences("l", &forms, raw), 6);
        let with_self: BTreeSet<String> = ["a".to_string(), "l".to_string()].into_iter().collect();
        assert_eq!(lemma_occurrences("l", &with_self, raw), 8);

        let cat: HashMap<&str, usize> = [("кот", 2), ("коты", 1)].into_iter().collect();
        let raw = |s: &str| cat.get(s).copied().unwrap_or(0);
        let forms: BTreeSet<String> = ["кот".to_string(), "коты".to_string()].into_iter().collect();
        assert_eq!(lemma_occurrences("кот", &forms, raw), 5);
    }
}
