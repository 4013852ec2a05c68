//! Morphological analysis.
//!
//! An analyzer maps a surface token to a ranked list of candidate analyses;
//! the pipeline only ever looks at the first one. Two implementations ship:
//! a stemmer with rule-derived tags, and a lookup table of precomputed
//! analyses that defers to another analyzer for tokens it does not know.

use crate::error::{read_resource, Error, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::path::Path;

/// Confidence reported for every stemmer-derived analysis.
pub const STEM_SCORE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub normal_form: String,
    /// Pipe-delimited grammatical tag codes, e.g. `NUMB` or `NOUN|inan`.
    pub tag: String,
    pub score: f64,
}

impl Analysis {
    pub fn new(normal_form: impl Into<String>, tag: impl Into<String>, score: f64) -> Self {
        Self { normal_form: normal_form.into(), tag: tag.into(), score }
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag.split('|').filter(|t| !t.is_empty())
    }
}

pub trait MorphAnalyzer {
    /// Candidate analyses, best first. May be empty.
    fn analyze(&self, token: &str) -> Vec<Analysis>;

    fn best(&self, token: &str) -> Option<Analysis> {
        self.analyze(token).into_iter().next()
    }
}

/// Snowball stemmer for normal forms, character-class rules for tags.
pub struct StemmingAnalyzer {
    stemmer: Stemmer,
    /// Latin-script words are foreign in this language.
    flag_latin: bool,
}

impl StemmingAnalyzer {
    pub fn new(language: &str) -> Result<Self> {
        let lang = language.to_lowercase();
        let algorithm = match lang.as_str() {
            "arabic" => Algorithm::Arabic,
            "danish" => Algorithm::Danish,
            "dutch" => Algorithm::Dutch,
            "english" => Algorithm::English,
            "french" => Algorithm::French,
            "german" => Algorithm::German,
            "greek" => Algorithm::Greek,
            "hungarian" => Algorithm::Hungarian,
            "italian" => Algorithm::Italian,
            "norwegian" => Algorithm::Norwegian,
            "portuguese" => Algorithm::Portuguese,
            "romanian" => Algorithm::Romanian,
            "russian" => Algorithm::Russian,
            "spanish" => Algorithm::Spanish,
            "swedish" => Algorithm::Swedish,
            "turkish" => Algorithm::Turkish,
            _ => return Err(Error::UnknownLanguage { name: language.to_string() }),
        };
        let flag_latin = matches!(lang.as_str(), "arabic" | "greek" | "russian");
        Ok(Self { stemmer: Stemmer::create(algorithm), flag_latin })
    }

    fn tag_for(&self, token: &str) -> &'static str {
        if token.chars().all(|c| !c.is_alphanumeric()) {
            "PNCT"
        } else if token.chars().all(|c| c.is_numeric()) {
            "NUMB"
        } else if is_roman_numeral(token) {
            "ROMN"
        } else if token.chars().any(|c| c.is_numeric()) {
            "UNKN"
        } else if self.flag_latin && token.chars().any(|c| c.is_ascii_alphabetic()) {
            "LATN"
        } else {
            "WORD"
        }
    }
}

fn is_roman_numeral(token: &str) -> bool {
    token.chars().all(|c| matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'))
}

impl MorphAnalyzer for StemmingAnalyzer {
    fn analyze(&self, token: &str) -> Vec<Analysis> {
        if token.is_empty() {
            return Vec::new();
        }
        let lower = token.to_lowercase();
        let normal = self.stemmer.stem(&lower).into_owned();
        vec![Analysis::new(normal, self.tag_for(token), STEM_SCORE)]
    }
}

/// Precomputed analyses keyed by surface token, rows kept in file order.
pub struct LookupAnalyzer<F> {
    table: HashMap<String, Vec<Analysis>>,
    fallback: F,
}

impl<F: MorphAnalyzer> LookupAnalyzer<F> {
    pub fn new(table: HashMap<String, Vec<Analysis>>, fallback: F) -> Self {
        Self { table, fallback }
    }

    /// Read `token\tnormal_form\ttags\tscore` rows. Blank lines are ignored.
    pub fn from_file(path: &Path, fallback: F) -> Result<Self> {
        let raw = read_resource(path)?;
        Ok(Self::new(parse_table(&raw)?, fallback))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn parse_table(raw: &str) -> Result<HashMap<String, Vec<Analysis>>> {
    let mut table: HashMap<String, Vec<Analysis>> = HashMap::new();
    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        let bad_row = || Error::integrity(cols[0], format!("malformed analysis row at line {}", lineno + 1));
        if cols.len() != 4 {
            return Err(bad_row());
        }
        let score: f64 = cols[3].trim().parse().map_err(|_| bad_row())?;
        table
            .entry(cols[0].to_string())
            .or_default()
            .push(Analysis::new(cols[1], cols[2], score));
    }
    Ok(table)
}

impl<F: MorphAnalyzer> MorphAnalyzer for LookupAnalyzer<F> {
    fn analyze(&self, token: &str) -> Vec<Analysis> {
        match self.table.get(token) {
            Some(rows) => rows.clone(),
            None => self.fallback.analyze(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stemmer_tags_by_character_class() {
        let a = StemmingAnalyzer::new("russian").unwrap();
        assert_eq!(a.best(",").unwrap().tag, "PNCT");
        assert_eq!(a.best("2024").unwrap().tag, "NUMB");
        assert_eq!(a.best("XIV").unwrap().tag, "ROMN");
        assert_eq!(a.best("rust").unwrap().tag, "LATN");
        assert_eq!(a.best("ф1").unwrap().tag, "UNKN");
        let word = a.best("Кошки").unwrap();
        assert_eq!(word.tag, "WORD");
        assert_eq!(word.normal_form, "кошк");
        assert_eq!(word.score, STEM_SCORE);
    }

    #[test]
    fn english_does_not_flag_latin() {
        let a = StemmingAnalyzer::new("English").unwrap();
        let best = a.best("running").unwrap();
        assert_eq!(best.tag, "WORD");
        assert_eq!(best.normal_form, "run");
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(matches!(StemmingAnalyzer::new("klingon"), Err(Error::UnknownLanguage { .. })));
    }

    #[test]
    fn lookup_keeps_rank_and_falls_back() {
        let raw = "стали\tсталь\tNOUN|inan\t0.6\nстали\tстать\tVERB\t0.4\n\nи\tи\tCONJ\t1.0\n";
        let table = parse_table(raw).unwrap();
        let a = LookupAnalyzer::new(table, StemmingAnalyzer::new("russian").unwrap());
        let ranked = a.analyze("стали");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].normal_form, "сталь");
        assert_eq!(ranked[0].tags().collect::<Vec<_>>(), vec!["NOUN", "inan"]);
        assert_eq!(a.best("!").unwrap().tag, "PNCT");
    }

    #[test]
    fn malformed_row_is_an_integrity_error() {
        assert!(matches!(parse_table("only\ttwo"), Err(Error::DataIntegrity { .. })));
        assert!(matches!(parse_table("a\tb\tC\tnot-a-number"), Err(Error::DataIntegrity { .. })));
    }
}
