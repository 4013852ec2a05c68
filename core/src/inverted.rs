use crate::error::{read_resource, Error, Result};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Accepted index terms, fixed for the run.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    terms: HashSet<String>,
}

impl Vocabulary {
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::parse(&read_resource(path)?))
    }

    /// One term per line, surrounding whitespace trimmed.
    pub fn parse(raw: &str) -> Self {
        Self { terms: raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect() }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Words of `words` that are vocabulary terms, in order, repeats kept.
    pub fn terms_in<'v, I>(&'v self, words: I) -> impl Iterator<Item = String> + 'v
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'v,
    {
        words.into_iter().filter(move |w| self.contains(w))
    }
}

/// One line of the index file. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub count: u32,
    pub inverted_array: Vec<DocId>,
    pub word: String,
}

/// Term → posting list, terms kept in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    records: Vec<TermRecord>,
    slots: HashMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `doc_id` contains each of `terms`. Repeats within the call
    /// count once.
    pub fn add_document<I, S>(&mut self, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<usize> = HashSet::new();
        for term in terms {
            let term = term.as_ref();
            let slot = match self.slots.get(term) {
                Some(&slot) => slot,
                None => {
                    let slot = self.records.len();
                    self.records.push(TermRecord { count: 0, inverted_array: Vec::new(), word: term.to_string() });
                    self.slots.insert(term.to_string(), slot);
                    slot
                }
            };
            if seen.insert(slot) {
                let rec = &mut self.records[slot];
                rec.count += 1;
                rec.inverted_array.push(doc_id);
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&TermRecord> {
        self.slots.get(term).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[TermRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record's count equals its posting length and no document is
    /// posted twice under one term.
    pub fn verify(&self) -> Result<()> {
        for rec in &self.records {
            if rec.count as usize != rec.inverted_array.len() {
                return Err(Error::integrity(
                    &rec.word,
                    format!("count {} but {} postings", rec.count, rec.inverted_array.len()),
                ));
            }
            let distinct: HashSet<&DocId> = rec.inverted_array.iter().collect();
            if distinct.len() != rec.inverted_array.len() {
                return Err(Error::integrity(&rec.word, "document posted more than once"));
            }
        }
        Ok(())
    }
}
