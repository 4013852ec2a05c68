//! Lemma grouping.
//!
//! Two sources of lemma → surface-form mappings exist: groups computed per
//! document from morphological analysis, and a precomputed table read from
//! `<lemma> <form> <form> ...` lines that drives the lemma inverted index.

use crate::error::{read_resource, Result};
use crate::morph::MorphAnalyzer;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

/// Normal form → surface forms observed for it.
pub type LemmaGroups = BTreeMap<String, BTreeSet<String>>;

/// Group retained tokens under their best normal form. Tokens whose best
/// analysis scores below `threshold` are left out of every group.
pub fn aggregate(retained: &BTreeSet<String>, analyzer: &dyn MorphAnalyzer, threshold: f64) -> LemmaGroups {
    let mut groups = LemmaGroups::new();
    for token in retained {
        let Some(best) = analyzer.best(token) else { continue };
        if best.score >= threshold {
            groups.entry(best.normal_form).or_default().insert(token.clone());
        }
    }
    groups
}

#[derive(Debug, Default, Clone)]
pub struct LemmaTable {
    lemmas: Vec<(String, BTreeSet<String>)>,
    /// Any form, the lemma string included, → positions in `lemmas`.
    by_form: HashMap<String, Vec<usize>>,
}

impl LemmaTable {
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::parse(&read_resource(path)?))
    }

    /// A lemma repeated on a later line replaces the earlier forms.
    pub fn parse(raw: &str) -> Self {
        let mut lemmas: Vec<(String, BTreeSet<String>)> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        for line in raw.lines() {
            let mut parts = line.split_whitespace();
            let Some(lemma) = parts.next() else { continue };
            let forms: BTreeSet<String> = parts.map(String::from).collect();
            match position.get(lemma) {
                Some(&i) => lemmas[i].1 = forms,
                None => {
                    position.insert(lemma.to_string(), lemmas.len());
                    lemmas.push((lemma.to_string(), forms));
                }
            }
        }

        let mut by_form: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, (lemma, forms)) in lemmas.iter().enumerate() {
            for form in std::iter::once(lemma).chain(forms.iter()) {
                let slots = by_form.entry(form.clone()).or_default();
                if !slots.contains(&i) {
                    slots.push(i);
                }
            }
        }
        Self { lemmas, by_form }
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    pub fn forms(&self, lemma: &str) -> Option<&BTreeSet<String>> {
        self.lemmas.iter().find(|(l, _)| l == lemma).map(|(_, f)| f)
    }

    /// Lemmas with at least one form among `words`, deduplicated, in order of
    /// the first word that hits them.
    pub fn lemmas_in<'a, I, S>(&'a self, words: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for word in words {
            let Some(slots) = self.by_form.get(word.as_ref()) else { continue };
            for &i in slots {
                if seen.insert(i) {
                    out.push(self.lemmas[i].0.as_str());
                }
            }
        }
        out
    }
}
