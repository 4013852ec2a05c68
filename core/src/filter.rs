use crate::error::{read_resource, Result};
use crate::morph::{Analysis, MorphAnalyzer};
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

lazy_static! {
    static ref RUSSIAN: HashSet<&'static str> = {
        let words: &[&str] = &[
            "и","в","во","не","что","он","на","я","с","со","как","а","то","все","она","так","его","но","да","ты",
            "к","у","же","вы","за","бы","по","только","ее","мне","было","вот","от","меня","еще","нет","о","из",
            "ему","теперь","когда","даже","ну","вдруг","ли","если","уже","или","ни","быть","был","него","до",
            "вас","нибудь","опять","уж","вам","ведь","там","потом","себя","ничего","ей","может","они","тут",
            "где","есть","надо","ней","для","мы","тебя","их","чем","была","сам","чтоб","без","будто","чего",
            "раз","тоже","себе","под","будет","ж","тогда","кто","этот","того","потому","этого","какой",
            "совсем","ним","здесь","этом","один","почти","мой","тем","чтобы","нее","сейчас","были","куда",
            "зачем","всех","никогда","можно","при","наконец","два","об","другой","хоть","после","над",
            "больше","тот","через","эти","нас","про","всего","них","какая","много","разве","три","эту","моя",
            "впрочем","хорошо","свою","этой","перед","иногда","лучше","чуть","том","нельзя","такой","им",
            "более","всегда","конечно","всю","между"
        ];
        words.iter().copied().collect()
    };
    static ref ENGLISH: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could","did","do","does","doing","down","during",
            "each","few","for","from","further","had","has","have","having","he","her","here","hers",
            "herself","him","himself","his","how","i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself","no","nor","not","of","off","on","once","only","or","other",
            "ought","our","ours","ourselves","out","over","own","same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this",
            "those","through","to","too","under","until","up","very","was","we","were","what","when",
            "where","which","while","who","whom","why","with","would","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Built-in stopwords for `language`, empty when none ship for it.
pub fn default_stopwords(language: &str) -> HashSet<String> {
    let words: &HashSet<&'static str> = match language.to_lowercase().as_str() {
        "russian" => &*RUSSIAN,
        "english" => &*ENGLISH,
        _ => return HashSet::new(),
    };
    words.iter().map(|w| w.to_string()).collect()
}

/// Newline-delimited stopword list; surrounding whitespace and blank lines are dropped.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let raw = read_resource(path)?;
    Ok(raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
}

/// Drops stopwords and tokens whose best analysis carries a blacklisted tag.
#[derive(Debug, Clone, Default)]
pub struct TokenFilter {
    stopwords: HashSet<String>,
    blacklist: HashSet<String>,
}

impl TokenFilter {
    pub fn new<I, S>(stopwords: HashSet<String>, blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { stopwords, blacklist: blacklist.into_iter().map(Into::into).collect() }
    }

    /// Stopword matching is case-sensitive, exactly as the token was produced.
    pub fn rejects(&self, token: &str, best: Option<&Analysis>) -> bool {
        if self.stopwords.contains(token) {
            return true;
        }
        best.map_or(false, |a| a.tags().any(|t| self.blacklist.contains(t)))
    }

    /// Distinct tokens that survive filtering, in sorted order.
    pub fn retain(&self, tokens: &[String], analyzer: &dyn MorphAnalyzer) -> BTreeSet<String> {
        let distinct: BTreeSet<&String> = tokens.iter().collect();
        distinct
            .into_iter()
            .filter(|token| !self.rejects(token, analyzer.best(token).as_ref()))
            .cloned()
            .collect()
    }
}
