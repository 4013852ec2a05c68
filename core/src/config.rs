use crate::error::{read_resource, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Grammatical tags whose presence on a token's best analysis drops the token.
pub const DEFAULT_TAG_BLACKLIST: &[&str] =
    &["NUMB", "ROMN", "PRCL", "PREP", "CONJ", "INTJ", "LATN", "UNKN", "PNCT"];

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// How document frequency is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DfMode {
    /// A document counts when its raw text contains the term anywhere,
    /// including inside longer words.
    #[default]
    Substring,
    /// A document counts only when the term is one of its tokens.
    Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    /// Only files with this extension are read from `input_dir`.
    pub extension: String,
    pub vocabulary: PathBuf,
    pub lemma_table: PathBuf,
    pub stopwords: Option<PathBuf>,
    /// Precomputed `token\tnormal_form\ttags\tscore` table consulted before the stemmer.
    pub analysis_table: Option<PathBuf>,
    pub language: String,
    pub tag_blacklist: Vec<String>,
    pub confidence: f64,
    pub df_mode: DfMode,
    pub tokens_out: PathBuf,
    pub lemmas_out: PathBuf,
    pub index_out: PathBuf,
    pub lemma_index_out: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("downloaded_texts"),
            extension: "html".into(),
            vocabulary: PathBuf::from("tokens_list.txt"),
            lemma_table: PathBuf::from("lemmatized_tokens_list.txt"),
            stopwords: None,
            analysis_table: None,
            language: "russian".into(),
            tag_blacklist: DEFAULT_TAG_BLACKLIST.iter().map(|t| t.to_string()).collect(),
            confidence: DEFAULT_CONFIDENCE,
            df_mode: DfMode::Substring,
            tokens_out: PathBuf::from("tokens_list_tf_idf"),
            lemmas_out: PathBuf::from("lemmas_list_tf_idf"),
            index_out: PathBuf::from("inverted_index.txt"),
            lemma_index_out: PathBuf::from("inverted_index_lemmas.txt"),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Fields left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve every relative path against `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        join(&mut self.input_dir);
        join(&mut self.vocabulary);
        join(&mut self.lemma_table);
        join(&mut self.tokens_out);
        join(&mut self.lemmas_out);
        join(&mut self.index_out);
        join(&mut self.lemma_index_out);
        if let Some(p) = self.stopwords.as_mut() {
            join(p);
        }
        if let Some(p) = self.analysis_table.as_mut() {
            join(p);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"df_mode": "token", "confidence": 0.7}"#).unwrap();
        assert_eq!(cfg.df_mode, DfMode::Token);
        assert_eq!(cfg.confidence, 0.7);
        assert_eq!(cfg.extension, "html");
        assert_eq!(cfg.tag_blacklist.len(), DEFAULT_TAG_BLACKLIST.len());
    }

    #[test]
    fn rooted_at_leaves_absolute_paths() {
        let mut cfg = PipelineConfig::default();
        cfg.vocabulary = PathBuf::from("/abs/vocab.txt");
        let cfg = cfg.rooted_at(Path::new("/work"));
        assert_eq!(cfg.vocabulary, PathBuf::from("/abs/vocab.txt"));
        assert_eq!(cfg.input_dir, PathBuf::from("/work/downloaded_texts"));
    }
}
