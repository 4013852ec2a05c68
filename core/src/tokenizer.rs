use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_PUNCT: Regex = Regex::new(r"\w+|[^\w\s]+").expect("valid regex");
}

/// Splits raw text into an ordered token sequence.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Runs of word characters and runs of punctuation become separate tokens;
/// whitespace is dropped. Case is preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordPunctTokenizer;

impl Tokenizer for WordPunctTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        WORD_PUNCT.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

/// Coarse view used by the inverted index: whitespace split, lowercased,
/// punctuation left attached.
pub fn lowercase_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_punctuation_as_tokens() {
        let t = WordPunctTokenizer.tokenize("Привет, мир!! It's 42.");
        assert_eq!(t, vec!["Привет", ",", "мир", "!!", "It", "'", "s", "42", "."]);
    }

    #[test]
    fn lowercase_words_keeps_attached_punctuation() {
        let w: Vec<String> = lowercase_words("Cat  dog,\nBIRD").collect();
        assert_eq!(w, vec!["cat", "dog,", "bird"]);
    }
}
