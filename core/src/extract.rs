use scraper::{Html, Node};
use unicode_normalization::UnicodeNormalization;

const SKIPPED: &[&str] = &["script", "style", "noscript"];

/// Turns a markup document into plain text.
pub trait TextExtractor {
    fn extract(&self, markup: &str) -> String;
}

/// Collects every text node outside script-like elements, trims each one and
/// joins the non-empty pieces with a single space. Output is NFC-normalized.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, markup: &str) -> String {
        let doc = Html::parse_document(markup);
        let mut pieces: Vec<&str> = Vec::new();
        for node in doc.tree.root().descendants() {
            let Node::Text(text) = node.value() else { continue };
            let hidden = node.ancestors().any(|a| {
                a.value().as_element().map_or(false, |el| SKIPPED.contains(&el.name()))
            });
            if hidden {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        }
        pieces.join(" ").nfc().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_scripts() {
        let html = "<html><head><title>T</title><script>var x = 1;</script></head>\
                    <body><p>cat <b>dog</b></p>\n<p>  bird </p></body></html>";
        assert_eq!(HtmlTextExtractor.extract(html), "T cat dog bird");
    }

    #[test]
    fn normalizes_to_nfc() {
        // "й" written as и + combining breve
        let text = HtmlTextExtractor.extract("<p>ми\u{0306}р</p>");
        assert_eq!(text, "мйр");
    }
}
