use crate::error::{read_utf8, Error, Result};
use crate::extract::TextExtractor;
use crate::DocId;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    /// File name including extension, e.g. `page_12.html`.
    pub name: String,
    pub path: PathBuf,
    /// Plain text produced by the extractor.
    pub text: String,
}

impl Document {
    /// File name with the extension swapped to `.txt`.
    pub fn stats_file_name(&self) -> String {
        let stem = Path::new(&self.name).file_stem().and_then(|s| s.to_str()).unwrap_or(&self.name);
        format!("{stem}.txt")
    }
}

/// `prefix_<N>.ext` → `N`: the text after the last `_`, cut at its first `.`.
pub fn doc_id_from_name(name: &str) -> Result<DocId> {
    let tail = name.rsplit('_').next().unwrap_or(name);
    let number = tail.split('.').next().unwrap_or(tail);
    number.parse().map_err(|_| Error::DocumentName { name: name.to_string() })
}

/// The whole corpus held in memory, documents sorted by file name.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn from_documents(mut docs: Vec<Document>) -> Self {
        docs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        Self { docs }
    }

    /// Walk `dir` recursively and extract every file ending in `.{extension}`.
    ///
    /// A missing directory or an unreadable entry is logged and skipped;
    /// undecodable text and unparseable file names abort the load.
    pub fn load(dir: &Path, extension: &str, extractor: &dyn TextExtractor) -> Result<Self> {
        if !dir.is_dir() {
            let err = Error::fs(dir, std::io::Error::from(std::io::ErrorKind::NotFound));
            tracing::warn!(error = %err, "input directory missing, corpus is empty");
            return Ok(Self::default());
        }

        let mut docs = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable corpus entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|s| s.to_str()) != Some(extension) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let id = doc_id_from_name(&name)?;
            let markup = match read_utf8(path) {
                Ok(m) => m,
                Err(err) if !err.is_fatal() => {
                    tracing::warn!(error = %err, "skipping document");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let text = extractor.extract(&markup);
            tracing::debug!(doc_id = id, name = %name, chars = text.len(), "extracted document");
            docs.push(Document { id, name, path: path.to_path_buf(), text });
        }
        Ok(Self::from_documents(docs))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.docs.iter().map(|d| d.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::HtmlTextExtractor;
    use std::fs;

    #[test]
    fn parses_trailing_number() {
        assert_eq!(doc_id_from_name("page_17.html").unwrap(), 17);
        assert_eq!(doc_id_from_name("a_b_3.html").unwrap(), 3);
        assert_eq!(doc_id_from_name("42.html").unwrap(), 42);
        assert_eq!(doc_id_from_name("page_1.tar.html").unwrap(), 1);
        assert_eq!(doc_id_from_name("v1.2_8.html").unwrap(), 8);
        assert!(matches!(doc_id_from_name("page_x.html"), Err(Error::DocumentName { .. })));
    }

    #[test]
    fn loads_sorted_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc_2.html"), "<p>dog bird</p>").unwrap();
        fs::write(dir.path().join("doc_1.html"), "<p>cat dog cat</p>").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        let corpus = Corpus::load(dir.path(), "html", &HtmlTextExtractor).unwrap();
        let ids: Vec<DocId> = corpus.documents().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(corpus.documents()[0].text, "cat dog cat");
        assert_eq!(corpus.documents()[0].stats_file_name(), "doc_1.txt");
    }

    #[test]
    fn missing_directory_yields_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::load(&dir.path().join("nope"), "html", &HtmlTextExtractor).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn bad_encoding_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc_1.html"), [0xc3u8, 0x28]).unwrap();
        let err = Corpus::load(dir.path(), "html", &HtmlTextExtractor).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }
}
