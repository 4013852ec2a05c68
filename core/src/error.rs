use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("filesystem error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A term reached idf computation with no document containing it, or an
    /// index record disagrees with its own posting list.
    #[error("data integrity violation for term {term:?}: {detail}")]
    DataIntegrity { term: String, detail: String },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("required resource {} is missing", path.display())]
    MissingResource { path: PathBuf },

    #[error("cannot derive a document id from file name {name:?}")]
    DocumentName { name: String },

    #[error("no stemmer available for language {name:?}")]
    UnknownLanguage { name: String },

    #[error("failed to serialize index record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileSystem { path: path.into(), source }
    }

    pub(crate) fn integrity(term: &str, detail: impl Into<String>) -> Self {
        Error::DataIntegrity { term: term.to_string(), detail: detail.into() }
    }

    /// Fatal errors abort the run; everything else is reported and skipped.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::FileSystem { .. })
    }
}

/// Read a whole file as UTF-8, mapping failures onto the crate taxonomy.
pub(crate) fn read_utf8(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::fs(path, e))?;
    String::from_utf8(bytes).map_err(|_| Error::Encoding { path: path.to_path_buf() })
}

/// Like [`read_utf8`] but a missing file is a [`Error::MissingResource`].
pub(crate) fn read_resource(path: &std::path::Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::MissingResource { path: path.to_path_buf() });
    }
    read_utf8(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_is_reported() {
        let err = read_resource(std::path::Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_utf8(&path), Err(Error::Encoding { .. })));
    }
}
