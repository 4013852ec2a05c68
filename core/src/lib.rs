pub mod config;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod filter;
pub mod inverted;
pub mod lemma;
pub mod morph;
pub mod output;
pub mod pipeline;
pub mod stats;
pub mod tokenizer;

pub use config::{DfMode, PipelineConfig};
pub use error::{Error, Result};

/// Numeric document identifier, parsed from the trailing `_<N>` of a file name.
pub type DocId = u32;
