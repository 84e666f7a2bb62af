//! Compound-aware text preprocessing: mask multi-word phrases so they
//! tokenize as single units, then tokenize, POS-tag, and lemmatize
//! sentences with a first-token capitalization rule driven by a
//! named-entity check.

pub mod backend;
pub mod error;
pub mod masker;
pub mod pipeline;
pub mod sentences;

// Re-export main types for convenient access
pub use backend::lexicon::LexiconBackend;
pub use backend::{Backend, Lemmatize, NerTag, PosCategory, PosTag, Tokenize, NO_ENTITY};
pub use error::Error;
pub use masker::{PhraseMasker, DEFAULT_MARKER, DEFAULT_TARGET};
pub use pipeline::{LemmaOutput, LemmatizeOptions, SentenceLemmatizer, TextInput};
