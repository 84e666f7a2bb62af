use thiserror::Error;

/// Library error type. All variants are raised synchronously at the point of
/// detection; nothing is retried and there is no partial-result mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected masker or pipeline configuration, e.g. a marker equal to the
    /// target sequence, an empty marker, or a phrase that already contains
    /// the marker (restoration would be ambiguous).
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// A model or gazetteer artifact could not be located or loaded at
    /// construction time.
    #[error("resource not found: {path}: {reason}")]
    ResourceNotFound { path: String, reason: String },

    /// Input at the polymorphic boundary was neither a string nor a list of
    /// strings.
    #[error("invalid input shape: expected a string or an array of strings, found {found}")]
    InvalidInput { found: String },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
