use thiserror::Error;

pub type Result<T> = std::result::Result<T, CriteriaError>;

/// Failure to translate one selection criterion into SQL.
///
/// Every failure mode of a compilation — unknown key, illegal modifier,
/// unresolvable value, unrecognised date phrase — is reported through this
/// one type, carrying the offending key and value. A compilation either
/// succeeds completely or returns the first such error; no partial query is
/// ever produced.
#[derive(Debug, Error)]
#[error("cannot resolve criterion '{key}' = '{value}': {reason}")]
pub struct CriteriaError {
    /// Criteria key as supplied by the caller.
    pub key: String,
    /// Raw criterion value as supplied by the caller.
    pub value: String,
    /// Short human-readable reason.
    pub reason: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CriteriaError {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn with_source(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}
