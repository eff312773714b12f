use thiserror::Error;

/// Failures the similarity core can report to its callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoutError {
    #[error("Player '{0}' not found.")]
    PlayerNotFound(String),

    /// A group identifier outside the four canonical groups. Classification is total,
    /// so hitting this from the ranking path is a programming error.
    #[error("unknown position group: {0}")]
    UnknownGroup(String),
}

pub type ScoutResult<T> = Result<T, ScoutError>;
