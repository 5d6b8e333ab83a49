use thiserror::Error;

/// Errors returned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JenksError {
    #[error("jenks: {distinct} distinct values, need at least {required}")]
    InsufficientData { distinct: usize, required: usize },

    #[error("jenks: class count must be at least 1")]
    InvalidClasses,

    #[error("jenks: subset size {size} too small for {strategy:?} strategy")]
    InvalidSubset { size: usize, strategy: crate::Subset },
}
