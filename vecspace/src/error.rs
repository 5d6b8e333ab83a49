use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VecError {
    #[error("vecspace: empty input")]
    EmptyInput,

    #[error("vecspace: vectorization failed: {0}")]
    Vectorization(String),
}
