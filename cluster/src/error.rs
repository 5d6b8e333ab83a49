use floodlens_vecspace::VecError;
use thiserror::Error;

/// Errors returned by clustering operations.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster: no fixpoint after {rounds} rounds")]
    NonConvergence { rounds: usize },

    #[error("cluster: worker pool: {0}")]
    Pool(String),

    #[error("cluster: {0}")]
    Vector(#[from] VecError),
}
