use std::sync::Arc;

use floodlens_message::Message;
use floodlens_text::Cleaner;

use crate::error::VecError;
use crate::sparse::SparseVector;
use crate::vectorizer::Vectorizer;

/// Mean cosine similarity of every vector but the last against every
/// vector, the last included.
///
/// This is the mean of the `(n-1) × n` similarity matrix, diagonal
/// entries included. Fewer than two vectors have no pair and yield 0.
/// Non-negative weights keep the result in `[0, 1]`.
pub fn cohesion(vectors: &[SparseVector]) -> f64 {
    let n = vectors.len();
    if n < 2 {
        return 0.0;
    }

    // Σ_i Σ_j cos(v_i, v_j) = (Σ_i u_i) · (Σ_j u_j) for unit vectors u.
    let mut rows: Vec<f64> = Vec::new();
    let mut all: Vec<f64> = Vec::new();
    for (i, v) in vectors.iter().enumerate() {
        let norm = v.norm();
        if norm == 0.0 {
            continue;
        }
        v.add_to(&mut all, 1.0 / norm);
        if i + 1 < n {
            v.add_to(&mut rows, 1.0 / norm);
        }
    }
    let total: f64 = rows.iter().zip(all.iter()).map(|(a, b)| a * b).sum();
    (total / ((n - 1) * n) as f64).clamp(0.0, 1.0)
}

/// Cohesion of a message set over raw n-gram counts.
pub fn message_cohesion(messages: &[Arc<Message>], cleaner: &Cleaner) -> Result<f64, VecError> {
    if messages.len() < 2 {
        return Ok(0.0);
    }
    let matrix = Vectorizer::counts().vectorize_messages(messages, cleaner)?;
    Ok(cohesion(&matrix.rows))
}
