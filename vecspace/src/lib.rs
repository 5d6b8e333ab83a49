pub mod cohesion;
pub mod cosine;
pub mod error;
pub mod sparse;
pub mod vectorizer;

pub use cohesion::{cohesion, message_cohesion};
pub use cosine::cosine_similarity;
pub use error::VecError;
pub use sparse::SparseVector;
pub use vectorizer::{TermMatrix, Vectorizer, VectorizerConfig};
