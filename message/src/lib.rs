//! Message model and per-epoch analysis context.
//!
//! A [`Message`] is owned by the caller and read by every stage of the
//! pipeline. The only state a stage may attach is the processed text, which
//! is computed once and cached on the message.
//!
//! [`AnalysisContext`] carries the dominant language, dominant keyword and
//! known location names for one analysis epoch. It is passed explicitly to
//! every stage that needs it.

mod analysis;
mod context;
mod message;

pub use analysis::{DatasetProfile, analyze_dataset};
pub use context::AnalysisContext;
pub use message::Message;
