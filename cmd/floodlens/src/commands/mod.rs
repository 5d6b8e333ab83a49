//! Command implementations.

mod analyze;
mod tiers;

pub use analyze::AnalyzeCommand;
pub use tiers::TiersCommand;
