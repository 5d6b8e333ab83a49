//! Text features for short messages.
//!
//! - [`Pattern`]: the fixed set of expressions (times, dates, water heights,
//!   mentions, ...) shared by cleaning, scoring and account tiering.
//! - [`Cleaner`]: rewrites a message into the marker-enriched form used for
//!   vectorization and caches the result on the message.

mod clean;
mod pattern;
mod stem;

pub use clean::{Cleaner, replace_last};
pub use pattern::Pattern;
pub use stem::stemmer_for;
