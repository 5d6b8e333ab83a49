//! Univariate classification with Jenks natural breaks.
//!
//! [`natural_breaks`] splits sorted 1-D data into classes minimizing the
//! within-class variance. Large inputs can be reduced first with
//! [`natural_breaks_subset`]. [`classify_accounts`] uses the breaks to
//! tier accounts by how often they post.

mod error;
mod natural;
mod tiers;

pub use error::JenksError;
pub use natural::{Subset, natural_breaks, natural_breaks_subset};
pub use tiers::{AccountTiers, Matcher, TierConfig, WordList, classify_accounts};
