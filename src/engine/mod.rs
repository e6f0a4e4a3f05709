pub mod comparison;
pub mod level;
pub mod ranks;
pub mod resolver;

pub use comparison::ComparisonEngine;
pub use level::{estimate_level, experience_for_level};
pub use ranks::compute_ranks;
pub use resolver::{HistoricalResolver, ResolvedSnapshot};
