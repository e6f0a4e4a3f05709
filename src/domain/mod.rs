pub mod models;

pub use models::{ComparisonRow, LookbackWindow, PlayerRecord, Snapshot};
