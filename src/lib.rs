//! Random Matchmaker - one-to-one pairing for recurring events
//!
//! This library pairs registrants from two groups at random while avoiding
//! every pair made in earlier runs. Registrants who have already been paired
//! with too much of the opposite group are left out with a notice.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod runner;
pub mod tables;

// Re-export commonly used types
pub use crate::core::{Identity, Matchmaker};
pub use error::{MatchError, RunError, TableError};
pub use models::{DenyEntry, Gender, HistoryRecord, MatchParams, MatchReport, Pair, Person};
