// Core algorithm exports
pub mod eligibility;
pub mod engine;
pub mod history;
pub mod identity;
pub mod matcher;

pub use eligibility::{eligible_pools, filter_overdated, remove_denied, split_by_gender, validate_params, EligiblePools, ExclusionReason};
pub use engine::{find_assignment, Assignment};
pub use history::{historical_pairs, HistoryIndex};
pub use identity::Identity;
pub use matcher::{Matchmaker, BUDGET_EXHAUSTED_NOTICE};
