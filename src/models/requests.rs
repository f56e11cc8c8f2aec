use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{DenyEntry, HistoryRecord, MatchParams, Person};

/// Request to generate a new set of pairs
///
/// History is supplied by the caller; the service keeps no state between
/// requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MakeMatchesRequest {
    #[validate(length(min = 1))]
    pub registrations: Vec<Person>,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default, alias = "deny_list", rename = "denyList")]
    pub deny_list: Option<Vec<DenyEntry>>,
    #[validate(range(min = 2))]
    #[serde(default, alias = "max_iterations", rename = "maxIterations")]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MakeMatchesRequest {
    /// Overlay the request's optional tunables on the service defaults
    pub fn params(&self, defaults: &MatchParams) -> MatchParams {
        MatchParams {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            seed: self.seed.or(defaults.seed),
            ..defaults.clone()
        }
    }
}
