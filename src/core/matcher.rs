use crate::core::{
    eligibility::{eligible_pools, validate_params},
    engine::find_assignment,
    history::{historical_pairs, HistoryIndex},
};
use crate::error::MatchError;
use crate::models::{DenyEntry, HistoryRecord, MatchParams, MatchReport, Person};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

pub const BUDGET_EXHAUSTED_NOTICE: &str = "maximum iterations reached without finding a solution";

/// Main matchmaking orchestrator
///
/// # Pipeline Stages
/// 1. Parameter validation
/// 2. History indexing
/// 3. Deny-list, gender and duplicate filtering
/// 4. Overdated filtering against the unfiltered opposite pools
/// 5. Randomized pairing with repeat avoidance
///
/// The matchmaker never touches files, the clock or process arguments; all
/// inputs arrive as parameters.
#[derive(Debug, Clone, Default)]
pub struct Matchmaker {
    params: MatchParams,
}

impl Matchmaker {
    pub fn new(params: MatchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Produce a new set of pairs
    ///
    /// Uses a generator seeded from `params.seed` when set, otherwise from
    /// OS entropy.
    ///
    /// # Arguments
    /// * `registrations` - Everyone who opted in to this run
    /// * `history` - Every pair produced by earlier runs
    /// * `deny_list` - Registrants that must never be paired, if any
    ///
    /// # Returns
    /// MatchReport with the pairs and the notices explaining who was left out
    pub fn make_matches(
        &self,
        registrations: &[Person],
        history: &[HistoryRecord],
        deny_list: Option<&[DenyEntry]>,
    ) -> Result<MatchReport, MatchError> {
        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.make_matches_with_rng(registrations, history, deny_list, &mut rng)
    }

    /// Same as `make_matches`, drawing shuffles from the supplied generator
    pub fn make_matches_with_rng<R: Rng + ?Sized>(
        &self,
        registrations: &[Person],
        history: &[HistoryRecord],
        deny_list: Option<&[DenyEntry]>,
        rng: &mut R,
    ) -> Result<MatchReport, MatchError> {
        validate_params(&self.params)?;

        let index = HistoryIndex::build(history);
        let past_pairs = historical_pairs(history);
        let mut diagnostics = Vec::new();

        let pools = eligible_pools(registrations, deny_list, &index, &self.params, &mut diagnostics)?;

        info!(
            registrations = registrations.len(),
            history = history.len(),
            eligible_males = pools.males.len(),
            eligible_females = pools.females.len(),
            "Eligibility filtering complete"
        );

        let assignment = find_assignment(
            &pools.males,
            &pools.females,
            &past_pairs,
            self.params.max_iterations,
            rng,
        )?;

        if assignment.exhausted {
            diagnostics.push(BUDGET_EXHAUSTED_NOTICE.to_string());
        }

        info!(
            pairs = assignment.pairs.len(),
            attempts = assignment.attempts,
            exhausted = assignment.exhausted,
            "Matchmaking complete"
        );

        Ok(MatchReport {
            pairs: assignment.pairs,
            diagnostics,
            attempts: assignment.attempts,
            budget_exhausted: assignment.exhausted,
            eligible_males: pools.males.len(),
            eligible_females: pools.females.len(),
        })
    }
}
