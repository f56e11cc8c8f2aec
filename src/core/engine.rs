use crate::error::MatchError;
use crate::models::{Gender, Pair, Person};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Pairs chosen by the engine and how hard it had to look for them
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub pairs: Vec<Pair>,
    /// Number of shuffles evaluated, including the accepted one
    pub attempts: usize,
    /// True when no attempt was free of repeats and `pairs` is the last attempt
    pub exhausted: bool,
}

/// Return a uniformly shuffled copy of `pool`
pub fn shuffled<T: Clone, R: Rng + ?Sized>(pool: &[T], rng: &mut R) -> Vec<T> {
    let mut order = pool.to_vec();
    order.shuffle(rng);
    order
}

/// Pair the two sequences position by position
///
/// The longer side's surplus gets no partner.
#[inline]
pub fn align(males: &[Person], females: &[Person]) -> Vec<Pair> {
    males
        .iter()
        .zip(females.iter())
        .map(|(male, female)| Pair::new(male, female))
        .collect()
}

/// Count pairs that already appear in history
#[inline]
pub fn count_repeats(pairs: &[Pair], history_pairs: &HashSet<Pair>) -> usize {
    pairs.iter().filter(|pair| history_pairs.contains(*pair)).count()
}

/// Search for a pairing that repeats nothing from history
///
/// Each attempt shuffles both pools independently and aligns them. The first
/// attempt with no historical repeats is accepted. If every attempt repeats
/// something, the last attempt is returned with `exhausted` set; callers that
/// need a strict guarantee must check for repeats themselves.
pub fn find_assignment<R: Rng + ?Sized>(
    males: &[Person],
    females: &[Person],
    history_pairs: &HashSet<Pair>,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Assignment, MatchError> {
    if males.is_empty() {
        return Err(MatchError::InsufficientParticipants { side: Gender::Male });
    }
    if females.is_empty() {
        return Err(MatchError::InsufficientParticipants { side: Gender::Female });
    }
    if max_iterations == 0 {
        return Err(MatchError::InvalidParameter("max_iterations must be positive".to_string()));
    }

    let mut pairs = Vec::new();

    for attempt in 1..=max_iterations {
        let male_order = shuffled(males, rng);
        let female_order = shuffled(females, rng);
        pairs = align(&male_order, &female_order);

        let repeats = count_repeats(&pairs, history_pairs);
        if repeats == 0 {
            debug!(attempt, pairs = pairs.len(), "Found repeat-free assignment");
            return Ok(Assignment {
                pairs,
                attempts: attempt,
                exhausted: false,
            });
        }

        debug!(attempt, repeats, "Assignment repeats past pairs, reshuffling");
    }

    warn!(max_iterations, "Maximum iterations reached without finding a solution");

    Ok(Assignment {
        pairs,
        attempts: max_iterations,
        exhausted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn males() -> Vec<Person> {
        vec![Person::male("Al", "A"), Person::male("Bo", "B"), Person::male("Ed", "E")]
    }

    fn females() -> Vec<Person> {
        vec![Person::female("Cy", "C"), Person::female("Di", "D")]
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<u32> = (0..50).collect();
        let mut order = shuffled(&pool, &mut rng);
        order.sort_unstable();
        assert_eq!(order, pool);
    }

    #[test]
    fn test_align_truncates_to_shorter_side() {
        let pairs = align(&males(), &females());
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], Pair::new(&Person::male("Al", "A"), &Person::female("Cy", "C")));
        assert_eq!(pairs[1], Pair::new(&Person::male("Bo", "B"), &Person::female("Di", "D")));
    }

    #[test]
    fn test_empty_pools_are_rejected_by_side() {
        let mut rng = StdRng::seed_from_u64(1);
        let none = HashSet::new();

        let err = find_assignment(&[], &females(), &none, 10, &mut rng).unwrap_err();
        assert_eq!(err, MatchError::InsufficientParticipants { side: Gender::Male });

        let err = find_assignment(&males(), &[], &none, 10, &mut rng).unwrap_err();
        assert_eq!(err, MatchError::InsufficientParticipants { side: Gender::Female });
    }

    #[test]
    fn test_no_history_accepts_first_attempt() {
        let mut rng = StdRng::seed_from_u64(3);
        let assignment = find_assignment(&males(), &females(), &HashSet::new(), 10, &mut rng).unwrap();

        assert_eq!(assignment.attempts, 1);
        assert!(!assignment.exhausted);
        assert_eq!(assignment.pairs.len(), 2);
    }

    #[test]
    fn test_unavoidable_repeat_exhausts_budget() {
        let al = Person::male("Al", "A");
        let cy = Person::female("Cy", "C");
        let history: HashSet<Pair> = [Pair::new(&al, &cy)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(11);

        let assignment = find_assignment(&[al.clone()], &[cy.clone()], &history, 5, &mut rng).unwrap();

        assert!(assignment.exhausted);
        assert_eq!(assignment.attempts, 5);
        assert_eq!(assignment.pairs, vec![Pair::new(&al, &cy)]);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let history = HashSet::new();
        let first = find_assignment(&males(), &females(), &history, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = find_assignment(&males(), &females(), &history, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }
}
