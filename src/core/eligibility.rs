use crate::core::history::HistoryIndex;
use crate::core::identity::Identity;
use crate::error::MatchError;
use crate::models::{DenyEntry, DuplicatePolicy, Gender, MatchParams, Person, UnknownGenderPolicy};
use std::collections::HashSet;
use tracing::debug;

/// Why a registrant was left out of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Has already been paired with every eligible member of the opposite pool
    DatedEveryone,
    /// Has been paired with more than the threshold fraction of the opposite pool
    DatedTooMany,
}

impl ExclusionReason {
    fn describe(self) -> &'static str {
        match self {
            ExclusionReason::DatedEveryone => "has already dated everyone on the list and will be excluded.",
            ExclusionReason::DatedTooMany => "has already dated enough people on the list and will be excluded.",
        }
    }
}

/// Registrants that survived every filter, per gender
#[derive(Debug, Clone, Default)]
pub struct EligiblePools {
    pub males: Vec<Person>,
    pub females: Vec<Person>,
}

/// Check the run parameters before any filtering happens
pub fn validate_params(params: &MatchParams) -> Result<(), MatchError> {
    if params.max_iterations <= 1 {
        return Err(MatchError::InvalidParameter(format!(
            "max_iterations must be greater than one, got {}",
            params.max_iterations
        )));
    }

    // Written as a negated range check so NaN is rejected too
    if !(params.threshold > 0.0 && params.threshold <= 1.0) {
        return Err(MatchError::InvalidParameter(format!(
            "threshold must be in (0, 1], got {}",
            params.threshold
        )));
    }

    Ok(())
}

/// Drop deny-listed registrants
///
/// Rows are compared on all three fields, so a deny entry with the right name
/// but a different gender excludes nobody. Exact duplicate registrations are
/// collapsed here as well, keeping the first occurrence.
pub fn remove_denied(registrations: &[Person], deny_list: Option<&[DenyEntry]>) -> Vec<Person> {
    let denied: HashSet<&DenyEntry> = deny_list.unwrap_or_default().iter().collect();
    let mut seen: HashSet<&Person> = HashSet::with_capacity(registrations.len());

    registrations
        .iter()
        .filter(|person| !denied.contains(*person))
        .filter(|person| seen.insert(*person))
        .cloned()
        .collect()
}

/// Partition registrants into male and female pools
///
/// Registrants with any other gender value end up in neither pool, or fail
/// the run under `UnknownGenderPolicy::Reject`.
pub fn split_by_gender(
    clean: Vec<Person>,
    policy: UnknownGenderPolicy,
    diagnostics: &mut Vec<String>,
) -> Result<(Vec<Person>, Vec<Person>), MatchError> {
    let mut males = Vec::new();
    let mut females = Vec::new();

    for person in clean {
        if let Gender::Other(value) = &person.gender {
            match policy {
                UnknownGenderPolicy::Exclude => {
                    let notice = format!(
                        "{} has unrecognized gender {:?} and will be excluded.",
                        person.identity(),
                        value
                    );
                    debug!("{}", notice);
                    diagnostics.push(notice);
                    continue;
                }
                UnknownGenderPolicy::Reject => {
                    return Err(MatchError::UnrecognizedGender {
                        first: person.first_name.clone(),
                        last: person.last_name.clone(),
                        gender: value.clone(),
                    });
                }
            }
        }

        if person.gender == Gender::Male {
            males.push(person);
        } else {
            females.push(person);
        }
    }

    Ok((males, females))
}

/// Resolve registrants of one gender who share a name
pub fn dedupe_identities(
    pool: Vec<Person>,
    policy: DuplicatePolicy,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<Person>, MatchError> {
    let mut seen: HashSet<Identity> = HashSet::with_capacity(pool.len());
    let mut unique = Vec::with_capacity(pool.len());

    for person in pool {
        let identity = person.identity();
        if seen.contains(&identity) {
            match policy {
                DuplicatePolicy::Merge => {
                    let notice = format!("{} is registered more than once and will be counted once.", identity);
                    debug!("{}", notice);
                    diagnostics.push(notice);
                    continue;
                }
                DuplicatePolicy::Reject => {
                    return Err(MatchError::DuplicateIdentity {
                        identity: identity.to_string(),
                        gender: person.gender,
                    });
                }
            }
        }
        seen.insert(identity);
        unique.push(person);
    }

    Ok(unique)
}

/// Identity keys of everyone in `pool`
pub fn identities(pool: &[Person]) -> HashSet<Identity> {
    pool.iter().map(Person::identity).collect()
}

/// Decide whether someone who dated `dated` of `opposite` people is overdated
///
/// The threshold comparison is strict: dating exactly `threshold` of the
/// opposite pool is still allowed.
#[inline]
pub fn exclusion_reason(dated: usize, opposite: usize, threshold: f64) -> Option<ExclusionReason> {
    if dated == opposite {
        Some(ExclusionReason::DatedEveryone)
    } else if dated as f64 > opposite as f64 * threshold {
        Some(ExclusionReason::DatedTooMany)
    } else {
        None
    }
}

/// Drop everyone in `pool` who has already dated too much of `opposite`
///
/// An empty opposite pool excludes nobody; the pairing engine reports that
/// side as empty instead.
pub fn filter_overdated(
    pool: Vec<Person>,
    opposite: &HashSet<Identity>,
    index: &HistoryIndex,
    threshold: f64,
    diagnostics: &mut Vec<String>,
) -> Vec<Person> {
    if opposite.is_empty() {
        return pool;
    }

    pool.into_iter()
        .filter(|person| {
            let identity = person.identity();
            let dated = index.dated_within(&identity, opposite);

            match exclusion_reason(dated, opposite.len(), threshold) {
                Some(reason) => {
                    let notice = format!("{} {}", identity, reason.describe());
                    debug!(dated, opposite = opposite.len(), "{}", notice);
                    diagnostics.push(notice);
                    false
                }
                None => true,
            }
        })
        .collect()
}

/// Run every eligibility stage and return the surviving pools
///
/// Both overdated filters measure against the opposite pool as it stood
/// before either filter ran.
pub fn eligible_pools(
    registrations: &[Person],
    deny_list: Option<&[DenyEntry]>,
    index: &HistoryIndex,
    params: &MatchParams,
    diagnostics: &mut Vec<String>,
) -> Result<EligiblePools, MatchError> {
    let clean = remove_denied(registrations, deny_list);
    let (males, females) = split_by_gender(clean, params.unknown_gender, diagnostics)?;
    let males = dedupe_identities(males, params.duplicate_names, diagnostics)?;
    let females = dedupe_identities(females, params.duplicate_names, diagnostics)?;

    let male_ids = identities(&males);
    let female_ids = identities(&females);

    let males = filter_overdated(males, &female_ids, index, params.threshold, diagnostics);
    let females = filter_overdated(females, &male_ids, index, params.threshold, diagnostics);

    Ok(EligiblePools { males, females })
}
