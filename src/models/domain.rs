use serde::{Deserialize, Serialize};
use std::fmt;

/// Recorded gender of a registrant
///
/// Only the exact lowercase strings `male` and `female` are recognized.
/// Anything else is kept verbatim as `Other` so the eligibility filter can
/// decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other(value) => value,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other(value),
        }
    }
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        Gender::from(value.to_string())
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registrant who opted in to the current run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub gender: Gender,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
        }
    }

    pub fn male(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::new(first_name, last_name, Gender::Male)
    }

    pub fn female(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::new(first_name, last_name, Gender::Female)
    }
}

/// Deny-list rows have the same shape as registrations and are matched on
/// all three fields.
pub type DenyEntry = Person;

/// A new or historical pairing of one male and one female registrant
///
/// Equality (and therefore repeat detection) uses only the four name fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    #[serde(rename = "maleFirstName")]
    pub male_first_name: String,
    #[serde(rename = "maleLastName")]
    pub male_last_name: String,
    #[serde(rename = "femaleFirstName")]
    pub female_first_name: String,
    #[serde(rename = "femaleLastName")]
    pub female_last_name: String,
}

impl Pair {
    pub fn new(male: &Person, female: &Person) -> Self {
        Self {
            male_first_name: male.first_name.clone(),
            male_last_name: male.last_name.clone(),
            female_first_name: female.first_name.clone(),
            female_last_name: female.last_name.clone(),
        }
    }
}

/// A pair produced by some earlier run
///
/// The date is carried through untouched; matching never looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub date: String,
    #[serde(flatten)]
    pub pair: Pair,
}

impl HistoryRecord {
    pub fn new(date: impl Into<String>, pair: Pair) -> Self {
        Self {
            date: date.into(),
            pair,
        }
    }
}

/// What to do with registrants whose gender is neither `male` nor `female`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownGenderPolicy {
    /// Drop them from both pools with a diagnostic
    #[default]
    Exclude,
    /// Fail the run with `MatchError::UnrecognizedGender`
    Reject,
}

/// What to do when two registrants of the same gender share a name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Treat them as one person and keep the first row
    #[default]
    Merge,
    /// Fail the run with `MatchError::DuplicateIdentity`
    Reject,
}

pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Tunables for a single matchmaking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    #[serde(rename = "maxIterations", default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(rename = "unknownGender", default)]
    pub unknown_gender: UnknownGenderPolicy,
    #[serde(rename = "duplicateNames", default)]
    pub duplicate_names: DuplicatePolicy,
}

fn default_max_iterations() -> usize { DEFAULT_MAX_ITERATIONS }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            threshold: DEFAULT_THRESHOLD,
            seed: None,
            unknown_gender: UnknownGenderPolicy::default(),
            duplicate_names: DuplicatePolicy::default(),
        }
    }
}

/// Outcome of a matchmaking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub pairs: Vec<Pair>,
    /// Human-readable notices: one per excluded registrant, plus one if the
    /// iteration budget ran out
    pub diagnostics: Vec<String>,
    pub attempts: usize,
    #[serde(rename = "budgetExhausted")]
    pub budget_exhausted: bool,
    #[serde(rename = "eligibleMales")]
    pub eligible_males: usize,
    #[serde(rename = "eligibleFemales")]
    pub eligible_females: usize,
}
