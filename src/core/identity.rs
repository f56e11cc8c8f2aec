use crate::models::{Pair, Person};
use std::fmt;

/// Canonical key for a registrant: the (first name, last name) tuple
///
/// Fields are kept separate rather than concatenated, so "Ann" + "Marie" and
/// "AnnMarie" + "" are different people. Comparison is exact: case and
/// surrounding whitespace are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    first: String,
    last: String,
}

impl Identity {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

impl Person {
    pub fn identity(&self) -> Identity {
        Identity::new(&self.first_name, &self.last_name)
    }
}

impl Pair {
    pub fn male_identity(&self) -> Identity {
        Identity::new(&self.male_first_name, &self.male_last_name)
    }

    pub fn female_identity(&self) -> Identity {
        Identity::new(&self.female_first_name, &self.female_last_name)
    }
}
