use crate::core::identity::Identity;
use crate::models::{HistoryRecord, Pair};
use std::collections::{HashMap, HashSet};

/// Who has already been paired with whom, in both directions
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    partners: HashMap<Identity, HashSet<Identity>>,
}

impl HistoryIndex {
    /// Build the index from past pair records
    ///
    /// Repeated records collapse naturally; the record date is ignored.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let mut partners: HashMap<Identity, HashSet<Identity>> = HashMap::new();

        for record in records {
            let male = record.pair.male_identity();
            let female = record.pair.female_identity();

            partners.entry(male.clone()).or_default().insert(female.clone());
            partners.entry(female).or_default().insert(male);
        }

        Self { partners }
    }

    /// Everyone `identity` has been paired with. Unknown identities have no partners.
    pub fn partners<'a>(&'a self, identity: &Identity) -> impl Iterator<Item = &'a Identity> + 'a {
        self.partners.get(identity).into_iter().flatten()
    }

    /// Size of the intersection between `identity`'s past partners and `pool`
    pub fn dated_within(&self, identity: &Identity, pool: &HashSet<Identity>) -> usize {
        self.partners(identity)
            .filter(|partner| pool.contains(*partner))
            .count()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.partners.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

/// Every pair that has ever been produced, for repeat detection
pub fn historical_pairs<'a, I>(records: I) -> HashSet<Pair>
where
    I: IntoIterator<Item = &'a HistoryRecord>,
{
    records.into_iter().map(|record| record.pair.clone()).collect()
}
