//! Filter Stage
//! Restricts the table to selected countries and positions.

use crate::data::table::{PlayerRecord, PlayerTable};
use std::collections::HashSet;

/// Allowed values for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every value present in the data.
    #[default]
    All,
    /// Only the listed values. An empty set admits nothing.
    Only(HashSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Selection::Only(HashSet::new())
    }

    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(allowed) => value.is_some_and(|v| allowed.contains(v)),
        }
    }
}

/// Country and position predicates applied together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerFilter {
    pub countries: Selection,
    pub positions: Selection,
}

impl PlayerFilter {
    pub fn new(countries: Selection, positions: Selection) -> Self {
        Self {
            countries,
            positions,
        }
    }

    pub fn matches(&self, record: &PlayerRecord) -> bool {
        self.countries.admits(record.country_of_birth.as_deref())
            && self.positions.admits(record.position.as_deref())
    }

    /// Rows satisfying both predicates, in their original order.
    pub fn apply(&self, table: &PlayerTable) -> PlayerTable {
        let records = table
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        PlayerTable::new(records, table.available().clone())
    }
}
