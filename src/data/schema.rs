//! Schema Capabilities Module
//! Decides once, right after loading, which analyses the column set supports.

use std::collections::BTreeSet;
use std::fmt;

pub const COUNTRY_COL: &str = "country_of_birth";
pub const POSITION_COL: &str = "position";
pub const VALUE_COL: &str = "market_value_in_eur";
pub const BIRTH_DATE_COL: &str = "date_of_birth";

/// One independent analysis unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Analysis {
    Overview,
    ValueSummary,
    ValueDistribution,
    PositionBreakdown,
    AgeDistribution,
    CountryPositionValues,
}

impl Analysis {
    pub const ALL: [Analysis; 6] = [
        Analysis::Overview,
        Analysis::ValueSummary,
        Analysis::ValueDistribution,
        Analysis::PositionBreakdown,
        Analysis::AgeDistribution,
        Analysis::CountryPositionValues,
    ];

    /// Columns the analysis reads.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Analysis::Overview => &[],
            Analysis::ValueSummary | Analysis::ValueDistribution => &[VALUE_COL],
            Analysis::PositionBreakdown => &[POSITION_COL],
            Analysis::AgeDistribution => &[BIRTH_DATE_COL],
            Analysis::CountryPositionValues => &[COUNTRY_COL, POSITION_COL, VALUE_COL],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Analysis::Overview => "Dataset Overview",
            Analysis::ValueSummary => "Market Value Statistics",
            Analysis::ValueDistribution => "Market Value Distribution",
            Analysis::PositionBreakdown => "Position Distribution",
            Analysis::AgeDistribution => "Age Distribution",
            Analysis::CountryPositionValues => "Market Value by Country and Position",
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Set of analyses the loaded data can feed, plus the columns that were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableAnalyses {
    columns: BTreeSet<String>,
    available: BTreeSet<Analysis>,
}

impl AvailableAnalyses {
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: BTreeSet<String> = columns.into_iter().map(Into::into).collect();
        let available = Analysis::ALL
            .iter()
            .copied()
            .filter(|analysis| {
                analysis
                    .required_columns()
                    .iter()
                    .all(|col| columns.contains(*col))
            })
            .collect();

        Self { columns, available }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn supports(&self, analysis: Analysis) -> bool {
        self.available.contains(&analysis)
    }

    /// First column the analysis needs that the data lacks.
    pub fn missing_column(&self, analysis: Analysis) -> Option<&'static str> {
        analysis
            .required_columns()
            .iter()
            .copied()
            .find(|col| !self.has_column(col))
    }

    pub fn iter(&self) -> impl Iterator<Item = Analysis> + '_ {
        self.available.iter().copied()
    }
}
