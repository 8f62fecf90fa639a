//! Aggregation Engine
//! Groups players by (country, position), reduces market values to one
//! statistic per pair and derives the display orderings.

use crate::data::PlayerTable;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Reduction applied to the market values of one (country, position) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Max,
    Mean,
}

impl Statistic {
    /// Reduce a set of values. `None` when the set is empty.
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Statistic::Max => values.iter().copied().reduce(f64::max),
            Statistic::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Max => f.write_str("Highest"),
            Statistic::Mean => f.write_str("Average"),
        }
    }
}

/// Country x position matrix of a single statistic.
///
/// Rows and columns keep first-encounter order from the source table. Cells
/// are `None` where the pair was never observed with a usable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

/// An entry of a ranking together with the value it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub name: String,
    pub best: Option<f64>,
}

impl AggregateMatrix {
    /// Build a matrix from explicit labels and cells.
    ///
    /// Each inner vector must have one entry per column.
    pub fn from_cells(
        rows: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(rows.len(), cells.len());
        debug_assert!(cells.iter().all(|row| row.len() == columns.len()));
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|name| name == row)?;
        let c = self.columns.iter().position(|name| name == column)?;
        self.cells[r][c]
    }

    /// Present cells of one row as (column, value).
    #[cfg(test)]
    pub fn row_entries(&self, row: &str) -> Vec<(&str, f64)> {
        let Some(r) = self.rows.iter().position(|name| name == row) else {
            return Vec::new();
        };
        self.columns
            .iter()
            .zip(&self.cells[r])
            .filter_map(|(col, cell)| cell.map(|v| (col.as_str(), v)))
            .collect()
    }

    /// Values of one column following the given row order; absent rows are `None`.
    pub fn column_values(&self, column: &str, row_order: &[Ranked]) -> Vec<Option<f64>> {
        row_order
            .iter()
            .map(|row| self.get(&row.name, column))
            .collect()
    }

    /// Number of present cells.
    pub fn present_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Largest present value anywhere in the matrix.
    pub fn max_value(&self) -> Option<f64> {
        self.cells.iter().flatten().flatten().copied().reduce(f64::max)
    }

    /// Nested country -> (position -> value) view, only present cells.
    pub fn to_nested(&self) -> HashMap<String, HashMap<String, f64>> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(r, row)| {
                let inner: HashMap<String, f64> = self
                    .columns
                    .iter()
                    .zip(&self.cells[r])
                    .filter_map(|(col, cell)| cell.map(|v| (col.clone(), v)))
                    .collect();
                (!inner.is_empty()).then(|| (row.clone(), inner))
            })
            .collect()
    }
}

/// Partition rows by (country, position), reduce each partition and reshape.
///
/// Rows lacking a country, a position or a usable market value do not create
/// partitions. An empty table gives an empty matrix.
pub fn aggregate(table: &PlayerTable, statistic: Statistic) -> AggregateMatrix {
    let mut rows: Vec<String> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();
    let mut col_index: HashMap<&str, usize> = HashMap::new();
    let mut partitions: HashMap<(usize, usize), Vec<f64>> = HashMap::new();

    for record in table.iter() {
        let (Some(country), Some(position), Some(value)) = (
            record.country_of_birth.as_deref(),
            record.position.as_deref(),
            record.value(),
        ) else {
            continue;
        };

        let r = *row_index.entry(country).or_insert_with(|| {
            rows.push(country.to_string());
            rows.len() - 1
        });
        let c = *col_index.entry(position).or_insert_with(|| {
            columns.push(position.to_string());
            columns.len() - 1
        });
        partitions.entry((r, c)).or_default().push(value);
    }

    let mut cells = vec![vec![None; columns.len()]; rows.len()];
    for ((r, c), values) in &partitions {
        cells[*r][*c] = statistic.reduce(values);
    }

    AggregateMatrix {
        rows,
        columns,
        cells,
    }
}

/// Rows ordered by their best value, descending. Rows with no present cell go
/// last; ties keep matrix order.
pub fn rank_rows(matrix: &AggregateMatrix) -> Vec<Ranked> {
    let ranked = matrix
        .rows
        .iter()
        .zip(&matrix.cells)
        .map(|(name, cells)| Ranked {
            name: name.clone(),
            best: cells.iter().flatten().copied().reduce(f64::max),
        })
        .collect();
    sort_descending(ranked)
}

/// Columns ordered by their best value, descending, same tie rule as rows.
pub fn rank_columns(matrix: &AggregateMatrix) -> Vec<Ranked> {
    let ranked = matrix
        .columns
        .iter()
        .enumerate()
        .map(|(c, name)| Ranked {
            name: name.clone(),
            best: matrix
                .cells
                .iter()
                .filter_map(|row| row[c])
                .reduce(f64::max),
        })
        .collect();
    sort_descending(ranked)
}

fn sort_descending(mut ranked: Vec<Ranked>) -> Vec<Ranked> {
    // sort_by is stable
    ranked.sort_by(|a, b| compare_best(a.best, b.best));
    ranked
}

fn compare_best(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Names of a ranking, in order.
pub fn names(ranking: &[Ranked]) -> Vec<String> {
    ranking.iter().map(|r| r.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PlayerFilter, PlayerRecord, Selection};

    fn scenario() -> PlayerTable {
        PlayerTable::from_records(vec![
            PlayerRecord::new("Brazil", "Forward", 100.0),
            PlayerRecord::new("Brazil", "Forward", 50.0),
            PlayerRecord::new("France", "Defender", 80.0),
        ])
    }

    #[test]
    fn mean_matrix_and_row_ranking() {
        let matrix = aggregate(&scenario(), Statistic::Mean);

        let mut expected = HashMap::new();
        expected.insert(
            "Brazil".to_string(),
            HashMap::from([("Forward".to_string(), 75.0)]),
        );
        expected.insert(
            "France".to_string(),
            HashMap::from([("Defender".to_string(), 80.0)]),
        );
        assert_eq!(matrix.to_nested(), expected);
        assert_eq!(matrix.get("Brazil", "Defender"), None);

        let ranking = rank_rows(&matrix);
        assert_eq!(names(&ranking), vec!["France", "Brazil"]);
        assert_eq!(ranking[0].best, Some(80.0));
        assert_eq!(ranking[1].best, Some(75.0));
    }

    #[test]
    fn filtered_max_scenario() {
        let filter = PlayerFilter::new(Selection::only(["France"]), Selection::All);
        let filtered = filter.apply(&scenario());
        let matrix = aggregate(&filtered, Statistic::Max);

        assert_eq!(matrix.rows(), &["France".to_string()]);
        assert_eq!(matrix.get("France", "Defender"), Some(80.0));
        assert_eq!(names(&rank_rows(&matrix)), vec!["France"]);
    }

    #[test]
    fn max_uses_largest_value() {
        let matrix = aggregate(&scenario(), Statistic::Max);
        assert_eq!(matrix.get("Brazil", "Forward"), Some(100.0));
        assert_eq!(names(&rank_rows(&matrix)), vec!["Brazil", "France"]);
        assert_eq!(names(&rank_columns(&matrix)), vec!["Forward", "Defender"]);
    }

    #[test]
    fn empty_table_gives_empty_results() {
        let matrix = aggregate(&PlayerTable::default(), Statistic::Mean);
        assert!(matrix.is_empty());
        assert!(matrix.columns().is_empty());
        assert!(rank_rows(&matrix).is_empty());
        assert!(rank_columns(&matrix).is_empty());
        assert_eq!(matrix.max_value(), None);
    }

    #[test]
    fn pairs_without_values_are_absent() {
        let table = PlayerTable::from_records(vec![
            PlayerRecord {
                market_value_in_eur: None,
                ..PlayerRecord::new("Chile", "Goalkeeper", 0.0)
            },
            PlayerRecord {
                market_value_in_eur: Some(f64::NAN),
                ..PlayerRecord::new("Chile", "Goalkeeper", 0.0)
            },
            PlayerRecord::new("Peru", "Goalkeeper", 5.0),
        ]);

        for statistic in [Statistic::Max, Statistic::Mean] {
            let matrix = aggregate(&table, statistic);
            assert_eq!(matrix.rows(), &["Peru".to_string()]);
            assert_eq!(matrix.present_count(), 1);
        }
    }

    #[test]
    fn mean_ignores_missing_values_in_partition() {
        let table = PlayerTable::from_records(vec![
            PlayerRecord::new("Ghana", "Midfield", 10.0),
            PlayerRecord {
                market_value_in_eur: None,
                ..PlayerRecord::new("Ghana", "Midfield", 0.0)
            },
            PlayerRecord::new("Ghana", "Midfield", 30.0),
        ]);
        let matrix = aggregate(&table, Statistic::Mean);
        assert_eq!(matrix.get("Ghana", "Midfield"), Some(20.0));
    }

    #[test]
    fn ties_keep_encounter_order() {
        let table = PlayerTable::from_records(vec![
            PlayerRecord::new("Italy", "Defender", 40.0),
            PlayerRecord::new("Japan", "Forward", 40.0),
            PlayerRecord::new("Korea", "Forward", 90.0),
            PlayerRecord::new("Egypt", "Midfield", 40.0),
        ]);
        let matrix = aggregate(&table, Statistic::Max);

        assert_eq!(
            names(&rank_rows(&matrix)),
            vec!["Korea", "Italy", "Japan", "Egypt"]
        );
        assert_eq!(
            names(&rank_columns(&matrix)),
            vec!["Forward", "Defender", "Midfield"]
        );
    }

    #[test]
    fn empty_rows_and_columns_rank_last() {
        let matrix = AggregateMatrix::from_cells(
            vec!["A".into(), "B".into(), "C".into()],
            vec!["x".into(), "y".into()],
            vec![
                vec![None, None],
                vec![Some(1.0), None],
                vec![Some(3.0), None],
            ],
        );

        let rows = rank_rows(&matrix);
        assert_eq!(names(&rows), vec!["C", "B", "A"]);
        assert_eq!(rows[2].best, None);
        assert_eq!(names(&rank_columns(&matrix)), vec!["x", "y"]);
    }

    #[test]
    fn column_values_follow_row_order() {
        let matrix = aggregate(&scenario(), Statistic::Max);
        let order = rank_rows(&matrix);
        assert_eq!(
            matrix.column_values("Defender", &order),
            vec![None, Some(80.0)]
        );
    }

    #[test]
    fn ranking_length_matches_distinct_keys() {
        let table = PlayerTable::from_records(vec![
            PlayerRecord::new("A", "p", 1.0),
            PlayerRecord::new("B", "q", 2.0),
            PlayerRecord::new("A", "r", 3.0),
            PlayerRecord::new("C", "p", 4.0),
        ]);
        let matrix = aggregate(&table, Statistic::Mean);
        assert_eq!(rank_rows(&matrix).len(), 3);
        assert_eq!(rank_columns(&matrix).len(), 3);
        assert_eq!(matrix.row_entries("A"), vec![("p", 1.0), ("r", 3.0)]);
    }
}
