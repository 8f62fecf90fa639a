use chrono::NaiveDate;
use player_market_explorer::analysis::{self, AnalysisOutcome, DashboardView, SkipReason};
use player_market_explorer::config::AppConfig;
use player_market_explorer::data::{
    DataLoader, LoaderError, PlayerFilter, Selection, TableError,
};
use player_market_explorer::report;
use player_market_explorer::stats::{aggregate, rank_columns, rank_rows, Statistic};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const PLAYERS_CSV: &str = "\
player_id,name,country_of_birth,position,market_value_in_eur,date_of_birth
1,Ana,Brazil,Attack,100,2000-01-15 00:00:00
2,Beto,Brazil,Attack,50,1998-03-02 00:00:00
3,Chloe,France,Defender,80,1995-07-20 00:00:00
4,Dario,France,Midfield,,1993-11-11 00:00:00
5,Emil,Spain,Goalkeeper,30,not-a-date
";

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", contents).unwrap();
    path
}

fn bump_mtime(path: &Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

#[test]
fn load_filter_aggregate() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "players.csv", PLAYERS_CSV);

    let data = DataLoader::load_uncached(&path).unwrap();
    assert_eq!(data.table.len(), 5);
    assert_eq!(data.frame.height(), 5);

    let filter = PlayerFilter::new(Selection::only(["Brazil", "France"]), Selection::All);
    let filtered = filter.apply(&data.table);
    assert_eq!(filtered.len(), 4);

    let mean = aggregate(&filtered, Statistic::Mean);
    assert_eq!(mean.get("Brazil", "Attack"), Some(75.0));
    assert_eq!(mean.get("France", "Defender"), Some(80.0));
    // Dario has no market value, so the pair does not exist
    assert_eq!(mean.get("France", "Midfield"), None);
    assert!(!mean.columns().contains(&"Midfield".to_string()));

    let countries: Vec<String> = rank_rows(&mean).into_iter().map(|r| r.name).collect();
    assert_eq!(countries, vec!["France", "Brazil"]);

    let max = aggregate(&filtered, Statistic::Max);
    let positions: Vec<String> = rank_columns(&max).into_iter().map(|r| r.name).collect();
    assert_eq!(positions, vec!["Attack", "Defender"]);
}

#[test]
fn missing_file_is_data_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    let err = DataLoader::load_uncached(&path).unwrap_err();
    assert!(matches!(err, LoaderError::DataNotFound(p) if p == path));

    let mut loader = DataLoader::new();
    assert!(matches!(
        loader.load(&path),
        Err(LoaderError::DataNotFound(_))
    ));
    assert!(loader.get_data().is_none());
    assert_eq!(loader.get_row_count(), 0);
}

#[test]
fn cache_is_reused_until_file_changes() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "players.csv", PLAYERS_CSV);
    let mut loader = DataLoader::new();

    assert_eq!(loader.load(&path).unwrap().table.len(), 5);
    assert_eq!(loader.get_file_path(), Some(path.as_path()));

    // Same file version: served from cache even though the content on disk
    // is replaced with an identical mtime.
    let original_mtime = fs::metadata(&path).unwrap().modified().unwrap();
    fs::write(&path, "country_of_birth,position,market_value_in_eur\nPeru,Attack,1\n").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(original_mtime)
        .unwrap();
    assert_eq!(loader.load(&path).unwrap().table.len(), 5);

    bump_mtime(&path);
    assert_eq!(loader.load(&path).unwrap().table.len(), 1);

    loader.invalidate();
    assert!(loader.get_data().is_none());
    assert_eq!(loader.load(&path).unwrap().table.countries(), vec!["Peru"]);
}

#[test]
fn non_numeric_market_value_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "bad.csv",
        "country_of_birth,position,market_value_in_eur\nBrazil,Attack,100\nFrance,Defender,plenty\n",
    );

    let err = DataLoader::load_uncached(&path).unwrap_err();
    match err {
        LoaderError::TableError(TableError::NonNumericValue { row, value }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "plenty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_market_value_past_the_first_rows_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("country_of_birth,position,market_value_in_eur\n");
    for i in 0..10_050 {
        csv.push_str(&format!("Brazil,Attack,{}\n", i * 1000));
    }
    csv.push_str("France,Defender,plenty\n");
    let path = write_csv(&dir, "late_bad.csv", &csv);

    match DataLoader::load_uncached(&path) {
        Err(LoaderError::TableError(TableError::NonNumericValue { row, value })) => {
            assert_eq!(row, 10_050);
            assert_eq!(value, "plenty");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(data) => panic!(
            "loaded {} rows with {} values instead of failing",
            data.table.len(),
            data.table.market_values().len()
        ),
    }
}

#[test]
fn header_only_file_gives_empty_results() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "empty.csv",
        "country_of_birth,position,market_value_in_eur,date_of_birth\n",
    );

    let data = DataLoader::load_uncached(&path).unwrap();
    assert!(data.table.is_empty());

    let view = DashboardView::compute(&data.table, &PlayerFilter::default(), 30, today());
    assert_eq!(view.overview.total_players, 0);
    assert_eq!(view.market, AnalysisOutcome::Empty);
    assert_eq!(view.summary, AnalysisOutcome::Empty);
    for statistic in [Statistic::Max, Statistic::Mean] {
        let matrix = aggregate(&data.table, statistic);
        assert!(matrix.is_empty());
        assert!(rank_rows(&matrix).is_empty());
        assert!(rank_columns(&matrix).is_empty());
    }
}

#[test]
fn missing_birth_date_column_skips_age_only() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "no_dates.csv",
        "country_of_birth,position,market_value_in_eur\nBrazil,Attack,100\nFrance,Defender,80\n",
    );
    let data = DataLoader::load_uncached(&path).unwrap();

    let view = DashboardView::compute(&data.table, &PlayerFilter::default(), 30, today());
    assert_eq!(
        view.ages,
        AnalysisOutcome::Skipped(SkipReason::MissingColumn("date_of_birth"))
    );
    assert!(view.market.is_ready());
    assert!(view.positions.is_ready());
    assert!(view.summary.is_ready());
}

#[test]
fn dataset_overview_describes_numeric_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "players.csv", PLAYERS_CSV);
    let data = DataLoader::load_uncached(&path).unwrap();

    let overview = analysis::dataset_overview(&data.frame);
    assert_eq!(overview.rows, 5);
    assert_eq!(overview.columns.len(), 6);
    assert_eq!(overview.head.height(), 5);

    let value_stats = overview
        .numeric
        .iter()
        .find(|(name, _)| name == "market_value_in_eur")
        .map(|(_, stats)| *stats)
        .unwrap();
    assert_eq!(value_stats.count, 4);
    assert_eq!(value_stats.max, 100.0);
    assert_eq!(value_stats.min, 30.0);
}

#[test]
fn batch_report_renders_every_chart() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "players.csv", PLAYERS_CSV);
    let data = DataLoader::load_uncached(&path).unwrap();

    let config = AppConfig {
        output_dir: dir.path().join("plots"),
        ..AppConfig::default()
    };
    let batch = report::render_charts(&data.table, &config, today(), 20, false).unwrap();

    assert!(batch.skipped.is_empty(), "skipped: {:?}", batch.skipped);
    let expected = [
        "value_distribution.png",
        "position_counts.png",
        "age_distribution.png",
        "highest_value_by_country_position.png",
        "average_value_by_country_position.png",
        "position_share.png",
    ];
    let rendered: Vec<PathBuf> = expected
        .iter()
        .map(|name| config.output_dir.join(name))
        .collect();
    assert_eq!(batch.rendered, rendered);
    for chart in &batch.rendered {
        let size = fs::metadata(chart).unwrap().len();
        assert!(size > 0, "{} is empty", chart.display());
    }
}

#[test]
fn batch_report_skips_age_without_birth_dates() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "no_dates.csv",
        "country_of_birth,position,market_value_in_eur\nBrazil,Attack,100\n",
    );
    let data = DataLoader::load_uncached(&path).unwrap();
    let config = AppConfig {
        output_dir: dir.path().join("plots"),
        ..AppConfig::default()
    };

    let batch = report::render_charts(&data.table, &config, today(), 20, false).unwrap();
    let age = batch
        .skipped
        .iter()
        .find(|(chart, _)| chart == "age_distribution.png")
        .expect("age chart should be skipped");
    assert!(age.1.contains("date_of_birth"));
}
