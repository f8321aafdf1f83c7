use std::path::PathBuf;

use formguide_terminal::dataset::{LoadError, load_table, load_tables};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_full_football_data_table() {
    let table = load_table(&fixture_path("serie_a_full.csv")).expect("fixture should load");
    assert_eq!(table.rows.len(), 13);
    assert!(table.columns.iter().any(|c| c == "HST"));
    // The n/d date row becomes null and is counted as a warning.
    assert_eq!(table.date_warnings, 1);
    assert!(table.rows[12].date.is_none());
    assert!(table.rows[0].date.is_some());
}

#[test]
fn rejects_table_missing_team_columns() {
    let err = load_table(&fixture_path("bad_schema.csv")).unwrap_err();
    assert!(matches!(err, LoadError::MissingTeamColumns { .. }));
}

#[test]
fn bad_table_is_dropped_without_aborting_the_batch() {
    let paths = [
        fixture_path("bad_schema.csv"),
        fixture_path("cup_arsenal.csv"),
    ];
    let (dataset, report) = load_tables(&paths).expect("one valid table is enough");
    assert_eq!(report.tables_loaded, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("bad_schema.csv"));
    assert_eq!(dataset.rows.len(), 2);
}

#[test]
fn all_tables_invalid_is_fatal() {
    let paths = [fixture_path("bad_schema.csv")];
    let err = load_tables(&paths).unwrap_err();
    assert!(matches!(err, LoadError::NoValidData));
}

#[test]
fn merged_schema_is_the_column_union() {
    let paths = [
        fixture_path("cup_arsenal.csv"),
        fixture_path("league_arsenal.csv"),
    ];
    let (dataset, report) = load_tables(&paths).expect("both should load");
    assert_eq!(report.tables_loaded, 2);
    assert!(dataset.has_column("HST"));
    assert!(dataset.has_column("AST"));
    // Rows from the cup file have no value for the league-only columns.
    assert_eq!(dataset.rows[0].numeric("HST"), None);
    assert_eq!(dataset.rows[2].numeric("HST"), Some(5.0));
}

#[test]
fn team_universe_spans_all_files_sorted_without_duplicates() {
    let paths = [
        fixture_path("cup_arsenal.csv"),
        fixture_path("league_arsenal.csv"),
    ];
    let (dataset, _) = load_tables(&paths).expect("both should load");
    assert_eq!(
        dataset.team_names(),
        ["Arsenal", "Chelsea", "Everton", "Fulham", "Spurs", "Wigan"]
    );
}
