use std::path::PathBuf;

use formguide_terminal::compare::dual_window;
use formguide_terminal::dataset::{Dataset, load_table, load_tables};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture(name: &str) -> Dataset {
    let table = load_table(&fixture_path(name)).expect("fixture should load");
    Dataset::merge(vec![table])
}

#[test]
fn both_windows_side_by_side_over_a_long_history() {
    let d = load_fixture("serie_a_full.csv");
    let cmp = dual_window(&d, "Roma");
    assert_eq!(cmp.short.as_ref().unwrap().n_eff, 5);
    assert_eq!(cmp.long.as_ref().unwrap().n_eff, 10);
    // Every joined row of a full-schema file has both cells.
    assert!(!cmp.rows.is_empty());
    for row in &cmp.rows {
        assert!(row.short.is_some(), "row {} short cell", row.label);
        assert!(row.long.is_some(), "row {} long cell", row.label);
    }
}

#[test]
fn detail_shows_the_ten_most_recent_matches_first() {
    let d = load_fixture("serie_a_full.csv");
    let cmp = dual_window(&d, "Roma");
    assert_eq!(cmp.detail.len(), 10);
    assert_eq!(cmp.detail[0].date_label(), "17/11/2023");
    assert_eq!(cmp.detail[9].date_label(), "15/09/2023");
    for pair in cmp.detail.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
}

#[test]
fn short_history_saturates_both_windows() {
    let d = load_fixture("roma_three.csv");
    let cmp = dual_window(&d, "Roma");
    assert_eq!(cmp.short.as_ref().unwrap().n_eff, 3);
    assert_eq!(cmp.long.as_ref().unwrap().n_eff, 3);
    assert_eq!(cmp.detail.len(), 3);
}

#[test]
fn unknown_team_yields_no_stats_and_no_detail() {
    let d = load_fixture("roma_three.csv");
    let cmp = dual_window(&d, "Juventus");
    assert!(!cmp.has_stats());
    assert!(cmp.rows.is_empty());
    assert!(cmp.detail.is_empty());
}

#[test]
fn merged_dataset_comparison_carries_partial_stats() {
    let paths = [
        fixture_path("cup_arsenal.csv"),
        fixture_path("league_arsenal.csv"),
    ];
    let (d, _) = load_tables(&paths).expect("both should load");
    let cmp = dual_window(&d, "Arsenal");
    assert_eq!(cmp.long.as_ref().unwrap().n_eff, 5);
    let shots = cmp.rows.iter().find(|r| r.label == "Tiri in porta");
    assert!(shots.is_some(), "joined rows should include Tiri in porta");
    // Pairs missing from the merged schema never appear.
    assert!(cmp.rows.iter().all(|r| r.label != "Tiri totali"));
}
