use crate::dataset::{Dataset, MatchRow};
use crate::rolling_stats::{StatValue, TeamStats, compute_team_stats};

pub const SHORT_WINDOW: usize = 5;
pub const LONG_WINDOW: usize = 10;

/// One side-by-side row: a stat present in only one window leaves the
/// other cell blank.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
    pub label: &'static str,
    pub short: Option<StatValue>,
    pub long: Option<StatValue>,
}

/// Dual-window view of one team: the engine invoked at windows 5 and 10,
/// outer-joined by stat label for rendering, plus the detail match list
/// (window-10 selection when non-empty, window-5 otherwise).
#[derive(Debug, Clone)]
pub struct TeamComparison {
    pub team: String,
    pub short: Option<TeamStats>,
    pub long: Option<TeamStats>,
    pub rows: Vec<CompareRow>,
    pub detail: Vec<MatchRow>,
}

impl TeamComparison {
    pub fn has_stats(&self) -> bool {
        self.short.is_some() || self.long.is_some()
    }
}

pub fn dual_window(dataset: &Dataset, team: &str) -> TeamComparison {
    let short_window = compute_team_stats(dataset, team, SHORT_WINDOW);
    let long_window = compute_team_stats(dataset, team, LONG_WINDOW);

    let rows = join_rows(short_window.stats.as_ref(), long_window.stats.as_ref());
    let detail = if !long_window.matches.is_empty() {
        long_window.matches
    } else {
        short_window.matches
    };

    TeamComparison {
        team: team.to_string(),
        short: short_window.stats,
        long: long_window.stats,
        rows,
        detail,
    }
}

/// Outer join on stat label; label order is first appearance across the
/// long mapping, then any short-only leftovers.
fn join_rows(short: Option<&TeamStats>, long: Option<&TeamStats>) -> Vec<CompareRow> {
    let mut rows: Vec<CompareRow> = Vec::new();
    if let Some(long) = long {
        for &(label, value) in &long.entries {
            rows.push(CompareRow {
                label,
                short: short.and_then(|s| s.get(label)),
                long: Some(value),
            });
        }
    }
    if let Some(short) = short {
        for &(label, value) in &short.entries {
            if rows.iter().any(|r| r.label == label) {
                continue;
            }
            rows.push(CompareRow {
                label,
                short: Some(value),
                long: None,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, parse_table};

    fn dataset_from(csv: &str) -> Dataset {
        Dataset::merge(vec![parse_table(csv.as_bytes(), "test.csv").unwrap()])
    }

    fn seven_match_csv() -> String {
        let mut csv = String::from("Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n");
        for day in 1..=7 {
            csv.push_str(&format!("{day:02}/01/2024,Roma,Lazio,1,0,H\n"));
        }
        csv
    }

    #[test]
    fn both_windows_computed_and_joined() {
        let d = dataset_from(&seven_match_csv());
        let cmp = dual_window(&d, "Roma");
        assert_eq!(cmp.short.as_ref().unwrap().n_eff, 5);
        assert_eq!(cmp.long.as_ref().unwrap().n_eff, 7);
        let goals = cmp
            .rows
            .iter()
            .find(|r| r.label == "Gol fatti (FT)")
            .unwrap();
        assert!(goals.short.is_some());
        assert!(goals.long.is_some());
    }

    #[test]
    fn detail_uses_long_window_selection() {
        let d = dataset_from(&seven_match_csv());
        let cmp = dual_window(&d, "Roma");
        assert_eq!(cmp.detail.len(), 7);
        // Most recent first.
        assert_eq!(cmp.detail[0].date_label(), "07/01/2024");
    }

    #[test]
    fn unknown_team_has_no_rows_and_no_detail() {
        let d = dataset_from(&seven_match_csv());
        let cmp = dual_window(&d, "Juventus");
        assert!(!cmp.has_stats());
        assert!(cmp.rows.is_empty());
        assert!(cmp.detail.is_empty());
    }
}
