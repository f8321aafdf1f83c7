use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::dataset::{DATE_COL, Dataset, MatchRow};

/// Symmetric stat-column pairs: (label, home column, away column). The
/// label names the value from the queried team's perspective, so the
/// "conceded" rows swap the columns.
pub const STAT_PAIRS: [(&str, &str, &str); 10] = [
    ("Gol fatti (FT)", "FTHG", "FTAG"),
    ("Gol subiti (FT)", "FTAG", "FTHG"),
    ("Gol fatti (HT)", "HTHG", "HTAG"),
    ("Gol subiti (HT)", "HTAG", "HTHG"),
    ("Tiri totali", "HS", "AS"),
    ("Tiri in porta", "HST", "AST"),
    ("Calci d'angolo", "HC", "AC"),
    ("Falli commessi", "HF", "AF"),
    ("Ammonizioni", "HY", "AY"),
    ("Espulsioni", "HR", "AR"),
];

pub const RESULT_COL: &str = "FTR";
pub const WINS_LABEL: &str = "Vittorie";
pub const DRAWS_LABEL: &str = "Pareggi";
pub const LOSSES_LABEL: &str = "Sconfitte";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    /// Arithmetic mean over the window rows with a non-null value.
    Mean(f64),
    /// Exact outcome count over the window.
    Count(u32),
}

impl StatValue {
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::Mean(v) => v,
            StatValue::Count(n) => n as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Rolling aggregates for one (team, window) query, labeled with the
/// effective sample size actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub n_eff: usize,
    pub entries: Vec<(&'static str, StatValue)>,
}

impl TeamStats {
    pub fn get(&self, label: &str) -> Option<StatValue> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }
}

/// The engine's full answer: the matches the window actually covered
/// (most-recent-first) plus the aggregates. `stats` is `None` both when the
/// team has no matches and when no recognized stat column was present.
#[derive(Debug, Clone)]
pub struct TeamWindow {
    pub matches: Vec<MatchRow>,
    pub stats: Option<TeamStats>,
}

/// Translate a row's full-time result code into the queried team's own
/// outcome. Anything that is not an H/A verdict counts as a draw, matching
/// the source data's loose FTR discipline.
pub fn team_outcome(row: &MatchRow, team: &str) -> Outcome {
    let code = row.field(RESULT_COL).unwrap_or_default();
    if row.home_team == team {
        match code {
            "H" => Outcome::Win,
            "A" => Outcome::Loss,
            _ => Outcome::Draw,
        }
    } else {
        match code {
            "A" => Outcome::Win,
            "H" => Outcome::Loss,
            _ => Outcome::Draw,
        }
    }
}

/// Most-recent-first ordering with null dates after every dated row. The
/// sort it feeds is stable, so ties and undated runs keep load order.
fn recency_order(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compute rolling-window aggregates for `team` over its most recent
/// matches. Pure read-only query: repeated calls over an unmutated dataset
/// return identical results.
pub fn compute_team_stats(dataset: &Dataset, team: &str, window: usize) -> TeamWindow {
    let mut rows: Vec<&MatchRow> = dataset
        .rows
        .iter()
        .filter(|r| r.home_team == team || r.away_team == team)
        .collect();

    if rows.is_empty() {
        return TeamWindow {
            matches: Vec::new(),
            stats: None,
        };
    }

    // Without a Date column, load order stands in for recency.
    if dataset.has_column(DATE_COL) {
        rows.sort_by(|a, b| recency_order(a.date, b.date));
    }
    rows.truncate(window);
    let n_eff = rows.len();

    let mut entries: Vec<(&'static str, StatValue)> = Vec::new();

    for (label, home_col, away_col) in STAT_PAIRS {
        // A pair is skipped outright unless both columns exist somewhere
        // in the merged schema; partial datasets degrade, not fail.
        if !dataset.has_column(home_col) || !dataset.has_column(away_col) {
            continue;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in &rows {
            // Away side first: a row where a team plays itself projects
            // its away column, while the outcome below stays home-side.
            let col = if row.away_team == team { away_col } else { home_col };
            if let Some(v) = row.numeric(col) {
                sum += v;
                count += 1;
            }
        }
        if count > 0 {
            entries.push((label, StatValue::Mean(sum / count as f64)));
        }
    }

    if dataset.has_column(RESULT_COL) {
        let mut wins = 0u32;
        let mut draws = 0u32;
        let mut losses = 0u32;
        for row in &rows {
            match team_outcome(row, team) {
                Outcome::Win => wins += 1,
                Outcome::Draw => draws += 1,
                Outcome::Loss => losses += 1,
            }
        }
        entries.push((WINS_LABEL, StatValue::Count(wins)));
        entries.push((DRAWS_LABEL, StatValue::Count(draws)));
        entries.push((LOSSES_LABEL, StatValue::Count(losses)));
    }

    let matches = rows.into_iter().cloned().collect();
    if entries.is_empty() {
        // Matches exist but nothing was computable (team-name-only schema).
        return TeamWindow {
            matches,
            stats: None,
        };
    }

    TeamWindow {
        matches,
        stats: Some(TeamStats { n_eff, entries }),
    }
}
