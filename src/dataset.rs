use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_COL: &str = "Date";
pub const HOME_TEAM_COL: &str = "HomeTeam";
pub const AWAY_TEAM_COL: &str = "AwayTeam";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("'{name}' is missing the required HomeTeam/AwayTeam columns")]
    MissingTeamColumns { name: String },
    #[error("'{name}': {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },
    #[error("'{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no input table passed schema validation")]
    NoValidData,
}

/// One historical fixture. `date` is the parsed day-first `Date` cell
/// (`None` when the cell was absent or unparseable); every other non-empty
/// cell sits in `fields` keyed by header name.
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    fields: HashMap<String, String>,
}

impl MatchRow {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// Tolerant numeric read: empty, "-" and unparseable cells are null.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let raw = self.field(column)?.trim();
        if raw.is_empty() || raw == "-" {
            return None;
        }
        raw.replace(',', "").parse::<f64>().ok()
    }

    pub fn date_label(&self) -> String {
        match self.date {
            Some(d) => d.format("%d/%m/%Y").to_string(),
            None => "-".to_string(),
        }
    }
}

/// One validated input file, before merging.
#[derive(Debug, Clone)]
pub struct MatchTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<MatchRow>,
    /// Date cells that failed day-first parsing (non-fatal).
    pub date_warnings: usize,
}

/// Row-wise union of every table that passed validation. `columns` is the
/// schema union in first-seen order; a row from a table that lacked a
/// column simply has no value for it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<MatchRow>,
}

impl Dataset {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn merge(tables: Vec<MatchTable>) -> Dataset {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::new();
        for table in tables {
            for col in &table.columns {
                if !columns.iter().any(|c| c == col) {
                    columns.push(col.clone());
                }
            }
            rows.extend(table.rows);
        }
        Dataset { columns, rows }
    }

    /// Every team name appearing as home or away, deduplicated and sorted.
    /// This is the list the selectors offer.
    pub fn team_names(&self) -> Vec<String> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            for name in [row.home_team.as_str(), row.away_team.as_str()] {
                if !name.is_empty() {
                    names.push(name);
                }
            }
        }
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(|s| s.to_string()).collect()
    }
}

/// Per-batch load outcome: how much loaded, plus the per-file errors that
/// did not abort the batch.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub tables_loaded: usize,
    pub rows_total: usize,
    pub date_warnings: usize,
    pub errors: Vec<String>,
}

/// Parse a single football-data.co.uk CSV. Rejects the table when the two
/// team-name columns are not both present; a bad `Date` cell becomes null
/// and bumps `date_warnings` instead of failing the load.
pub fn parse_table<R: Read>(reader: R, name: &str) -> Result<MatchTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| LoadError::Csv {
            name: name.to_string(),
            source: e,
        })?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
        .collect();

    let home_idx = headers.iter().position(|h| h == HOME_TEAM_COL);
    let away_idx = headers.iter().position(|h| h == AWAY_TEAM_COL);
    let (Some(home_idx), Some(away_idx)) = (home_idx, away_idx) else {
        return Err(LoadError::MissingTeamColumns {
            name: name.to_string(),
        });
    };
    let date_idx = headers.iter().position(|h| h == DATE_COL);

    let mut rows = Vec::new();
    let mut date_warnings = 0usize;
    for record in csv_reader.records() {
        let record = record.map_err(|e| LoadError::Csv {
            name: name.to_string(),
            source: e,
        })?;

        let mut date = None;
        if let Some(idx) = date_idx {
            let raw = record.get(idx).unwrap_or_default();
            if !raw.is_empty() {
                date = parse_date_dayfirst(raw);
                if date.is_none() {
                    date_warnings += 1;
                }
            }
        }

        let mut fields = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() || idx == home_idx || idx == away_idx || Some(idx) == date_idx {
                continue;
            }
            if let Some(cell) = record.get(idx) {
                if !cell.is_empty() {
                    fields.insert(header.to_string(), cell.to_string());
                }
            }
        }

        rows.push(MatchRow {
            date,
            home_team: record.get(home_idx).unwrap_or_default().to_string(),
            away_team: record.get(away_idx).unwrap_or_default().to_string(),
            fields,
        });
    }

    Ok(MatchTable {
        name: name.to_string(),
        columns,
        rows,
        date_warnings,
    })
}

pub fn load_table(path: &Path) -> Result<MatchTable, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path).map_err(|e| LoadError::Io {
        name: name.clone(),
        source: e,
    })?;
    parse_table(file, &name)
}

/// Load each path independently; a file that fails validation is recorded
/// in the report and dropped without aborting the rest. Only when every
/// file fails does the batch itself fail.
pub fn load_tables(paths: &[impl AsRef<Path>]) -> Result<(Dataset, LoadReport), LoadError> {
    let mut tables = Vec::new();
    let mut report = LoadReport::default();
    for path in paths {
        match load_table(path.as_ref()) {
            Ok(table) => {
                report.tables_loaded += 1;
                report.rows_total += table.rows.len();
                report.date_warnings += table.date_warnings;
                tables.push(table);
            }
            Err(err) => report.errors.push(err.to_string()),
        }
    }
    if tables.is_empty() {
        return Err(LoadError::NoValidData);
    }
    Ok((Dataset::merge(tables), report))
}

/// football-data.co.uk dates are day-first, with both two- and four-digit
/// years across seasons. `%Y` also accepts two-digit years (as year 00xx),
/// so the format is chosen by the width of the year token rather than
/// tried in sequence.
fn parse_date_dayfirst(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let format = match raw.rsplit_once('/').map(|(_, year)| year.len()) {
        Some(2) => "%d/%m/%y",
        _ => "%d/%m/%Y",
    };
    NaiveDate::parse_from_str(raw, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_dayfirst_handles_both_year_widths() {
        assert_eq!(
            parse_date_dayfirst("27/08/2023"),
            NaiveDate::from_ymd_opt(2023, 8, 27)
        );
        assert_eq!(
            parse_date_dayfirst("05/11/94"),
            NaiveDate::from_ymd_opt(1994, 11, 5)
        );
        assert_eq!(parse_date_dayfirst("not a date"), None);
    }

    #[test]
    fn rejects_table_without_team_columns() {
        let csv = "Date,FTHG,FTAG\n27/08/2023,2,1\n";
        let err = parse_table(csv.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, LoadError::MissingTeamColumns { .. }));
    }

    #[test]
    fn bad_dates_become_null_without_failing() {
        let csv = "Date,HomeTeam,AwayTeam\n27/08/2023,Roma,Lazio\nxx/yy,Milan,Inter\n";
        let table = parse_table(csv.as_bytes(), "t.csv").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].date.is_some());
        assert!(table.rows[1].date.is_none());
        assert_eq!(table.date_warnings, 1);
    }

    #[test]
    fn merge_takes_schema_union_in_first_seen_order() {
        let a = parse_table(
            "HomeTeam,AwayTeam,FTHG\nRoma,Lazio,2\n".as_bytes(),
            "a.csv",
        )
        .unwrap();
        let b = parse_table(
            "HomeTeam,AwayTeam,FTAG\nMilan,Inter,0\n".as_bytes(),
            "b.csv",
        )
        .unwrap();
        let dataset = Dataset::merge(vec![a, b]);
        assert_eq!(dataset.columns, ["HomeTeam", "AwayTeam", "FTHG", "FTAG"]);
        assert_eq!(dataset.rows.len(), 2);
        // Rows from the first table have no FTAG value.
        assert_eq!(dataset.rows[0].numeric("FTAG"), None);
        assert_eq!(dataset.rows[1].numeric("FTAG"), Some(0.0));
    }

    #[test]
    fn team_names_dedup_and_sort() {
        let table = parse_table(
            "HomeTeam,AwayTeam\nRoma,Lazio\nLazio,Roma\nAtalanta,Roma\n".as_bytes(),
            "t.csv",
        )
        .unwrap();
        let dataset = Dataset::merge(vec![table]);
        assert_eq!(dataset.team_names(), ["Atalanta", "Lazio", "Roma"]);
    }

    #[test]
    fn numeric_is_tolerant_of_junk_cells() {
        let table = parse_table(
            "HomeTeam,AwayTeam,HS\nRoma,Lazio,n/a\n".as_bytes(),
            "t.csv",
        )
        .unwrap();
        assert_eq!(table.rows[0].numeric("HS"), None);
        assert_eq!(table.rows[0].field("HS"), Some("n/a"));
    }

    #[test]
    fn load_tables_all_invalid_is_no_valid_data() {
        let missing = Path::new("/nonexistent/formguide-test-a.csv");
        let missing2 = Path::new("/nonexistent/formguide-test-b.csv");
        let err = load_tables(&[missing, missing2]).unwrap_err();
        assert!(matches!(err, LoadError::NoValidData));
    }
}
