use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{Array, ArrayRef, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::{CricketDataset, DeliveryRecord, MatchRecord};

/// Default table locations, picked up from the working directory at startup.
pub const DEFAULT_MATCHES_FILE: &str = "matches.csv";
pub const DEFAULT_DELIVERIES_FILE: &str = "deliveries.csv";

const TABLE_MATCHES: &str = "matches";
const TABLE_DELIVERIES: &str = "deliveries";

/// Columns the match table must provide.
pub const MATCH_COLUMNS: &[&str] = &["id", "season", "team1", "team2", "city", "venue"];
/// Columns the delivery table must provide.
pub const DELIVERY_COLUMNS: &[&str] = &[
    "match_id",
    "over",
    "batter",
    "bowler",
    "batsman_runs",
    "total_runs",
    "player_dismissed",
];

// ---------------------------------------------------------------------------
// Column-contract errors
// ---------------------------------------------------------------------------

/// A table file that does not meet the column contract.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the match table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one match per record
/// * `.json`    – records-oriented array (`df.to_json(orient='records')`)
/// * `.parquet` – scalar columns per the contract in [`MATCH_COLUMNS`]
pub fn load_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    match extension_of(path).as_str() {
        "csv" => {
            let file = File::open(path).context("opening matches CSV")?;
            csv_table(file, TABLE_MATCHES, MATCH_COLUMNS)
        }
        "json" => json_table(path, TABLE_MATCHES),
        "parquet" | "pq" => matches_from_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load the ball-by-ball table from a file.  Same format set as [`load_matches`].
pub fn load_deliveries(path: &Path) -> Result<Vec<DeliveryRecord>> {
    match extension_of(path).as_str() {
        "csv" => {
            let file = File::open(path).context("opening deliveries CSV")?;
            csv_table(file, TABLE_DELIVERIES, DELIVERY_COLUMNS)
        }
        "json" => json_table(path, TABLE_DELIVERIES),
        "parquet" | "pq" => deliveries_from_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load both tables and build the dataset.
pub fn load_dataset(matches_path: &Path, deliveries_path: &Path) -> Result<CricketDataset> {
    let matches = load_matches(matches_path)
        .with_context(|| format!("loading {}", matches_path.display()))?;
    let deliveries = load_deliveries(deliveries_path)
        .with_context(|| format!("loading {}", deliveries_path.display()))?;
    Ok(CricketDataset::from_tables(matches, deliveries))
}

/// Load `matches.*` and `deliveries.*` from a directory, preferring CSV.
pub fn load_dir(dir: &Path) -> Result<CricketDataset> {
    let matches_path = find_table(dir, "matches")
        .with_context(|| format!("no matches table (.csv/.parquet/.json) in {}", dir.display()))?;
    let deliveries_path = find_table(dir, "deliveries").with_context(|| {
        format!("no deliveries table (.csv/.parquet/.json) in {}", dir.display())
    })?;
    load_dataset(&matches_path, &deliveries_path)
}

/// Load the default tables from the working directory, if both are present.
pub fn try_load_default() -> Result<Option<CricketDataset>> {
    let matches_path = Path::new(DEFAULT_MATCHES_FILE);
    let deliveries_path = Path::new(DEFAULT_DELIVERIES_FILE);
    if !matches_path.is_file() || !deliveries_path.is_file() {
        return Ok(None);
    }
    load_dataset(matches_path, deliveries_path).map(Some)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn find_table(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["csv", "parquet", "pq", "json"]
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

fn check_columns<'a>(
    table: &'static str,
    required: &'static [&'static str],
    present: impl Iterator<Item = &'a str> + Clone,
) -> Result<(), SchemaError> {
    for column in required {
        if !present.clone().any(|h| h == *column) {
            return Err(SchemaError::MissingColumn { table, column });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; extra columns are ignored, empty cells map
/// to `None` for the optional fields.
fn csv_table<T, R>(reader: R, table: &'static str, required: &'static [&'static str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: io::Read,
{
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .with_context(|| format!("reading {table} CSV headers"))?
        .clone();
    check_columns(table, required, headers.iter())?;

    let mut rows = Vec::new();
    for (row_no, result) in rdr.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("{table} CSV row {row_no}"))?;
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "id": 1, "season": "2019", "team1": "...", "team2": "...",
///     "city": "Mumbai", "venue": "Wankhede Stadium" },
///   ...
/// ]
/// ```
fn json_table<T: DeserializeOwned>(path: &Path, table: &'static str) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<T> =
        serde_json::from_str(&text).with_context(|| format!("parsing {table} JSON records"))?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); scalar columns only.
fn matches_from_parquet(path: &Path) -> Result<Vec<MatchRecord>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(
        TABLE_MATCHES,
        MATCH_COLUMNS,
        builder.schema().fields().iter().map(|f| f.name().as_str()),
    )?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let id = named_column(&batch, TABLE_MATCHES, "id")?;
        let season = named_column(&batch, TABLE_MATCHES, "season")?;
        let team1 = named_column(&batch, TABLE_MATCHES, "team1")?;
        let team2 = named_column(&batch, TABLE_MATCHES, "team2")?;
        let city = named_column(&batch, TABLE_MATCHES, "city")?;
        let venue = named_column(&batch, TABLE_MATCHES, "venue")?;

        for row in 0..batch.num_rows() {
            rows.push(MatchRecord {
                id: int_value(id, row).with_context(|| format!("matches row {row}: 'id'"))?,
                season: string_value(season, row)
                    .with_context(|| format!("matches row {row}: 'season'"))?,
                team1: string_value(team1, row)
                    .with_context(|| format!("matches row {row}: 'team1'"))?,
                team2: string_value(team2, row)
                    .with_context(|| format!("matches row {row}: 'team2'"))?,
                city: opt_string_value(city, row)
                    .with_context(|| format!("matches row {row}: 'city'"))?,
                venue: string_value(venue, row)
                    .with_context(|| format!("matches row {row}: 'venue'"))?,
            });
        }
    }
    Ok(rows)
}

fn deliveries_from_parquet(path: &Path) -> Result<Vec<DeliveryRecord>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(
        TABLE_DELIVERIES,
        DELIVERY_COLUMNS,
        builder.schema().fields().iter().map(|f| f.name().as_str()),
    )?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let match_id = named_column(&batch, TABLE_DELIVERIES, "match_id")?;
        let over = named_column(&batch, TABLE_DELIVERIES, "over")?;
        let batter = named_column(&batch, TABLE_DELIVERIES, "batter")?;
        let bowler = named_column(&batch, TABLE_DELIVERIES, "bowler")?;
        let batsman_runs = named_column(&batch, TABLE_DELIVERIES, "batsman_runs")?;
        let total_runs = named_column(&batch, TABLE_DELIVERIES, "total_runs")?;
        let player_dismissed = named_column(&batch, TABLE_DELIVERIES, "player_dismissed")?;

        for row in 0..batch.num_rows() {
            rows.push(DeliveryRecord {
                match_id: int_value(match_id, row)
                    .with_context(|| format!("deliveries row {row}: 'match_id'"))?,
                over: u32_value(over, row)
                    .with_context(|| format!("deliveries row {row}: 'over'"))?,
                batter: string_value(batter, row)
                    .with_context(|| format!("deliveries row {row}: 'batter'"))?,
                bowler: string_value(bowler, row)
                    .with_context(|| format!("deliveries row {row}: 'bowler'"))?,
                batsman_runs: u32_value(batsman_runs, row)
                    .with_context(|| format!("deliveries row {row}: 'batsman_runs'"))?,
                total_runs: u32_value(total_runs, row)
                    .with_context(|| format!("deliveries row {row}: 'total_runs'"))?,
                player_dismissed: opt_string_value(player_dismissed, row)
                    .with_context(|| format!("deliveries row {row}: 'player_dismissed'"))?,
            });
        }
    }
    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn named_column<'a>(
    batch: &'a RecordBatch,
    table: &'static str,
    name: &'static str,
) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SchemaError::MissingColumn { table, column: name }.into())
}

/// Extract a string cell.  Integer columns are stringified so a `season`
/// column written as plain years still loads.
fn string_value(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("unexpected null");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 | DataType::Int64 => Ok(int_value(col, row)?.to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn opt_string_value(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let s = string_value(col, row)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn int_value(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("unexpected null");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}

fn u32_value(col: &ArrayRef, row: usize) -> Result<u32> {
    let v = int_value(col, row)?;
    u32::try_from(v).map_err(|_| anyhow!("value {v} out of range"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MATCHES_CSV: &str = "\
id,season,city,date,team1,team2,venue,winner
1,2019,Mumbai,2019-04-01,Mumbai Indians,Chennai Super Kings,Wankhede Stadium,Mumbai Indians
2,2019,,2019-04-02,Delhi Capitals,Kolkata Knight Riders,Arun Jaitley Ground,Delhi Capitals
";

    const DELIVERIES_CSV: &str = "\
match_id,inning,over,ball,batter,bowler,batsman_runs,total_runs,player_dismissed
1,1,1,1,RG Sharma,DL Chahar,4,4,
1,1,1,2,RG Sharma,DL Chahar,0,1,
1,1,2,3,Q de Kock,RA Jadeja,0,0,Q de Kock
";

    #[test]
    fn csv_matches_parse_and_ignore_extra_columns() {
        let rows: Vec<MatchRecord> =
            csv_table(MATCHES_CSV.as_bytes(), TABLE_MATCHES, MATCH_COLUMNS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].city.as_deref(), Some("Mumbai"));
        assert_eq!(rows[0].venue, "Wankhede Stadium");
        // Empty city cell becomes None.
        assert_eq!(rows[1].city, None);
    }

    #[test]
    fn csv_deliveries_empty_dismissal_is_none() {
        let rows: Vec<DeliveryRecord> =
            csv_table(DELIVERIES_CSV.as_bytes(), TABLE_DELIVERIES, DELIVERY_COLUMNS).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].player_dismissed, None);
        assert_eq!(rows[2].player_dismissed.as_deref(), Some("Q de Kock"));
        assert_eq!(rows[0].batsman_runs, 4);
        assert_eq!(rows[1].total_runs, 1);
    }

    #[test]
    fn csv_missing_column_is_a_schema_error() {
        let res: Result<Vec<MatchRecord>> =
            csv_table("id,season\n1,2019\n".as_bytes(), TABLE_MATCHES, MATCH_COLUMNS);
        let err = res.unwrap_err();
        let schema = err.downcast_ref::<SchemaError>();
        assert!(
            matches!(schema, Some(SchemaError::MissingColumn { column: "team1", .. })),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn json_records_parse() {
        let text = r#"[
            {"id": 7, "season": "2019", "team1": "A", "team2": "B",
             "city": null, "venue": "V", "result": "tie"}
        ]"#;
        let rows: Vec<MatchRecord> = serde_json::from_str(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 7);
        assert_eq!(rows[0].city, None);
    }
}
