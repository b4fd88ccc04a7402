//! DataFrame helpers shared by the fetcher and the stats pipeline
//!
//! Datasets travel as polars `DataFrame`s. Columns a dataset may or may not
//! carry are handled by projecting onto the columns that are present, and
//! frames leave the service as JSON arrays of records.

use polars::prelude::*;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::io::Cursor;

/// Cell spellings the provider uses for a missing value
pub const NULL_MARKERS: [&str; 2] = ["", "NA"];

/// Parse a CSV document with a header row
///
/// Column types are inferred over the whole document, so a column that is
/// numeric in every row stays numeric even when early rows are missing.
pub fn read_csv(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| {
            options.with_null_values(Some(NullValues::AllColumns(
                NULL_MARKERS.iter().map(|marker| (*marker).into()).collect(),
            )))
        })
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Stack frames vertically, filling columns a frame lacks with nulls
pub fn concat_frames(frames: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    if frames.len() <= 1 {
        return Ok(frames.into_iter().next().unwrap_or_else(DataFrame::empty));
    }
    let lazy: Vec<LazyFrame> = frames.into_iter().map(DataFrame::lazy).collect();
    concat_lf_diagonal(lazy, UnionArgs { to_supertypes: true, ..Default::default() })?.collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Names from `wanted` the frame carries, in `wanted` order, without repeats
pub fn present_columns<'a, S: AsRef<str>>(df: &DataFrame, wanted: &'a [S]) -> Vec<&'a str> {
    let mut present: Vec<&'a str> = Vec::with_capacity(wanted.len());
    for name in wanted.iter().map(AsRef::as_ref) {
        if has_column(df, name) && !present.contains(&name) {
            present.push(name);
        }
    }
    present
}

/// Project onto the requested columns that exist
pub fn select_present<S: AsRef<str>>(df: &DataFrame, wanted: &[S]) -> PolarsResult<DataFrame> {
    let columns: Vec<Expr> = present_columns(df, wanted).into_iter().map(col).collect();
    df.clone().lazy().select(columns).collect()
}

/// Replace nulls with 0 in numeric columns and "" everywhere else
pub fn fill_nulls(df: DataFrame) -> PolarsResult<DataFrame> {
    let fills: Vec<Expr> = df
        .get_columns()
        .iter()
        .map(|series| {
            if series.dtype().is_numeric() {
                col(series.name()).fill_null(lit(0))
            } else {
                col(series.name()).cast(DataType::String).fill_null(lit(""))
            }
        })
        .collect();
    if fills.is_empty() {
        return Ok(df);
    }
    df.lazy().with_columns(fills).collect()
}

/// Stable descending sort with nulls last
pub fn sort_desc(frame: LazyFrame, by: Expr) -> LazyFrame {
    frame.sort_by_exprs(
        [by],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
}

/// Rows `[offset, offset + limit)`, empty past the end
pub fn page(df: &DataFrame, offset: usize, limit: usize) -> DataFrame {
    let offset = offset.min(df.height());
    df.slice(offset as i64, limit)
}

/// Column as text, non-text values rendered by cast
pub fn texts(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?.into_iter().map(|v| v.map(str::to_string)).collect();
    Ok(values)
}

/// Column as floats; values that do not parse become null
pub fn numbers(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

/// Sorted distinct non-null text values of a column; empty when absent
pub fn distinct_text(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    if !has_column(df, name) {
        return Ok(Vec::new());
    }
    let mut values: Vec<String> = texts(df, name)?.into_iter().flatten().collect();
    values.sort();
    values.dedup();
    Ok(values)
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// JSON rendering of one cell; NaN and infinities become null
pub fn json_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::from(s),
        AnyValue::StringOwned(s) => Value::from(s.as_str()),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_value(v as f64),
        AnyValue::Float64(v) => float_value(v),
        other => Value::String(other.to_string()),
    }
}

/// One cell as JSON; null when the column or row does not exist
pub fn value(df: &DataFrame, name: &str, row: usize) -> Value {
    df.column(name)
        .ok()
        .and_then(|series| series.get(row).ok())
        .map(json_value)
        .unwrap_or(Value::Null)
}

/// One row as `(column, value)` pairs, serialized as an object in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(column, _)| column == name).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

pub fn record(df: &DataFrame, row: usize) -> Record {
    Record(
        df.get_columns()
            .iter()
            .map(|series| {
                let cell = series.get(row).map(json_value).unwrap_or(Value::Null);
                (series.name().to_string(), cell)
            })
            .collect(),
    )
}

/// Serializes a frame as an array of row objects
pub struct Records<'a>(pub &'a DataFrame);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.height()))?;
        for row in 0..self.0.height() {
            seq.serialize_element(&record(self.0, row))?;
        }
        seq.end()
    }
}

/// `serialize_with` adapter for `DataFrame` fields
pub fn serialize_records<S: Serializer>(df: &DataFrame, serializer: S) -> Result<S::Ok, S::Error> {
    Records(df).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn players() -> DataFrame {
        df!(
            "player_id" => &["a", "b", "c", "d"],
            "team" => &[Some("KC"), None, Some("BUF"), Some("KC")],
            "fantasy_points" => &[Some(120.5), Some(200.0), None, Some(200.0)]
        )
        .unwrap()
    }

    #[test]
    fn test_read_csv_infers_types_and_nulls() {
        let csv = "player_id,season,week,team,target_share\n\
                   00-001,2024,1,KC,0.25\n\
                   00-002,2024,2,NA,\n";
        let df = read_csv(csv.as_bytes().to_vec()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("player_id").unwrap().dtype(), &DataType::String);
        assert!(df.column("season").unwrap().dtype().is_integer());
        assert_eq!(df.column("target_share").unwrap().dtype(), &DataType::Float64);
        assert_eq!(value(&df, "team", 1), Value::Null);
        assert_eq!(value(&df, "target_share", 1), Value::Null);
        assert_eq!(value(&df, "week", 0), json!(1));
    }

    #[test]
    fn test_concat_fills_missing_columns() {
        let first = df!("player_id" => &["a"], "week" => &[1i64]).unwrap();
        let second = df!("player_id" => &["b"], "team" => &["KC"]).unwrap();
        let combined = concat_frames(vec![first, second]).unwrap();
        assert_eq!(combined.height(), 2);
        assert!(has_column(&combined, "team"));
        assert_eq!(value(&combined, "team", 0), Value::Null);
        assert_eq!(value(&combined, "player_id", 1), json!("b"));
    }

    #[test]
    fn test_select_present_keeps_request_order() {
        let wanted = ["fantasy_points", "missing", "player_id", "player_id"];
        let projected = select_present(&players(), &wanted).unwrap();
        let names: Vec<String> = projected.get_columns().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["fantasy_points", "player_id"]);
    }

    #[test]
    fn test_sort_desc_is_stable_with_nulls_last() {
        let sorted = sort_desc(players().lazy(), col("fantasy_points")).collect().unwrap();
        let ids: Vec<Option<String>> = texts(&sorted, "player_id").unwrap();
        assert_eq!(ids, vec![Some("b".into()), Some("d".into()), Some("a".into()), Some("c".into())]);
    }

    #[test]
    fn test_fill_nulls_by_type() {
        let filled = fill_nulls(players()).unwrap();
        assert_eq!(value(&filled, "team", 1), json!(""));
        assert_eq!(numbers(&filled, "fantasy_points").unwrap()[2], Some(0.0));
    }

    #[test]
    fn test_distinct_text_sorted() {
        let filled = fill_nulls(players()).unwrap();
        assert_eq!(distinct_text(&filled, "team").unwrap(), vec!["", "BUF", "KC"]);
        assert!(distinct_text(&filled, "position").unwrap().is_empty());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        assert_eq!(page(&players(), 1, 2).height(), 2);
        assert_eq!(page(&players(), 10, 2).height(), 0);
    }

    #[test]
    fn test_records_serialize_in_column_order() {
        let json = serde_json::to_value(Records(&players())).unwrap();
        assert_eq!(json[0], json!({"player_id": "a", "team": "KC", "fantasy_points": 120.5}));
        assert_eq!(json[1]["team"], Value::Null);
        let text = serde_json::to_string(&record(&players(), 0)).unwrap();
        assert!(text.starts_with("{\"player_id\""));
    }
}
