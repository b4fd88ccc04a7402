use crate::error::Result;
use nflverse_fetcher::frame::{self, select_present, serialize_records};
use nflverse_fetcher::{DatasetId, DatasetInfo};
use polars::prelude::*;
use serde::Serialize;

pub const DEFAULT_DATASET_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct DatasetCatalog {
    pub datasets: Vec<DatasetInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub dtype: &'static str,
}

impl ColumnInfo {
    fn describe(series: &Series) -> Self {
        let (kind, dtype) = if series.dtype().is_numeric() {
            ("number", "float64")
        } else {
            ("string", "object")
        };
        Self { name: series.name().to_string(), kind, dtype }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetSchema {
    pub dataset_id: DatasetId,
    pub columns: Vec<ColumnInfo>,
    pub total_columns: usize,
}

#[derive(Debug, Serialize)]
pub struct DatasetPage {
    pub dataset_id: DatasetId,
    pub columns: Vec<String>,
    #[serde(serialize_with = "serialize_records")]
    pub data: DataFrame,
    pub total_rows: usize,
    pub offset: usize,
    pub limit: usize,
}

pub fn catalog() -> DatasetCatalog {
    DatasetCatalog { datasets: DatasetId::ALL.iter().map(|id| id.info()).collect() }
}

pub fn schema(dataset: DatasetId, raw: &DataFrame) -> DatasetSchema {
    let columns: Vec<ColumnInfo> = raw.get_columns().iter().map(ColumnInfo::describe).collect();
    DatasetSchema { dataset_id: dataset, total_columns: columns.len(), columns }
}

/// Page through a raw dataset, optionally projected to `columns`
///
/// Requested columns the dataset lacks are ignored.
pub fn page(
    dataset: DatasetId,
    raw: &DataFrame,
    columns: Option<&[String]>,
    offset: usize,
    limit: usize,
) -> Result<DatasetPage> {
    let projected = match columns {
        Some(requested) if !requested.is_empty() => Some(select_present(raw, requested)?),
        _ => None,
    };
    let source = projected.as_ref().unwrap_or(raw);

    Ok(DatasetPage {
        dataset_id: dataset,
        columns: source.get_columns().iter().map(|s| s.name().to_string()).collect(),
        data: frame::page(source, offset, limit),
        total_rows: source.height(),
        offset,
        limit,
    })
}
