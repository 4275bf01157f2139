//! Dataset Module
//! Immutable view of a normalized UBS export: the full frame for table display
//! plus typed records for counting, filtering and mapping.

use crate::config::ColumnConfig;
use crate::data::normalizer::text_values;
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Row mask has {mask} entries but dataset has {rows} rows")]
    MaskLength { mask: usize, rows: usize },
}

/// One basic health unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UbsRecord {
    pub state_name: Option<String>,
    pub municipality_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UbsRecord {
    /// Both coordinates, or nothing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    columns: ColumnConfig,
    records: Vec<UbsRecord>,
}

impl Dataset {
    /// Wrap a normalized frame. Coordinate columns are read as Float64.
    pub fn new(frame: DataFrame, columns: ColumnConfig) -> Result<Self, DatasetError> {
        let states = text_values(&frame, &columns.state)?;
        let municipalities = text_values(&frame, &columns.municipality)?;
        let latitudes = float_values(&frame, &columns.latitude)?;
        let longitudes = float_values(&frame, &columns.longitude)?;

        let records = states
            .into_iter()
            .zip(municipalities)
            .zip(latitudes.into_iter().zip(longitudes))
            .map(
                |((state_name, municipality_name), (latitude, longitude))| UbsRecord {
                    state_name,
                    municipality_name,
                    latitude,
                    longitude,
                },
            )
            .collect();

        Ok(Self {
            frame,
            columns,
            records,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn records(&self) -> &[UbsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct state names in order of first appearance.
    pub fn unique_states(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.state_name.as_deref())
            .filter(|s| seen.insert(*s))
            .map(str::to_string)
            .collect()
    }

    /// Keep the rows where `keep` is true, preserving order.
    pub fn subset(&self, keep: &[bool]) -> Result<Dataset, DatasetError> {
        if keep.len() != self.records.len() {
            return Err(DatasetError::MaskLength {
                mask: keep.len(),
                rows: self.records.len(),
            });
        }

        let mask = BooleanChunked::from_slice("keep".into(), keep);
        let frame = self.frame.filter(&mask)?;
        let records = self
            .records
            .iter()
            .zip(keep)
            .filter(|(_, &k)| k)
            .map(|(r, _)| r.clone())
            .collect();

        Ok(Dataset {
            frame,
            columns: self.columns.clone(),
            records,
        })
    }

    /// Subset by predicate over the typed records.
    pub fn filter_records<F>(&self, predicate: F) -> Result<Dataset, DatasetError>
    where
        F: Fn(&UbsRecord) -> bool,
    {
        let keep: Vec<bool> = self.records.iter().map(predicate).collect();
        self.subset(&keep)
    }

    /// Column names of the underlying frame, in source order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Display text of one cell; missing values render empty.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.frame
            .get_columns()
            .get(column)
            .and_then(|col| col.get(row).ok())
            .map(|val| {
                if val.is_null() {
                    String::new()
                } else {
                    val.to_string().trim_matches('"').to_string()
                }
            })
            .unwrap_or_default()
    }
}

fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.into_iter().collect())
}
