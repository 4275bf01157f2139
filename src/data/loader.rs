//! CSV Data Loader Module
//! Reads the UBS export with Polars and hands back a normalized Dataset.

use crate::config::{ColumnConfig, ConfigError, DashboardConfig};
use crate::data::dataset::{Dataset, DatasetError};
use crate::data::normalizer;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' not found in CSV")]
    MissingColumn(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Reads `;`-delimited exports; every column arrives as text so the
/// normalizer decides what is numeric.
pub struct DataLoader {
    separator: u8,
    columns: ColumnConfig,
}

impl DataLoader {
    pub fn new(separator: u8, columns: ColumnConfig) -> Self {
        Self { separator, columns }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, LoaderError> {
        Ok(Self::new(config.separator_byte()?, config.columns.clone()))
    }

    /// Load a CSV file into a raw DataFrame.
    pub fn load_csv(&self, file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        // Schema inference length 0 reads every column as String
        let df = LazyCsvReader::new(file_path)
            .with_separator(self.separator)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_encoding(CsvEncoding::LossyUtf8)
            .finish()?
            .collect()?;

        for name in self.columns.required() {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        debug!(
            rows = df.height(),
            columns = df.width(),
            path = %file_path.display(),
            "Read CSV"
        );
        Ok(df)
    }

    /// Load, normalize and wrap the file in an immutable Dataset.
    pub fn load_dataset(&self, file_path: &Path) -> Result<Dataset, LoaderError> {
        let raw = self.load_csv(file_path)?;
        let normalized = normalizer::normalize(raw, &self.columns)?;
        let dataset = Dataset::new(normalized, self.columns.clone())?;

        info!(
            rows = dataset.len(),
            path = %file_path.display(),
            "Loaded UBS dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn loader() -> DataLoader {
        DataLoader::new(b';', ColumnConfig::default())
    }

    #[test]
    fn reads_semicolon_file_as_text() {
        let file = write_csv(
            "CNES;Nome_UF;Nome_Município;LATITUDE;LONGITUDE\n\
             123;SP;São Paulo;-23,55;-46,63\n\
             456; RJ ;Rio de Janeiro;-22,90;-43,17\n",
        );

        let df = loader().load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 5);
        assert_eq!(df.column("CNES").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("LATITUDE").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn load_dataset_normalizes_columns() {
        let file = write_csv(
            "Nome_UF;Nome_Município;LATITUDE;LONGITUDE\n\
             SP ;São Paulo;-23,5;-46,6\n\
             RJ;Rio de Janeiro;abc;-43,17\n",
        );

        let dataset = loader().load_dataset(file.path()).unwrap();
        let records = dataset.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state_name.as_deref(), Some("SP"));
        assert_eq!(records[0].latitude, Some(-23.5));
        assert_eq!(records[0].longitude, Some(-46.6));
        assert_eq!(records[1].latitude, None);
        assert_eq!(records[1].municipality_name.as_deref(), Some("Rio de Janeiro"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader()
            .load_dataset(&dir.path().join("ubs_atualizado.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let file = write_csv("Nome_UF;LATITUDE;LONGITUDE\nSP;-23,5;-46,6\n");
        let err = loader().load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "Nome_Município"));
    }

    #[test]
    fn custom_separator_from_config() {
        let file = write_csv(
            "Nome_UF,Nome_Município,LATITUDE,LONGITUDE\nMG,Belo Horizonte,-19.9,-43.9\n",
        );
        let config = DashboardConfig {
            separator: ',',
            ..DashboardConfig::default()
        };

        let dataset = DataLoader::from_config(&config)
            .unwrap()
            .load_dataset(file.path())
            .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].latitude, Some(-19.9));
    }
}
