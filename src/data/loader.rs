//! CSV Data Loader Module
//! Reads the funding CSV with Polars and hands it to the processor for cleaning.

use super::processor::ProcessorError;
use super::{DataProcessor, FundingTable};
use crate::config::DatasetSettings;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Loads the funding dataset from disk.
pub struct DataLoader {
    settings: DatasetSettings,
}

impl DataLoader {
    pub fn new(settings: DatasetSettings) -> Self {
        Self { settings }
    }

    /// Read a CSV file as-is using Polars.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        let path_str = path.to_string_lossy().to_string();

        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Read and clean the dataset at `path`.
    pub fn load(&self, path: &Path) -> Result<FundingTable, LoaderError> {
        let raw = Self::read_csv(path)?;
        let table = DataProcessor::clean(&raw, &self.settings)?;
        info!(
            "loaded {} funding records ({} raw rows) from {}",
            table.len(),
            raw.height(),
            path.display()
        );
        if table.is_empty() {
            warn!("{} has no funding records after cleaning", path.display());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::*;
    use std::io::Write;

    #[test]
    fn loads_and_cleans_a_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,startup,industry,subvertical,city,investor,investmenttype,paisa").unwrap();
        writeln!(file, "2019-01-05,Foo,Fintech,Payments,Bengaluru,\"A,B\",Seed,5").unwrap();
        writeln!(file, "2019-02-07,Bar,Edtech,0,Mumbai,C,Seed,0").unwrap();
        writeln!(file, "bad-date,Baz,Health,,Delhi,A,Series A,2.5").unwrap();
        file.flush().unwrap();

        let table = DataLoader::new(DatasetSettings::default())
            .load(file.path())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.investors().height(), 3);

        let total: f64 = table
            .records()
            .column(AMOUNT)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .sum()
            .unwrap();
        assert!((total - 7.5).abs() < 1e-9);
    }

    #[test]
    fn only_zero_amounts_leaves_an_empty_table() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,startup,industry,subvertical,city,investor,investmenttype,paisa").unwrap();
        writeln!(file, "2019-02-07,Bar,Edtech,0,Mumbai,C,Seed,0").unwrap();
        writeln!(file, "2019-03-01,Qux,Fintech,Payments,Pune,D,Seed,0").unwrap();
        file.flush().unwrap();

        let table = DataLoader::new(DatasetSettings::default())
            .load(file.path())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.investors().height(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = DataLoader::read_csv(Path::new("/nonexistent/cleaneddata.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }
}
