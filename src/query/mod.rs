//! Query module - aggregations over the cleaned funding table

mod investors;
mod market;

pub use investors::InvestorQueries;
pub use market::MarketQueries;

use crate::data::columns::*;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output column holding a group label.
pub(crate) const LABEL: &str = "label";
/// Output column holding an aggregated metric.
pub(crate) const VALUE: &str = "value";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Aggregation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Sum of amounts.
    #[default]
    Money,
    /// Number of records with an amount.
    Count,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Money => "Money",
            Metric::Count => "Count",
        }
    }

    pub(crate) fn aggregate(self) -> Expr {
        match self {
            Metric::Money => col(AMOUNT).sum(),
            Metric::Count => col(AMOUNT).count(),
        }
        .cast(DataType::Float64)
        .alias(VALUE)
    }
}

/// Record column usable as a breakdown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Startup,
    Industry,
    SubVertical,
    City,
    Round,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Startup => STARTUP,
            Field::Industry => INDUSTRY,
            Field::SubVertical => SUBVERTICAL,
            Field::City => CITY,
            Field::Round => ROUND,
        }
    }
}

/// One row of a ranking or breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Startup with the largest funding total in a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearLeader {
    pub startup: String,
    pub amount: f64,
}

/// Year x month amount grid. `cells[y][m]` pairs `years[y]` with `months[m]`; gaps are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub years: Vec<i32>,
    pub months: Vec<i32>,
    pub cells: Vec<Vec<f64>>,
}

impl HeatmapGrid {
    pub fn max_value(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Group `lazy` by `key`, aggregate with `metric` and rank descending (ties by label).
pub(crate) fn rank_by(
    lazy: LazyFrame,
    key: &str,
    metric: Metric,
    limit: Option<usize>,
) -> Result<Vec<RankedValue>, QueryError> {
    let mut ranked = lazy
        .filter(col(key).is_not_null())
        .select([col(key).alias(LABEL), col(AMOUNT)])
        .group_by([col(LABEL)])
        .agg([metric.aggregate()])
        .sort(
            [VALUE, LABEL],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        );
    if let Some(n) = limit {
        ranked = ranked.limit(n as IdxSize);
    }
    ranked_values(&ranked.collect()?)
}

/// Read `[label, value]` rows out of an aggregated frame.
pub(crate) fn ranked_values(df: &DataFrame) -> Result<Vec<RankedValue>, QueryError> {
    let label_col = df.column(LABEL)?.cast(&DataType::String)?;
    let value_col = df.column(VALUE)?.cast(&DataType::Float64)?;
    let labels = label_col.as_materialized_series().str()?;
    let values = value_col.as_materialized_series().f64()?;

    Ok(labels
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(label, value)| {
            Some(RankedValue {
                label: label?.to_string(),
                value: value?,
            })
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::DatasetSettings;
    use crate::data::{DataProcessor, FundingTable};
    use polars::prelude::*;

    /// Small market: two years, three startups, overlapping investor names.
    pub fn market() -> FundingTable {
        let raw = df!(
            "date" => &[
                Some("2019-01-10"), Some("2019-01-20"), Some("2019-03-02"),
                Some("2020-01-15"), Some("2020-06-01"), Some("garbage"), Some("2020-06-21"),
            ],
            "startup" => &["Foo", "Bar", "Baz", "Foo", "Bar", "Baz", "Qux"],
            "industry" => &["Fintech", "Edtech", "Fintech", "Fintech", "Edtech", "Health", "Health"],
            "subvertical" => &["Payments", "0", "Lending", "Payments", "0", "Clinics", "0"],
            "city" => &["Bengaluru", "Mumbai", "Bangalore", "Bangalore", "Mumbai", "Delhi", "Delhi"],
            "investor" => &[
                "Alpha,Beta", "Alpha Ventures", "Gamma, & Others", "Alpha,Gamma", "Beta", "Delta,", "Omega",
            ],
            "investmenttype" => &["Seed", "Seed", "Series A", "Series B", "Series A", "Seed", "Seed"],
            "paisa" => &[5.0, 3.0, 4.0, 8.0, 6.0, 2.0, 0.0],
        )
        .unwrap();
        DataProcessor::clean(&raw, &DatasetSettings::default()).unwrap()
    }

    /// One record with investor "A,B" and amount 10.
    pub fn pair() -> FundingTable {
        let raw = df!(
            "date" => &["2021-05-01"],
            "startup" => &["Solo"],
            "industry" => &["Fintech"],
            "subvertical" => &["0"],
            "city" => &["Pune"],
            "investor" => &["A,B"],
            "investmenttype" => &["Seed"],
            "paisa" => &[10.0],
        )
        .unwrap();
        DataProcessor::clean(&raw, &DatasetSettings::default()).unwrap()
    }

    pub fn empty() -> FundingTable {
        let raw = df!(
            "date" => &["2021-05-01"],
            "startup" => &["Nobody"],
            "industry" => &["Fintech"],
            "subvertical" => &["0"],
            "city" => &["Pune"],
            "investor" => &["A"],
            "investmenttype" => &["Seed"],
            "paisa" => &[0.0],
        )
        .unwrap();
        DataProcessor::clean(&raw, &DatasetSettings::default()).unwrap()
    }
}
