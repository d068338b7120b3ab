//! Market Queries Module
//! Metrics, time series and rankings over a frame of funding records.
//!
//! Every function takes the records frame (the whole table, or any filtered subset of it)
//! and recomputes from scratch. Empty input gives empty output.

use super::{rank_by, Field, HeatmapGrid, Metric, MonthlyPoint, QueryError, RankedValue, YearLeader, YearValue, VALUE};
use crate::data::columns::*;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Stateless aggregations over funding records.
pub struct MarketQueries;

impl MarketQueries {
    /// Sum of all amounts.
    pub fn total_invested(records: &DataFrame) -> Result<f64, QueryError> {
        let amounts = records.column(AMOUNT)?.cast(&DataType::Float64)?;
        Ok(amounts.as_materialized_series().f64()?.sum().unwrap_or(0.0))
    }

    /// Funding total per startup, largest first.
    pub fn startup_totals(records: &DataFrame) -> Result<Vec<RankedValue>, QueryError> {
        rank_by(records.clone().lazy(), STARTUP, Metric::Money, None)
    }

    /// Mean of per-startup totals. `None` when there are no startups.
    pub fn average_per_startup(records: &DataFrame) -> Result<Option<f64>, QueryError> {
        let totals = Self::startup_totals(records)?;
        if totals.is_empty() {
            return Ok(None);
        }
        let sum: f64 = totals.iter().map(|t| t.value).sum();
        Ok(Some(sum / totals.len() as f64))
    }

    /// Number of distinct startups.
    pub fn startup_count(records: &DataFrame) -> Result<usize, QueryError> {
        Ok(Self::distinct_values(records, STARTUP)?.len())
    }

    /// Largest per-startup total. `None` when there are no startups.
    pub fn max_startup_total(records: &DataFrame) -> Result<Option<f64>, QueryError> {
        Ok(Self::startup_totals(records)?.first().map(|t| t.value))
    }

    /// Metric per (year, month), ordered by year then month. Undated records are skipped.
    pub fn monthly_series(records: &DataFrame, metric: Metric) -> Result<Vec<MonthlyPoint>, QueryError> {
        let out = records
            .clone()
            .lazy()
            .filter(col(YEAR).is_not_null().and(col(MONTH).is_not_null()))
            .group_by([col(YEAR), col(MONTH)])
            .agg([metric.aggregate()])
            .sort([YEAR, MONTH], SortMultipleOptions::default())
            .collect()?;

        let years = out.column(YEAR)?.as_materialized_series().i32()?;
        let months = out.column(MONTH)?.as_materialized_series().i32()?;
        let values = out.column(VALUE)?.as_materialized_series().f64()?;

        Ok(years
            .into_iter()
            .zip(months.into_iter())
            .zip(values.into_iter())
            .filter_map(|((year, month), value)| {
                Some(MonthlyPoint {
                    year: year?,
                    month: month?,
                    value: value?,
                })
            })
            .collect())
    }

    /// Top `n` values of `field` by `metric`.
    pub fn top_by_field(
        records: &DataFrame,
        field: Field,
        metric: Metric,
        n: usize,
    ) -> Result<Vec<RankedValue>, QueryError> {
        rank_by(records.clone().lazy(), field.column(), metric, Some(n))
    }

    /// Every value of `field` by `metric`, largest first.
    pub fn breakdown(records: &DataFrame, field: Field, metric: Metric) -> Result<Vec<RankedValue>, QueryError> {
        rank_by(records.clone().lazy(), field.column(), metric, None)
    }

    pub fn top_industries(records: &DataFrame, metric: Metric, n: usize) -> Result<Vec<RankedValue>, QueryError> {
        Self::top_by_field(records, Field::Industry, metric, n)
    }

    pub fn top_startups_overall(records: &DataFrame, n: usize) -> Result<Vec<RankedValue>, QueryError> {
        Self::top_by_field(records, Field::Startup, Metric::Money, n)
    }

    /// Startup with the highest funding total in each year.
    ///
    /// On equal totals the startup seen first in row order wins.
    pub fn top_startup_per_year(records: &DataFrame) -> Result<BTreeMap<i32, YearLeader>, QueryError> {
        let out = records
            .clone()
            .lazy()
            .filter(col(YEAR).is_not_null().and(col(STARTUP).is_not_null()))
            .group_by_stable([col(YEAR), col(STARTUP)])
            .agg([Metric::Money.aggregate()])
            .collect()?;

        let years = out.column(YEAR)?.as_materialized_series().i32()?;
        let startups = out.column(STARTUP)?.as_materialized_series().str()?;
        let values = out.column(VALUE)?.as_materialized_series().f64()?;

        let mut leaders: BTreeMap<i32, YearLeader> = BTreeMap::new();
        for ((year, startup), value) in years.into_iter().zip(startups.into_iter()).zip(values.into_iter()) {
            let (Some(year), Some(startup), Some(amount)) = (year, startup, value) else {
                continue;
            };
            let beats_current = leaders.get(&year).map_or(true, |leader| amount > leader.amount);
            if beats_current {
                leaders.insert(
                    year,
                    YearLeader {
                        startup: startup.to_string(),
                        amount,
                    },
                );
            }
        }
        Ok(leaders)
    }

    /// Funding total per year, ordered by year. Undated records are skipped.
    pub fn yearly_totals(records: &DataFrame) -> Result<Vec<YearValue>, QueryError> {
        let out = records
            .clone()
            .lazy()
            .filter(col(YEAR).is_not_null())
            .group_by([col(YEAR)])
            .agg([Metric::Money.aggregate()])
            .sort([YEAR], SortMultipleOptions::default())
            .collect()?;

        let years = out.column(YEAR)?.as_materialized_series().i32()?;
        let values = out.column(VALUE)?.as_materialized_series().f64()?;
        Ok(years
            .into_iter()
            .zip(values.into_iter())
            .filter_map(|(year, value)| Some(YearValue { year: year?, value: value? }))
            .collect())
    }

    /// Year x month grid of summed amounts.
    pub fn amount_heatmap(records: &DataFrame) -> Result<HeatmapGrid, QueryError> {
        let series = Self::monthly_series(records, Metric::Money)?;
        let years: Vec<i32> = series.iter().map(|p| p.year).collect::<BTreeSet<_>>().into_iter().collect();
        let months: Vec<i32> = series.iter().map(|p| p.month).collect::<BTreeSet<_>>().into_iter().collect();

        let mut cells = vec![vec![0.0; months.len()]; years.len()];
        for point in &series {
            let (Ok(y), Ok(m)) = (years.binary_search(&point.year), months.binary_search(&point.month)) else {
                continue;
            };
            cells[y][m] = point.value;
        }

        Ok(HeatmapGrid { years, months, cells })
    }

    /// Distinct non-null values of a string column, in first-appearance order.
    pub fn distinct_values(records: &DataFrame, column: &str) -> Result<Vec<String>, QueryError> {
        let values = records.column(column)?.cast(&DataType::String)?;
        let mut seen = BTreeSet::new();
        let mut distinct = Vec::new();
        for value in values.as_materialized_series().str()?.into_iter().flatten() {
            if seen.insert(value) {
                distinct.push(value.to_string());
            }
        }
        Ok(distinct)
    }

    /// Sorted distinct startup names.
    pub fn startup_names(records: &DataFrame) -> Result<Vec<String>, QueryError> {
        let mut names = Self::distinct_values(records, STARTUP)?;
        names.sort();
        Ok(names)
    }

    /// Records whose `column` equals `value` exactly.
    pub fn filter_equals(records: &DataFrame, column: &str, value: &str) -> Result<DataFrame, QueryError> {
        let values = records.column(column)?.cast(&DataType::String)?;
        let flags: Vec<bool> = values
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v == Some(value))
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &flags);
        Ok(records.filter(&mask)?)
    }
}
