//! Data Processor Module
//! Cleans raw CSV rows into a `FundingTable` and normalizes the investor list.

use super::columns::*;
use super::FundingTable;
use crate::config::{CityAlias, DatasetSettings};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),
}

/// Date layouts tried in order. A trailing time component is ignored.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a calendar date, returning `None` for anything unrecognized.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Split a raw investor string into distinct, trimmed names, dropping noise tokens.
pub fn split_investors<'a>(raw: &'a str, delimiter: &str, noise: &[String]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for token in raw.split(delimiter) {
        let name = token.trim();
        if noise.iter().any(|n| n.trim() == name) || names.contains(&name) {
            continue;
        }
        names.push(name);
    }
    names
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Clean raw rows into a `FundingTable`.
    ///
    /// Zero-amount rows are dropped. Unparseable dates become null and the row is kept.
    pub fn clean(raw: &DataFrame, settings: &DatasetSettings) -> Result<FundingTable, ProcessorError> {
        let names = &settings.columns;
        let date_col = Self::string_column(raw, &names.date)?;
        let startup_col = Self::string_column(raw, &names.startup)?;
        let industry_col = Self::string_column(raw, &names.industry)?;
        let subvertical_col = Self::string_column(raw, &names.subvertical)?;
        let city_col = Self::string_column(raw, &names.city)?;
        let investors_col = Self::string_column(raw, &names.investors)?;
        let round_col = Self::string_column(raw, &names.round)?;
        let amount_col = Self::required(raw, &names.amount)?.cast(&DataType::Float64)?;

        let raw_dates = date_col.as_materialized_series().str()?;
        let raw_startups = startup_col.as_materialized_series().str()?;
        let raw_industries = industry_col.as_materialized_series().str()?;
        let raw_subverticals = subvertical_col.as_materialized_series().str()?;
        let raw_cities = city_col.as_materialized_series().str()?;
        let raw_investors = investors_col.as_materialized_series().str()?;
        let raw_rounds = round_col.as_materialized_series().str()?;
        let raw_amounts = amount_col.as_materialized_series().f64()?;

        let height = raw.height();
        let mut record_ids: Vec<u32> = Vec::with_capacity(height);
        let mut dates: Vec<Option<String>> = Vec::with_capacity(height);
        let mut years: Vec<Option<i32>> = Vec::with_capacity(height);
        let mut months: Vec<Option<i32>> = Vec::with_capacity(height);
        let mut startups: Vec<Option<String>> = Vec::with_capacity(height);
        let mut industries: Vec<Option<String>> = Vec::with_capacity(height);
        let mut subverticals: Vec<Option<String>> = Vec::with_capacity(height);
        let mut cities: Vec<Option<String>> = Vec::with_capacity(height);
        let mut investors: Vec<Option<String>> = Vec::with_capacity(height);
        let mut rounds: Vec<Option<String>> = Vec::with_capacity(height);
        let mut amounts: Vec<Option<f64>> = Vec::with_capacity(height);

        let mut link_ids: Vec<u32> = Vec::new();
        let mut link_names: Vec<String> = Vec::new();
        let mut link_amounts: Vec<Option<f64>> = Vec::new();
        let mut link_years: Vec<Option<i32>> = Vec::new();

        let mut zero_rows = 0usize;
        let mut bad_dates = 0usize;

        for i in 0..height {
            let amount = raw_amounts.get(i);
            if amount == Some(0.0) {
                zero_rows += 1;
                continue;
            }

            let record_id = record_ids.len() as u32;
            let raw_date = Self::text(raw_dates, i);
            let date = raw_date.as_deref().and_then(parse_date);
            if raw_date.is_some() && date.is_none() {
                bad_dates += 1;
            }
            let year = date.map(|d| d.year());

            let investor_field = raw_investors.get(i);
            if let Some(field) = investor_field {
                for name in split_investors(field, &settings.investor_delimiter, &settings.noise_investors) {
                    link_ids.push(record_id);
                    link_names.push(name.to_string());
                    link_amounts.push(amount);
                    link_years.push(year);
                }
            }

            record_ids.push(record_id);
            dates.push(date.map(|d| d.format("%Y-%m-%d").to_string()));
            years.push(year);
            months.push(date.map(|d| d.month() as i32));
            startups.push(Self::text(raw_startups, i));
            industries.push(Self::text(raw_industries, i));
            subverticals.push(Self::text(raw_subverticals, i));
            cities.push(Self::text(raw_cities, i).map(|c| Self::normalize_city(c, &settings.city_aliases)));
            investors.push(investor_field.map(str::to_string));
            rounds.push(Self::text(raw_rounds, i));
            amounts.push(amount);
        }

        if bad_dates > 0 {
            warn!("{} records have an unparseable date; kept without year/month", bad_dates);
        }
        debug!(
            "cleaned {} rows: {} kept, {} zero-amount dropped, {} investor links",
            height,
            record_ids.len(),
            zero_rows,
            link_ids.len()
        );

        let records = DataFrame::new(vec![
            Column::new(RECORD_ID.into(), record_ids),
            Column::new(DATE.into(), dates),
            Column::new(YEAR.into(), years),
            Column::new(MONTH.into(), months),
            Column::new(STARTUP.into(), startups),
            Column::new(INDUSTRY.into(), industries),
            Column::new(SUBVERTICAL.into(), subverticals),
            Column::new(CITY.into(), cities),
            Column::new(INVESTORS.into(), investors),
            Column::new(ROUND.into(), rounds),
            Column::new(AMOUNT.into(), amounts),
        ])?;

        let links = DataFrame::new(vec![
            Column::new(RECORD_ID.into(), link_ids),
            Column::new(INVESTOR.into(), link_names),
            Column::new(AMOUNT.into(), link_amounts),
            Column::new(YEAR.into(), link_years),
        ])?;

        Ok(FundingTable::new(records, links))
    }

    fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<Column, ProcessorError> {
        Ok(Self::required(df, name)?.cast(&DataType::String)?)
    }

    /// Trimmed value at `i`; blank strings become `None`.
    fn text(values: &StringChunked, i: usize) -> Option<String> {
        values
            .get(i)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn normalize_city(city: String, aliases: &[CityAlias]) -> String {
        aliases
            .iter()
            .find(|alias| alias.from == city)
            .map(|alias| alias.to.clone())
            .unwrap_or(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        df!(
            "date" => &[Some("2019-01-05"), Some("05/02/2019"), Some("someday"), None, Some("2020-03-10 00:00:00")],
            "startup" => &["Foo", "Bar", "Baz", "Qux", " Foo "],
            "industry" => &["Fintech", "Edtech", "Fintech", "Health", "Fintech"],
            "subvertical" => &[Some("Payments"), Some("0"), None, Some(""), Some("Payments")],
            "city" => &["Bengaluru", "Mumbai", "Bangalore", "Delhi", "Bangalore"],
            "investor" => &["A,B", " & Others", "A, A ,C", "", "B,"],
            "investmenttype" => &["Seed", "Series A", "Seed", "Seed", "Series B"],
            "paisa" => &[5.0, 3.0, 2.0, 0.0, 8.0],
        )
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2019, 2, 5);
        assert_eq!(parse_date("2019-02-05"), expected);
        assert_eq!(parse_date("05/02/2019"), expected);
        assert_eq!(parse_date("05.02.2019"), expected);
        assert_eq!(parse_date("2019-02-05 10:30:00"), expected);
        assert_eq!(parse_date("2019-02-05T10:30:00"), expected);
        assert_eq!(parse_date("31/02/2019"), None);
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn split_investors_trims_dedupes_and_drops_noise() {
        let noise = DatasetSettings::default().noise_investors;
        assert_eq!(split_investors("A,B", ",", &noise), vec!["A", "B"]);
        assert_eq!(split_investors("A, A ,C", ",", &noise), vec!["A", "C"]);
        assert_eq!(split_investors("Sequoia, & Others", ",", &noise), vec!["Sequoia"]);
        assert!(split_investors("", ",", &noise).is_empty());
        assert!(split_investors(",,", ",", &noise).is_empty());
    }

    #[test]
    fn zero_amount_rows_are_removed() {
        let table = DataProcessor::clean(&raw_frame(), &DatasetSettings::default()).unwrap();
        assert_eq!(table.len(), 4);

        let amounts: Vec<Option<f64>> = table
            .records()
            .column(AMOUNT)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert!(amounts.iter().all(|a| *a != Some(0.0)));
        assert_eq!(strings(table.records(), STARTUP)[3].as_deref(), Some("Foo"));
    }

    #[test]
    fn unparseable_dates_keep_the_row() {
        let table = DataProcessor::clean(&raw_frame(), &DatasetSettings::default()).unwrap();
        let dates = strings(table.records(), DATE);
        assert_eq!(dates[0].as_deref(), Some("2019-01-05"));
        assert_eq!(dates[1].as_deref(), Some("2019-02-05"));
        assert_eq!(dates[2], None);
        assert_eq!(dates[3].as_deref(), Some("2020-03-10"));

        let years: Vec<Option<i32>> = table
            .records()
            .column(YEAR)
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2019), Some(2019), None, Some(2020)]);
    }

    #[test]
    fn cities_are_normalized_and_blanks_become_null() {
        let table = DataProcessor::clean(&raw_frame(), &DatasetSettings::default()).unwrap();
        let cities = strings(table.records(), CITY);
        assert_eq!(cities[0].as_deref(), Some("Bangalore"));
        let subverticals = strings(table.records(), SUBVERTICAL);
        assert_eq!(subverticals[1].as_deref(), Some("0"));
        assert_eq!(subverticals[2], None);
    }

    #[test]
    fn investor_relation_excludes_noise() {
        let table = DataProcessor::clean(&raw_frame(), &DatasetSettings::default()).unwrap();
        let names: Vec<String> = strings(table.investors(), INVESTOR)
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(names, vec!["A", "B", "A", "C", "B"]);

        let ids: Vec<Option<u32>> = table
            .investors()
            .column(RECORD_ID)
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some(0), Some(0), Some(2), Some(2), Some(3)]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let raw = raw_frame().drop("paisa").unwrap();
        let err = DataProcessor::clean(&raw, &DatasetSettings::default()).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "paisa"));
    }
}
