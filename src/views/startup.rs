//! Startup detail page.

use super::{funding_rows, FundingRow, UNKNOWN_SUBVERTICAL};
use crate::data::columns::*;
use crate::data::FundingTable;
use crate::query::{InvestorQueries, MarketQueries, QueryError, YearValue};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartupProfile {
    pub name: String,
    pub industries: Vec<String>,
    /// Known sub-verticals. Empty when none was recorded.
    pub subverticals: Vec<String>,
    pub cities: Vec<String>,
    pub history: Vec<FundingRow>,
    pub yearly: Vec<YearValue>,
    pub investors: Vec<String>,
}

impl StartupProfile {
    pub fn industry_label(&self) -> String {
        format!("Related Industry: {}", self.industries.join(", "))
    }

    pub fn work_label(&self) -> String {
        if self.subverticals.is_empty() {
            "Work is not known".to_string()
        } else {
            format!("Work on: {}", self.subverticals.join(", "))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Funding history and tags for `name`. An unknown startup gives an empty profile.
pub fn build_startup_profile(table: &FundingTable, name: &str) -> Result<StartupProfile, QueryError> {
    let records = MarketQueries::filter_equals(table.records(), STARTUP, name)?;

    let subverticals = MarketQueries::distinct_values(&records, SUBVERTICAL)?
        .into_iter()
        .filter(|s| s != UNKNOWN_SUBVERTICAL)
        .collect();

    Ok(StartupProfile {
        name: name.to_string(),
        industries: MarketQueries::distinct_values(&records, INDUSTRY)?,
        subverticals,
        cities: MarketQueries::distinct_values(&records, CITY)?,
        history: funding_rows(&records)?,
        yearly: MarketQueries::yearly_totals(&records)?,
        investors: InvestorQueries::investors_of(table, &records)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures;

    #[test]
    fn profile_of_a_known_startup() {
        let table = fixtures::market();
        let profile = build_startup_profile(&table, "Foo").unwrap();
        assert_eq!(profile.industries, vec!["Fintech"]);
        assert_eq!(profile.work_label(), "Work on: Payments");
        assert_eq!(profile.cities, vec!["Bangalore"]);
        assert_eq!(profile.history.len(), 2);
        assert_eq!(
            profile.yearly,
            vec![YearValue { year: 2019, value: 5.0 }, YearValue { year: 2020, value: 8.0 }]
        );
        assert_eq!(profile.investors, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn sentinel_subvertical_means_unknown_work() {
        let table = fixtures::market();
        let profile = build_startup_profile(&table, "Bar").unwrap();
        assert!(profile.subverticals.is_empty());
        assert_eq!(profile.work_label(), "Work is not known");
    }

    #[test]
    fn undated_rows_stay_in_history_but_not_in_yearly() {
        let table = fixtures::market();
        let profile = build_startup_profile(&table, "Baz").unwrap();
        assert_eq!(profile.history.len(), 2);
        assert_eq!(profile.yearly, vec![YearValue { year: 2019, value: 4.0 }]);
        assert_eq!(profile.industries, vec!["Fintech", "Health"]);
        assert_eq!(profile.investors, vec!["Gamma", "Delta"]);
    }

    #[test]
    fn unknown_startup_is_empty_not_an_error() {
        let table = fixtures::market();
        let profile = build_startup_profile(&table, "Nope").unwrap();
        assert!(profile.is_empty());
        assert!(profile.cities.is_empty());
        assert!(profile.investors.is_empty());
        assert_eq!(profile.work_label(), "Work is not known");
    }
}
