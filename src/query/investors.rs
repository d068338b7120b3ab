//! Investor Queries Module
//! Rankings and lookups built on the record-to-investor relation.

use super::{rank_by, Metric, QueryError, RankedValue};
use crate::config::InvestorMatch;
use crate::data::columns::*;
use crate::data::FundingTable;
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Stateless investor aggregations.
pub struct InvestorQueries;

impl InvestorQueries {
    /// Sorted distinct investor names, noise tokens excluded.
    pub fn vocabulary(table: &FundingTable) -> Result<Vec<String>, QueryError> {
        let names = table.investors().column(INVESTOR)?.as_materialized_series().str()?;
        let vocabulary: BTreeSet<&str> = names.into_iter().flatten().collect();
        Ok(vocabulary.into_iter().map(str::to_string).collect())
    }

    /// Investors ranked by the summed amount of every record naming them.
    ///
    /// Each record's full amount counts toward every investor on it. Links without an
    /// amount are skipped.
    pub fn top_investors(table: &FundingTable, n: usize) -> Result<Vec<RankedValue>, QueryError> {
        let links = table
            .investors()
            .clone()
            .lazy()
            .filter(col(AMOUNT).is_not_null());
        rank_by(links, INVESTOR, Metric::Money, Some(n))
    }

    /// Records attributed to `name`.
    ///
    /// With `InvestorMatch::Substring` any record whose raw investor string contains
    /// `name` matches, so "Alpha" also picks up "Alpha Ventures".
    pub fn investor_records(
        table: &FundingTable,
        name: &str,
        mode: InvestorMatch,
    ) -> Result<DataFrame, QueryError> {
        let records = table.records();
        let flags: Vec<bool> = match mode {
            InvestorMatch::Substring => records
                .column(INVESTORS)?
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|field| !name.is_empty() && field.is_some_and(|f| f.contains(name)))
                .collect(),
            InvestorMatch::Exact => {
                let ids = Self::linked_record_ids(table, name)?;
                records
                    .column(RECORD_ID)?
                    .as_materialized_series()
                    .u32()?
                    .into_iter()
                    .map(|id| id.is_some_and(|id| ids.contains(&id)))
                    .collect()
            }
        };
        let mask = BooleanChunked::from_slice("mask".into(), &flags);
        Ok(records.filter(&mask)?)
    }

    /// Investors appearing alongside `name` on its records, sorted. Never contains `name`.
    pub fn similar_investors(
        table: &FundingTable,
        name: &str,
        mode: InvestorMatch,
    ) -> Result<Vec<String>, QueryError> {
        let matched = Self::investor_records(table, name, mode)?;
        let vocabulary: HashSet<String> = Self::vocabulary(table)?.into_iter().collect();

        let similar: BTreeSet<String> = Self::investors_of(table, &matched)?
            .into_iter()
            .filter(|investor| investor != name && vocabulary.contains(investor))
            .collect();
        Ok(similar.into_iter().collect())
    }

    /// Distinct investors named on `records` (a subset of the table's records),
    /// in first-appearance order.
    pub fn investors_of(table: &FundingTable, records: &DataFrame) -> Result<Vec<String>, QueryError> {
        let record_ids: HashSet<u32> = records
            .column(RECORD_ID)?
            .as_materialized_series()
            .u32()?
            .into_iter()
            .flatten()
            .collect();

        let links = table.investors();
        let ids = links.column(RECORD_ID)?.as_materialized_series().u32()?;
        let names = links.column(INVESTOR)?.as_materialized_series().str()?;

        let mut seen = HashSet::new();
        let mut investors = Vec::new();
        for (id, investor) in ids.into_iter().zip(names.into_iter()) {
            let (Some(id), Some(investor)) = (id, investor) else {
                continue;
            };
            if record_ids.contains(&id) && seen.insert(investor) {
                investors.push(investor.to_string());
            }
        }
        Ok(investors)
    }

    fn linked_record_ids(table: &FundingTable, name: &str) -> Result<HashSet<u32>, QueryError> {
        let links = table.investors();
        let ids = links.column(RECORD_ID)?.as_materialized_series().u32()?;
        let names = links.column(INVESTOR)?.as_materialized_series().str()?;
        Ok(ids
            .into_iter()
            .zip(names.into_iter())
            .filter_map(|(id, investor)| (investor == Some(name)).then_some(id).flatten())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures;

    fn ranked(table: &FundingTable, n: usize) -> Vec<(String, f64)> {
        InvestorQueries::top_investors(table, n)
            .unwrap()
            .into_iter()
            .map(|r| (r.label, r.value))
            .collect()
    }

    #[test]
    fn each_investor_gets_the_full_amount() {
        let table = fixtures::pair();
        assert_eq!(ranked(&table, 10), vec![("A".to_string(), 10.0), ("B".to_string(), 10.0)]);
    }

    #[test]
    fn top_investors_rank_descending_without_noise() {
        let table = fixtures::market();
        let top = ranked(&table, 10);
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma", "Beta", "Alpha Ventures", "Delta"]);
        assert_eq!(top[0].1, 13.0);
        assert!(!names.contains(&""));
        assert!(!names.contains(&"& Others"));

        assert_eq!(ranked(&table, 2).len(), 2);
    }

    #[test]
    fn vocabulary_is_sorted_and_clean() {
        let table = fixtures::market();
        assert_eq!(
            InvestorQueries::vocabulary(&table).unwrap(),
            vec!["Alpha", "Alpha Ventures", "Beta", "Delta", "Gamma"]
        );
    }

    #[test]
    fn substring_match_over_matches_longer_names() {
        let table = fixtures::market();
        let records = InvestorQueries::investor_records(&table, "Alpha", InvestorMatch::Substring).unwrap();
        assert_eq!(records.height(), 3);
    }

    #[test]
    fn exact_match_uses_split_names() {
        let table = fixtures::market();
        let records = InvestorQueries::investor_records(&table, "Alpha", InvestorMatch::Exact).unwrap();
        assert_eq!(records.height(), 2);
        let none = InvestorQueries::investor_records(&table, "Nobody", InvestorMatch::Exact).unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn empty_name_matches_nothing() {
        let table = fixtures::market();
        let records = InvestorQueries::investor_records(&table, "", InvestorMatch::Substring).unwrap();
        assert_eq!(records.height(), 0);
    }

    #[test]
    fn similar_investors_exclude_the_investor_itself() {
        let table = fixtures::market();
        let substring = InvestorQueries::similar_investors(&table, "Alpha", InvestorMatch::Substring).unwrap();
        assert_eq!(substring, vec!["Alpha Ventures", "Beta", "Gamma"]);

        let exact = InvestorQueries::similar_investors(&table, "Alpha", InvestorMatch::Exact).unwrap();
        assert_eq!(exact, vec!["Beta", "Gamma"]);

        for name in InvestorQueries::vocabulary(&table).unwrap() {
            let similar = InvestorQueries::similar_investors(&table, &name, InvestorMatch::Substring).unwrap();
            assert!(!similar.contains(&name));
        }
    }

    #[test]
    fn investors_of_a_record_subset() {
        let table = fixtures::market();
        let foo = crate::query::MarketQueries::filter_equals(table.records(), STARTUP, "Foo").unwrap();
        assert_eq!(InvestorQueries::investors_of(&table, &foo).unwrap(), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn unknown_investor_has_no_similar_investors() {
        let table = fixtures::market();
        assert!(InvestorQueries::similar_investors(&table, "Nobody", InvestorMatch::Substring)
            .unwrap()
            .is_empty());
    }
}
