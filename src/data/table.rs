//! Cleaned funding dataset.

use polars::prelude::*;

/// Cleaned funding records plus the record-to-investor relation.
///
/// `records` holds one row per funding event:
/// `[record_id, date, year, month, startup, industry, subvertical, city, investors, round, amount]`.
///
/// `investors` holds one row per (record, investor) pair, with the record's amount and
/// year copied alongside: `[record_id, investor, amount, year]`. Noise tokens never appear.
#[derive(Debug, Clone)]
pub struct FundingTable {
    records: DataFrame,
    investors: DataFrame,
}

impl FundingTable {
    pub(crate) fn new(records: DataFrame, investors: DataFrame) -> Self {
        Self { records, investors }
    }

    pub fn records(&self) -> &DataFrame {
        &self.records
    }

    pub fn investors(&self) -> &DataFrame {
        &self.investors
    }

    /// Number of cleaned funding records.
    pub fn len(&self) -> usize {
        self.records.height()
    }

    pub fn is_empty(&self) -> bool {
        self.records.height() == 0
    }
}
