//! Overall market analysis page.

use super::{OverviewParams, UNKNOWN_SUBVERTICAL};
use crate::config::OverviewSettings;
use crate::data::columns::SUBVERTICAL;
use crate::data::FundingTable;
use crate::query::{
    Field, HeatmapGrid, InvestorQueries, MarketQueries, Metric, MonthlyPoint, QueryError, RankedValue,
    YearLeader,
};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub total_invested: f64,
    pub average_per_startup: Option<f64>,
    pub startup_count: usize,
    pub max_startup_total: Option<f64>,
    pub params: OverviewParams,
    /// Month-on-month series for `params.series_metric`.
    pub monthly: Vec<MonthlyPoint>,
    /// Industry breakdown for `params.sector_metric`.
    pub industries: Vec<RankedValue>,
    pub rounds: Vec<RankedValue>,
    pub cities: Vec<RankedValue>,
    /// Sub-verticals by money; the "not recorded" sentinel is left out.
    pub subverticals: Vec<RankedValue>,
    pub year_leaders: BTreeMap<i32, YearLeader>,
    pub top_startups: Vec<RankedValue>,
    pub top_investors: Vec<RankedValue>,
    pub heatmap: HeatmapGrid,
}

pub fn build_overview(
    table: &FundingTable,
    params: &OverviewParams,
    settings: &OverviewSettings,
) -> Result<OverviewReport, QueryError> {
    debug!("building overview with {:?}", params);
    let records = table.records();
    let limit = settings.breakdown_limit;
    let known_work = records
        .clone()
        .lazy()
        .filter(col(SUBVERTICAL).neq(lit(UNKNOWN_SUBVERTICAL)))
        .collect()?;

    Ok(OverviewReport {
        total_invested: MarketQueries::total_invested(records)?,
        average_per_startup: MarketQueries::average_per_startup(records)?,
        startup_count: MarketQueries::startup_count(records)?,
        max_startup_total: MarketQueries::max_startup_total(records)?,
        params: *params,
        monthly: MarketQueries::monthly_series(records, params.series_metric)?,
        industries: MarketQueries::top_industries(records, params.sector_metric, limit)?,
        rounds: MarketQueries::top_by_field(records, Field::Round, Metric::Money, limit)?,
        cities: MarketQueries::top_by_field(records, Field::City, Metric::Money, limit)?,
        subverticals: MarketQueries::top_by_field(&known_work, Field::SubVertical, Metric::Money, limit)?,
        year_leaders: MarketQueries::top_startup_per_year(records)?,
        top_startups: MarketQueries::top_startups_overall(records, settings.top_startups)?,
        top_investors: InvestorQueries::top_investors(table, settings.top_investors)?,
        heatmap: MarketQueries::amount_heatmap(records)?,
    })
}
