//! Views module - the three dashboard flows
//!
//! Each view is a pure function of the table and an explicit navigation value.
//! Nothing here remembers the previous selection.

mod investor;
mod overview;
mod startup;

pub use investor::{build_investor_trail, InvestorProfile};
pub use overview::{build_overview, OverviewReport};
pub use startup::{build_startup_profile, StartupProfile};

use crate::config::AppConfig;
use crate::data::columns::*;
use crate::data::FundingTable;
use crate::query::{Metric, QueryError};
use polars::prelude::*;
use serde::Serialize;

/// Sub-vertical value meaning "not recorded".
pub(crate) const UNKNOWN_SUBVERTICAL: &str = "0";

/// Sidebar mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Overview,
    Startups,
    Investors,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Overview, Mode::Startups, Mode::Investors];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Overview => "Overall Analysis",
            Mode::Startups => "StartUps",
            Mode::Investors => "Investors",
        }
    }
}

/// Metric toggles on the overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OverviewParams {
    pub series_metric: Metric,
    pub sector_metric: Metric,
}

/// Drill-down stack of investors. The first entry is the investor picked in the sidebar;
/// each later entry was chosen from the similar investors of the one before it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InvestorTrail {
    names: Vec<String>,
}

impl InvestorTrail {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            names: vec![root.into()],
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Trail after choosing `name` among the similar investors shown at `depth`.
    /// Entries past `depth` are discarded.
    pub fn drill(&self, depth: usize, name: impl Into<String>) -> Self {
        let keep = (depth + 1).min(self.names.len());
        let mut names = self.names[..keep].to_vec();
        names.push(name.into());
        Self { names }
    }
}

/// What the main panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Overview(OverviewParams),
    Startup(String),
    Investor(InvestorTrail),
}

/// A computed page, ready to draw or print.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ReportView {
    Overview(OverviewReport),
    Startup(StartupProfile),
    Investor { trail: Vec<InvestorProfile> },
}

/// Compute the page for `navigation`.
pub fn render(
    table: &FundingTable,
    navigation: &Navigation,
    config: &AppConfig,
) -> Result<ReportView, QueryError> {
    Ok(match navigation {
        Navigation::Overview(params) => {
            ReportView::Overview(build_overview(table, params, &config.overview)?)
        }
        Navigation::Startup(name) => ReportView::Startup(build_startup_profile(table, name)?),
        Navigation::Investor(trail) => ReportView::Investor {
            trail: build_investor_trail(table, trail, &config.investor_view)?,
        },
    })
}

/// One funding record as shown in history tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRow {
    pub date: Option<String>,
    pub startup: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub investors: Option<String>,
    pub round: Option<String>,
    pub amount: Option<f64>,
}

/// Read records into display rows, in frame order.
pub(crate) fn funding_rows(records: &DataFrame) -> Result<Vec<FundingRow>, QueryError> {
    let text = |name: &str| -> Result<Vec<Option<String>>, QueryError> {
        Ok(records
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    };

    let dates = text(DATE)?;
    let startups = text(STARTUP)?;
    let industries = text(INDUSTRY)?;
    let cities = text(CITY)?;
    let investors = text(INVESTORS)?;
    let rounds = text(ROUND)?;
    let amounts: Vec<Option<f64>> = records
        .column(AMOUNT)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect();

    Ok(dates
        .into_iter()
        .zip(startups)
        .zip(industries)
        .zip(cities)
        .zip(investors)
        .zip(rounds)
        .zip(amounts)
        .map(
            |((((((date, startup), industry), city), investors), round), amount)| FundingRow {
                date,
                startup,
                industry,
                city,
                investors,
                round,
                amount,
            },
        )
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures;

    #[test]
    fn drill_truncates_deeper_entries() {
        let trail = InvestorTrail::new("Alpha").drill(0, "Beta").drill(1, "Gamma");
        assert_eq!(trail.names(), ["Alpha", "Beta", "Gamma"]);

        let rechosen = trail.drill(0, "Delta");
        assert_eq!(rechosen.names(), ["Alpha", "Delta"]);
        assert_eq!(trail.names().len(), 3);
    }

    #[test]
    fn render_dispatches_on_navigation() {
        let table = fixtures::market();
        let config = AppConfig::default();

        let view = render(&table, &Navigation::Overview(OverviewParams::default()), &config).unwrap();
        assert!(matches!(view, ReportView::Overview(_)));

        let view = render(&table, &Navigation::Startup("Foo".into()), &config).unwrap();
        assert!(matches!(view, ReportView::Startup(ref p) if p.name == "Foo"));

        let trail = InvestorTrail::new("Alpha").drill(0, "Beta");
        let view = render(&table, &Navigation::Investor(trail), &config).unwrap();
        match view {
            ReportView::Investor { trail } => {
                let names: Vec<&str> = trail.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Alpha", "Beta"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn funding_rows_follow_frame_order() {
        let table = fixtures::market();
        let rows = funding_rows(table.records()).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].startup.as_deref(), Some("Foo"));
        assert_eq!(rows[0].investors.as_deref(), Some("Alpha,Beta"));
        assert_eq!(rows[5].date, None);
    }
}
