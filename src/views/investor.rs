//! Investor detail page and the similar-investor drill-down.

use super::{funding_rows, FundingRow, InvestorTrail};
use crate::config::InvestorViewSettings;
use crate::data::FundingTable;
use crate::query::{Field, InvestorQueries, MarketQueries, Metric, QueryError, RankedValue, YearValue};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorProfile {
    pub name: String,
    /// Most recent investments first; undated ones last.
    pub recent: Vec<FundingRow>,
    pub top_startups: Vec<RankedValue>,
    pub industries: Vec<RankedValue>,
    pub stages: Vec<RankedValue>,
    pub cities: Vec<RankedValue>,
    pub yearly: Vec<YearValue>,
    pub similar: Vec<String>,
}

impl InvestorProfile {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

pub fn build_investor_profile(
    table: &FundingTable,
    name: &str,
    settings: &InvestorViewSettings,
) -> Result<InvestorProfile, QueryError> {
    let mode = settings.investor_match;
    let records = InvestorQueries::investor_records(table, name, mode)?;
    debug!("investor {:?}: {} matching records ({:?} match)", name, records.height(), mode);

    let mut recent = funding_rows(&records)?;
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(settings.recent_limit);

    Ok(InvestorProfile {
        name: name.to_string(),
        recent,
        top_startups: MarketQueries::top_by_field(&records, Field::Startup, Metric::Money, settings.top_startups)?,
        industries: MarketQueries::top_by_field(&records, Field::Industry, Metric::Money, settings.top_industries)?,
        stages: MarketQueries::breakdown(&records, Field::Round, Metric::Money)?,
        cities: MarketQueries::breakdown(&records, Field::City, Metric::Money)?,
        yearly: MarketQueries::yearly_totals(&records)?,
        similar: InvestorQueries::similar_investors(table, name, mode)?,
    })
}

/// One profile per trail entry, root first.
pub fn build_investor_trail(
    table: &FundingTable,
    trail: &InvestorTrail,
    settings: &InvestorViewSettings,
) -> Result<Vec<InvestorProfile>, QueryError> {
    let mut profiles = Vec::with_capacity(trail.names().len());
    for name in trail.names() {
        profiles.push(build_investor_profile(table, name, settings)?);
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvestorMatch;
    use crate::query::fixtures;

    #[test]
    fn profile_sections_for_substring_match() {
        let table = fixtures::market();
        let profile = build_investor_profile(&table, "Alpha", &InvestorViewSettings::default()).unwrap();

        let dates: Vec<Option<&str>> = profile.recent.iter().map(|r| r.date.as_deref()).collect();
        assert_eq!(dates, vec![Some("2020-01-15"), Some("2019-01-20"), Some("2019-01-10")]);

        assert_eq!(profile.top_startups[0], RankedValue { label: "Foo".into(), value: 13.0 });
        assert_eq!(profile.top_startups[1].label, "Bar");
        assert_eq!(profile.industries[0].label, "Fintech");
        assert_eq!(profile.stages.len(), 2);
        assert_eq!(profile.cities.len(), 2);
        assert_eq!(
            profile.yearly,
            vec![YearValue { year: 2019, value: 8.0 }, YearValue { year: 2020, value: 8.0 }]
        );
        assert_eq!(profile.similar, vec!["Alpha Ventures", "Beta", "Gamma"]);
    }

    #[test]
    fn exact_match_setting_narrows_the_profile() {
        let table = fixtures::market();
        let settings = InvestorViewSettings {
            investor_match: InvestorMatch::Exact,
            ..Default::default()
        };
        let profile = build_investor_profile(&table, "Alpha", &settings).unwrap();
        assert_eq!(profile.recent.len(), 2);
        assert_eq!(profile.similar, vec!["Beta", "Gamma"]);
    }

    #[test]
    fn recent_is_capped_and_undated_sort_last() {
        let table = fixtures::market();
        let settings = InvestorViewSettings {
            recent_limit: 1,
            ..Default::default()
        };
        let profile = build_investor_profile(&table, "Delta", &settings).unwrap();
        assert_eq!(profile.recent.len(), 1);
        assert_eq!(profile.recent[0].date, None);
        assert!(profile.yearly.is_empty());
    }

    #[test]
    fn trail_renders_every_level() {
        let table = fixtures::market();
        let trail = InvestorTrail::new("Alpha").drill(0, "Gamma");
        let profiles = build_investor_trail(&table, &trail, &InvestorViewSettings::default()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].name, "Gamma");
        assert!(!profiles[1].similar.contains(&"Gamma".to_string()));
    }

    #[test]
    fn unknown_investor_is_empty() {
        let table = fixtures::market();
        let profile = build_investor_profile(&table, "Nobody", &InvestorViewSettings::default()).unwrap();
        assert!(profile.is_empty());
        assert!(profile.similar.is_empty());
        assert!(profile.stages.is_empty());
    }
}
