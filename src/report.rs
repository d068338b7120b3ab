//! Terminal Report Module
//! Prints report pages as plain-text tables or JSON for the headless commands.

use crate::charts::{format_amount, ChartPlotter};
use crate::query::{HeatmapGrid, RankedValue, YearValue};
use crate::views::{FundingRow, InvestorProfile, OverviewReport, ReportView, StartupProfile};
use std::fmt::Write;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MonthlyRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Month")]
    month: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Rs in crore")]
    value: String,
}

#[derive(Tabled)]
struct LeaderRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Startup")]
    startup: String,
    #[tabled(rename = "Rs in crore")]
    amount: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Startup")]
    startup: String,
    #[tabled(rename = "Investors")]
    investors: String,
    #[tabled(rename = "Type")]
    round: String,
    #[tabled(rename = "Rs in crore")]
    amount: String,
}

/// Pretty JSON for any page.
pub fn render_json(view: &ReportView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

/// Plain-text rendering of a page.
pub fn render_text(view: &ReportView) -> String {
    let mut out = String::new();
    match view {
        ReportView::Overview(report) => write_overview(&mut out, report),
        ReportView::Startup(profile) => write_startup(&mut out, profile),
        ReportView::Investor { trail } => {
            for (depth, profile) in trail.iter().enumerate() {
                if depth > 0 {
                    out.push_str(&"-".repeat(60));
                    out.push('\n');
                }
                write_investor(&mut out, profile);
            }
        }
    }
    out
}

fn write_overview(out: &mut String, report: &OverviewReport) {
    let optional = |v: Option<f64>| v.map(format_amount).unwrap_or_else(|| "-".to_string());

    heading(out, "Overall Analysis");
    let _ = writeln!(out, "Total Startups investment:   {} Cr", format_amount(report.total_invested));
    let _ = writeln!(out, "Avg Startups investment:     {} Cr", optional(report.average_per_startup));
    let _ = writeln!(out, "Total Startups till invested: {}", report.startup_count);
    let _ = writeln!(out, "Max Startup investment:      {} Cr", optional(report.max_startup_total));

    heading(out, &format!("MoM chart ({})", report.params.series_metric.label()));
    let monthly: Vec<MonthlyRow> = report
        .monthly
        .iter()
        .map(|p| MonthlyRow {
            year: p.year,
            month: ChartPlotter::month_name(p.month),
            value: format_amount(p.value),
        })
        .collect();
    table(out, monthly);

    heading(out, &format!("Sector Analysis ({})", report.params.sector_metric.label()));
    ranked(out, &report.industries);
    heading(out, "Type of funding");
    ranked(out, &report.rounds);
    heading(out, "City Wise Funding");
    ranked(out, &report.cities);
    heading(out, "Top Sub-verticals");
    ranked(out, &report.subverticals);

    heading(out, "Top Startups Year-Wise");
    let leaders: Vec<LeaderRow> = report
        .year_leaders
        .iter()
        .map(|(year, leader)| LeaderRow {
            year: *year,
            startup: leader.startup.clone(),
            amount: format_amount(leader.amount),
        })
        .collect();
    table(out, leaders);

    heading(out, "Top Startups Overall");
    ranked(out, &report.top_startups);
    heading(out, "Top Investors");
    ranked(out, &report.top_investors);

    heading(out, "Funding HeatMap (Year vs. Month)");
    heatmap(out, &report.heatmap);
}

fn write_startup(out: &mut String, profile: &StartupProfile) {
    heading(out, &profile.name);
    if profile.is_empty() {
        out.push_str("No funding records\n");
        return;
    }
    let _ = writeln!(out, "{}", profile.industry_label());
    let _ = writeln!(out, "{}", profile.work_label());
    if !profile.cities.is_empty() {
        let _ = writeln!(out, "Located in: {}", profile.cities.join(", "));
    }

    heading(out, "Funds Recieved Till Now");
    history(out, &profile.history);
    heading(out, "Year Wise Received Funds");
    yearly(out, &profile.yearly);

    if !profile.investors.is_empty() {
        heading(out, "Investors");
        let _ = writeln!(out, "{}", profile.investors.join(", "));
    }
}

fn write_investor(out: &mut String, profile: &InvestorProfile) {
    heading(out, &profile.name);
    if profile.is_empty() {
        out.push_str("No funding records\n");
        return;
    }

    heading(out, "Recent Investments");
    history(out, &profile.recent);
    heading(out, "Biggest Investments in Startup");
    ranked(out, &profile.top_startups);
    heading(out, "Biggest Investments in each sector");
    ranked(out, &profile.industries);
    heading(out, "Biggest Investment in Each stage");
    ranked(out, &profile.stages);
    heading(out, "City Wise Investment");
    ranked(out, &profile.cities);
    heading(out, "YearWise Investment");
    yearly(out, &profile.yearly);

    heading(out, "Similar Investors");
    if profile.similar.is_empty() {
        out.push_str("(none)\n");
    } else {
        let _ = writeln!(out, "{}", profile.similar.join(", "));
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {} ==", title);
}

fn table<T: Tabled>(out: &mut String, rows: Vec<T>) {
    if rows.is_empty() {
        out.push_str("(no data)\n");
        return;
    }
    let _ = writeln!(out, "{}", Table::new(rows));
}

fn ranked(out: &mut String, values: &[RankedValue]) {
    let rows: Vec<RankedRow> = values
        .iter()
        .enumerate()
        .map(|(i, v)| RankedRow {
            rank: i + 1,
            name: v.label.clone(),
            value: format_amount(v.value),
        })
        .collect();
    table(out, rows);
}

fn yearly(out: &mut String, values: &[YearValue]) {
    let rows: Vec<YearRow> = values
        .iter()
        .map(|v| YearRow {
            year: v.year,
            value: format_amount(v.value),
        })
        .collect();
    table(out, rows);
}

fn history(out: &mut String, rows: &[FundingRow]) {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let rows: Vec<HistoryRow> = rows
        .iter()
        .map(|r| HistoryRow {
            date: dash(&r.date),
            startup: dash(&r.startup),
            investors: dash(&r.investors),
            round: dash(&r.round),
            amount: r.amount.map(format_amount).unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    table(out, rows);
}

fn heatmap(out: &mut String, grid: &HeatmapGrid) {
    if grid.years.is_empty() {
        out.push_str("(no data)\n");
        return;
    }
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.years.len() + 1);
    let mut header = vec!["Year".to_string()];
    header.extend(grid.months.iter().map(|m| ChartPlotter::month_name(*m).to_string()));
    rows.push(header);
    for (year, cells) in grid.years.iter().zip(&grid.cells) {
        let mut row = vec![year.to_string()];
        row.extend(cells.iter().map(|v| format!("{:.1}", v)));
        rows.push(row);
    }
    let _ = writeln!(out, "{}", Table::from_iter(rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::query::fixtures;
    use crate::views::{render, InvestorTrail, Navigation, OverviewParams};

    #[test]
    fn overview_text_has_every_section() {
        let table = fixtures::market();
        let view = render(&table, &Navigation::Overview(OverviewParams::default()), &AppConfig::default()).unwrap();
        let text = render_text(&view);
        for section in ["Overall Analysis", "MoM chart (Money)", "Top Sub-verticals", "Top Investors", "Funding HeatMap"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("Total Startups investment:   28 Cr"));
        assert!(text.contains("Alpha"));
    }

    #[test]
    fn unknown_startup_prints_placeholder() {
        let table = fixtures::market();
        let view = render(&table, &Navigation::Startup("Nope".into()), &AppConfig::default()).unwrap();
        assert!(render_text(&view).contains("No funding records"));
    }

    #[test]
    fn startup_text_reports_unknown_work() {
        let table = fixtures::market();
        let view = render(&table, &Navigation::Startup("Bar".into()), &AppConfig::default()).unwrap();
        assert!(render_text(&view).contains("Work is not known"));
    }

    #[test]
    fn investor_json_is_tagged() {
        let table = fixtures::market();
        let trail = InvestorTrail::new("Alpha").drill(0, "Beta");
        let view = render(&table, &Navigation::Investor(trail), &AppConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&view).unwrap()).unwrap();
        assert_eq!(json["view"], "investor");
        assert_eq!(json["trail"][1]["name"], "Beta");
        assert_eq!(json["trail"][0]["similar"][0], "Alpha Ventures");
    }
}
