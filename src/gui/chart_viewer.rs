//! Chart Viewer Widget
//! Central scrollable panel that draws the current report page.

use crate::charts::{format_amount, ChartPlotter};
use crate::query::{Metric, RankedValue};
use crate::views::{FundingRow, InvestorProfile, OverviewParams, OverviewReport, ReportView, StartupProfile};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const SECTION_SPACING: f32 = 18.0;
const SIMILAR_PLACEHOLDER: &str = "Choose Similar Investor";

/// Scrollable report display.
#[derive(Default)]
pub struct ChartViewer {
    report: Option<ReportView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.report = None;
    }

    pub fn set_report(&mut self, report: ReportView) {
        self.report = Some(report);
    }

    /// Draw the current report. Returns what the user asked for, if anything.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ViewerAction {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return ViewerAction::None;
        };

        let mut action = ViewerAction::None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                action = match report {
                    ReportView::Overview(overview) => Self::draw_overview(ui, overview),
                    ReportView::Startup(profile) => {
                        Self::draw_startup(ui, profile);
                        ViewerAction::None
                    }
                    ReportView::Investor { trail } => Self::draw_investor_trail(ui, trail),
                };
            });
        action
    }

    fn draw_overview(ui: &mut egui::Ui, report: &OverviewReport) -> ViewerAction {
        let mut params = report.params;
        ui.heading("Overall Analysis");
        ui.add_space(10.0);

        ui.columns(4, |cols| {
            Self::metric_card(&mut cols[0], "Total Startups investment", format!("{} Cr", format_amount(report.total_invested)));
            Self::metric_card(
                &mut cols[1],
                "Avg Startups investment",
                report
                    .average_per_startup
                    .map(|v| format!("{} Cr", v.round()))
                    .unwrap_or_else(|| "-".to_string()),
            );
            Self::metric_card(&mut cols[2], "Total Startups till invested", report.startup_count.to_string());
            Self::metric_card(
                &mut cols[3],
                "Max Startup investment",
                report
                    .max_startup_total
                    .map(|v| format!("{} Cr", format_amount(v)))
                    .unwrap_or_else(|| "-".to_string()),
            );
        });

        Self::section(ui, "MoM chart");
        Self::metric_toggle(ui, "Choose Overall Investment on the basis of", &mut params.series_metric);
        ChartPlotter::draw_monthly_series(ui, "overview_mom", &report.monthly, Self::metric_axis(params.series_metric));

        Self::section(ui, "Sector Analysis");
        Self::metric_toggle(ui, "Sector Analysis on basis of", &mut params.sector_metric);
        ChartPlotter::draw_share_chart(ui, &report.industries);

        Self::section(ui, "Type of funding");
        ChartPlotter::draw_share_chart(ui, &report.rounds);

        Self::section(ui, "City Wise Funding");
        ChartPlotter::draw_share_chart(ui, &report.cities);

        Self::section(ui, "Top Sub-verticals");
        ChartPlotter::draw_ranked_bars(ui, "overview_subverticals", &report.subverticals, "Rs in crore");

        Self::section(ui, "Top Startups Year-Wise");
        let leaders: Vec<RankedValue> = report
            .year_leaders
            .iter()
            .map(|(year, leader)| RankedValue {
                label: format!("{}  {}", year, leader.startup),
                value: leader.amount,
            })
            .collect();
        ChartPlotter::draw_ranked_table(ui, "year_leaders", ["Year / Startup", "Rs in crore"], &leaders);

        Self::section(ui, "Top Startups Overall");
        ChartPlotter::draw_ranked_table(ui, "top_startups", ["Startup", "Rs in crore"], &report.top_startups);

        Self::section(ui, "Top Investors");
        ChartPlotter::draw_ranked_table(
            ui,
            "top_investors",
            ["Investor Name", "Total Amount Invested"],
            &report.top_investors,
        );

        Self::section(ui, "Funding HeatMap (Year vs. Month, Rs in crore)");
        ChartPlotter::draw_heatmap(ui, &report.heatmap);
        ui.add_space(SECTION_SPACING);

        if params != report.params {
            ViewerAction::UpdateOverview(params)
        } else {
            ViewerAction::None
        }
    }

    fn draw_startup(ui: &mut egui::Ui, profile: &StartupProfile) {
        ui.heading(&profile.name);
        if profile.is_empty() {
            ChartPlotter::draw_empty(ui);
            return;
        }

        ui.label(RichText::new(profile.industry_label()).size(16.0).strong());
        ui.label(RichText::new(profile.work_label()).size(16.0).strong());

        if !profile.cities.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Located in:").strong());
            for (i, city) in profile.cities.iter().enumerate() {
                ui.label(format!("{}. {}", i + 1, city));
            }
        }

        Self::section(ui, "Funds Recieved Till Now");
        Self::draw_history(ui, "startup_history", &profile.history, false);

        Self::section(ui, "Year Wise Received Funds");
        ChartPlotter::draw_year_bars(ui, "startup_yearly", &profile.yearly);

        if !profile.investors.is_empty() {
            Self::section(ui, "Investors");
            ui.horizontal_wrapped(|ui| {
                for (i, investor) in profile.investors.iter().enumerate() {
                    ui.label(format!("{}. {}", i + 1, investor));
                    ui.add_space(12.0);
                }
            });
        }
        ui.add_space(SECTION_SPACING);
    }

    /// One investor block per trail entry; each offers a drill-down into its similar investors.
    fn draw_investor_trail(ui: &mut egui::Ui, trail: &[InvestorProfile]) -> ViewerAction {
        let mut action = ViewerAction::None;

        for (depth, profile) in trail.iter().enumerate() {
            if depth > 0 {
                ui.add_space(SECTION_SPACING);
                ui.separator();
            }
            ui.push_id(("investor", depth), |ui| {
                Self::draw_investor(ui, profile, depth);

                Self::section(ui, "Similar Investors");
                if profile.similar.is_empty() {
                    ChartPlotter::draw_empty(ui);
                    return;
                }

                let current = trail
                    .get(depth + 1)
                    .map(|next| next.name.as_str())
                    .unwrap_or(SIMILAR_PLACEHOLDER);
                ComboBox::from_id_salt("similar")
                    .width(260.0)
                    .height(320.0)
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for name in &profile.similar {
                            if ui.selectable_label(name == current, name).clicked() && name != current {
                                action = ViewerAction::DrillInvestor {
                                    depth,
                                    name: name.clone(),
                                };
                            }
                        }
                    });
            });
        }
        action
    }

    fn draw_investor(ui: &mut egui::Ui, profile: &InvestorProfile, depth: usize) {
        ui.heading(&profile.name);
        if profile.is_empty() {
            ChartPlotter::draw_empty(ui);
            return;
        }

        Self::section(ui, "Recent Investments");
        Self::draw_history(ui, &format!("recent_{depth}"), &profile.recent, true);

        ui.add_space(SECTION_SPACING);
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Biggest Investments in Startup").size(15.0).strong());
            ChartPlotter::draw_ranked_bars(&mut cols[0], &format!("inv_startups_{depth}"), &profile.top_startups, "Rs in crore");
            cols[1].label(RichText::new("Biggest Investments in each sector").size(15.0).strong());
            ChartPlotter::draw_share_chart(&mut cols[1], &profile.industries);
        });

        ui.add_space(SECTION_SPACING);
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Biggest Investment in Each stage").size(15.0).strong());
            ChartPlotter::draw_share_chart(&mut cols[0], &profile.stages);
            cols[1].label(RichText::new("City Wise Investment").size(15.0).strong());
            ChartPlotter::draw_share_chart(&mut cols[1], &profile.cities);
        });

        Self::section(ui, "YearWise Investment");
        ChartPlotter::draw_year_trend(ui, &format!("inv_yearly_{depth}"), &profile.yearly);
    }

    fn draw_history(ui: &mut egui::Ui, id: &str, rows: &[FundingRow], with_startup: bool) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([14.0, 4.0])
                    .show(ui, |ui| {
                        let mut headers = vec!["Date"];
                        if with_startup {
                            headers.extend(["Startup", "Industry"]);
                        } else {
                            headers.push("Investors");
                        }
                        headers.extend(["Type", "Rs in crore"]);
                        for header in headers {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
                        for row in rows {
                            ui.label(text(&row.date));
                            if with_startup {
                                ui.label(text(&row.startup));
                                ui.label(text(&row.industry));
                            } else {
                                ui.label(text(&row.investors));
                            }
                            ui.label(text(&row.round));
                            ui.label(row.amount.map(format_amount).unwrap_or_else(|| "-".to_string()));
                            ui.end_row();
                        }
                    });
            });
    }

    fn metric_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(22.0).strong());
            });
    }

    fn metric_toggle(ui: &mut egui::Ui, label: &str, metric: &mut Metric) {
        ui.horizontal(|ui| {
            ui.label(label);
            for option in [Metric::Money, Metric::Count] {
                ui.radio_value(metric, option, option.label());
            }
        });
    }

    fn metric_axis(metric: Metric) -> &'static str {
        match metric {
            Metric::Money => "Total Investment (Rs in crore)",
            Metric::Count => "Number of Deals",
        }
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }
}

/// Actions triggered inside the report panel
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    UpdateOverview(OverviewParams),
    /// A similar investor was chosen in the block at `depth`.
    DrillInvestor { depth: usize, name: String },
}
