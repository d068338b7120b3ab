//! Funding dashboard main application
//! Main window with control panel and report viewer.

use crate::config::AppConfig;
use crate::data::{DataLoader, FundingTable};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewerAction};
use crate::query::{InvestorQueries, MarketQueries};
use crate::views::{self, InvestorTrail, Mode, Navigation, OverviewParams};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    table: Option<FundingTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    navigation: Option<Navigation>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, table: Option<FundingTable>) -> Self {
        let mut app = Self {
            config,
            table: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            navigation: None,
        };
        if let Some(table) = table {
            let path = app.config.data_path.clone();
            app.install_table(table, path);
        }
        app
    }

    /// Make `table` the active dataset and show the overview.
    fn install_table(&mut self, table: FundingTable, path: PathBuf) {
        let startups = MarketQueries::startup_names(table.records()).unwrap_or_default();
        let investors = InvestorQueries::vocabulary(&table).unwrap_or_default();

        self.control_panel.dataset_path = Some(path);
        self.control_panel.set_status(format!(
            "Loaded {} records, {} startups, {} investors",
            table.len(),
            startups.len(),
            investors.len()
        ));
        self.control_panel.update_lists(startups, investors);
        self.table = Some(table);

        self.control_panel.mode = Mode::Overview;
        self.navigate(Navigation::Overview(OverviewParams::default()));
    }

    /// Handle dataset selection
    fn handle_open_dataset(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        let loader = DataLoader::new(self.config.dataset.clone());
        match loader.load(&path) {
            Ok(table) => {
                self.config.data_path = path.clone();
                self.install_table(table, path);
            }
            Err(e) => {
                error!("failed to load {}: {}", path.display(), e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Recompute the page for `navigation` and show it.
    fn navigate(&mut self, navigation: Navigation) {
        let Some(table) = &self.table else {
            self.control_panel.set_status("No data loaded");
            return;
        };

        match views::render(table, &navigation, &self.config) {
            Ok(report) => {
                info!("showing {:?}", navigation);
                self.chart_viewer.set_report(report);
                self.navigation = Some(navigation);
            }
            Err(e) => {
                error!("failed to build {:?}: {}", navigation, e);
                self.control_panel.set_status(format!("Error: {}", e));
                self.chart_viewer.clear();
                self.navigation = None;
            }
        }
    }

    fn handle_mode_changed(&mut self, mode: Mode) {
        self.navigation = None;
        self.chart_viewer.clear();
        if mode == Mode::Overview {
            self.navigate(Navigation::Overview(OverviewParams::default()));
        }
    }

    fn handle_viewer_action(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::None => {}
            ViewerAction::UpdateOverview(params) => self.navigate(Navigation::Overview(params)),
            ViewerAction::DrillInvestor { depth, name } => {
                if let Some(Navigation::Investor(trail)) = &self.navigation {
                    let next = trail.drill(depth, name);
                    self.navigate(Navigation::Investor(next));
                }
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::None => {}
                        ControlPanelAction::OpenDataset => self.handle_open_dataset(),
                        ControlPanelAction::ModeChanged(mode) => self.handle_mode_changed(mode),
                        ControlPanelAction::SelectionChanged => {
                            self.navigation = None;
                            self.chart_viewer.clear();
                        }
                        ControlPanelAction::ShowStartup(name) => self.navigate(Navigation::Startup(name)),
                        ControlPanelAction::ShowInvestor(name) => {
                            self.navigate(Navigation::Investor(InvestorTrail::new(name)))
                        }
                    }
                });
            });

        // Central panel - Report Viewer
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.chart_viewer.show(ui))
            .inner;
        self.handle_viewer_action(action);
    }
}
