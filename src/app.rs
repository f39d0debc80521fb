use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::data::datasets::{self, DatasetKind, LoadedFile, LoadedPayload};
use crate::data::loader::DataError;
use crate::data::table::DataTable;
use crate::state::app_state::{AppState, ChartKind, VERSION};
use crate::ui::heatmap::HeatmapView;
use crate::ui::horizon::HorizonView;
use crate::ui::matrix::MatrixView;
use crate::ui::parallel::ParallelView;
use crate::ui::ranking::RankingView;
use crate::ui::scatter::ScatterView;
use crate::ui::stream::StreamView;
use crate::ui::table_view::TableView;

/// A file parse running on a background thread.
struct PendingLoad {
    kind: DatasetKind,
    result: Arc<Mutex<Option<Result<LoadedFile, DataError>>>>,
}

pub struct VizForgeApp {
    state: AppState,
    scatter: ScatterView,
    parallel: ParallelView,
    heatmap: HeatmapView,
    matrix: MatrixView,
    ranking: RankingView,
    stream: StreamView,
    horizon: HorizonView,
    table_view: TableView,
    /// Raw table of the most recent load, one slot per dataset kind.
    tables: Vec<(DatasetKind, String, DataTable)>,
    status: Option<String>,
    error_message: Option<String>,
    pending_load: Option<PendingLoad>,
    /// Dataset kinds we already tried to auto-load a bundled sample for.
    auto_load_tried: Vec<DatasetKind>,
}

impl VizForgeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();

        let mut style = (*cc.egui_ctx.style()).clone();
        style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
        style.visuals.widgets.hovered.bg_stroke =
            egui::Stroke::new(1.5, egui::Color32::from_gray(160));
        cc.egui_ctx.set_style(style);
        cc.egui_ctx.set_visuals(state.theme.visuals());

        Self {
            state,
            scatter: ScatterView::new(),
            parallel: ParallelView::new(),
            heatmap: HeatmapView::new(),
            matrix: MatrixView::new(),
            ranking: RankingView::new(),
            stream: StreamView::new(),
            horizon: HorizonView::new(),
            table_view: TableView::new(),
            tables: Vec::new(),
            status: None,
            error_message: None,
            pending_load: None,
            auto_load_tried: Vec::new(),
        }
    }

    fn open_file_dialog(&mut self) {
        let kind = self.state.active_chart.dataset();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(kind, &path);
        }
    }

    /// Parse a data file on a background thread so the UI stays
    /// responsive on the larger datasets.
    fn load_file(&mut self, kind: DatasetKind, path: &Path) {
        let path_buf = path.to_path_buf();
        let result: Arc<Mutex<Option<Result<LoadedFile, DataError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        tracing::info!("loading {} as {}", path_buf.display(), kind.label());
        std::thread::spawn(move || {
            let loaded = datasets::load_file(kind, &path_buf);
            *result_clone.lock().unwrap() = Some(loaded);
        });

        self.pending_load = Some(PendingLoad { kind, result });
    }

    fn apply_loaded(&mut self, file: LoadedFile) {
        let (kept, skipped) = file.payload.counts();
        let kind = match &file.payload {
            LoadedPayload::Iris(_) => DatasetKind::Iris,
            LoadedPayload::Abalone(_) => DatasetKind::Abalone,
            LoadedPayload::Rankings(_) => DatasetKind::Rankings,
            LoadedPayload::Sales(_) => DatasetKind::Sales,
            LoadedPayload::Pollution(_) => DatasetKind::Pollution,
        };

        match file.payload {
            // the three iris charts share one dataset
            LoadedPayload::Iris(data) => {
                self.scatter.set_dataset(data.clone());
                self.parallel.set_dataset(data.clone());
                self.matrix.set_dataset(data);
            }
            LoadedPayload::Abalone(data) => self.heatmap.set_dataset(data),
            LoadedPayload::Rankings(data) => self.ranking.set_dataset(data),
            LoadedPayload::Sales(data) => self.stream.set_dataset(data),
            LoadedPayload::Pollution(data) => self.horizon.set_dataset(data),
        }

        self.tables.retain(|(k, _, _)| *k != kind);
        self.tables.push((kind, file.name.clone(), file.table));
        self.table_view.reset();

        tracing::info!("loaded {}: {kept} rows kept, {skipped} skipped", file.name);
        self.status = Some(if skipped > 0 {
            format!("{}: {kept} rows ({skipped} skipped)", file.name)
        } else {
            format!("{}: {kept} rows", file.name)
        });
        self.error_message = None;
    }

    fn active_has_data(&self) -> bool {
        match self.state.active_chart {
            ChartKind::Scatter => self.scatter.has_data(),
            ChartKind::Parallel => self.parallel.has_data(),
            ChartKind::Heatmap => self.heatmap.has_data(),
            ChartKind::Matrix => self.matrix.has_data(),
            ChartKind::Ranking => self.ranking.has_data(),
            ChartKind::Stream => self.stream.has_data(),
            ChartKind::Horizon => self.horizon.has_data(),
        }
    }

    /// Load the bundled sample for the active chart's dataset the first
    /// time that chart is opened empty.
    fn maybe_auto_load(&mut self) {
        if self.pending_load.is_some() || self.active_has_data() {
            return;
        }
        let kind = self.state.active_chart.dataset();
        if self.auto_load_tried.contains(&kind) {
            return;
        }
        self.auto_load_tried.push(kind);

        let sample = Path::new(kind.sample_path());
        if sample.exists() {
            self.load_file(kind, sample);
        } else {
            tracing::debug!("no bundled sample at {}", sample.display());
        }
    }
}

impl eframe::App for VizForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.theme.visuals());

        // Dropped CSVs load into the active chart's dataset.
        let mut dropped: Vec<PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    let ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_lowercase())
                        .unwrap_or_default();
                    if ext == "csv" {
                        dropped.push(path.clone());
                    }
                }
            }
        });
        for path in dropped {
            let kind = self.state.active_chart.dataset();
            self.load_file(kind, &path);
        }

        self.maybe_auto_load();

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(12, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("VizForge");
                    ui.separator();

                    for kind in ChartKind::ALL {
                        let selected = self.state.active_chart == kind;
                        if ui.selectable_label(selected, kind.label()).clicked() {
                            self.state.active_chart = kind;
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(format!("v{VERSION}"));
                        ui.separator();

                        let theme_label = match self.state.theme {
                            crate::state::theme::Theme::Dark => "Light Mode",
                            crate::state::theme::Theme::Light => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            self.state.theme = self.state.theme.toggle();
                        }

                        if ui
                            .selectable_label(self.state.show_table, "Table")
                            .clicked()
                        {
                            self.state.show_table = !self.state.show_table;
                        }

                        if ui.button("Open CSV...").clicked() {
                            self.open_file_dialog();
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let dataset = self.state.active_chart.dataset();
                    ui.label(egui::RichText::new(dataset.label()).weak());

                    if let Some(status) = &self.status {
                        ui.separator();
                        ui.label(egui::RichText::new(status).weak());
                    }

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.show_table {
                let kind = self.state.active_chart.dataset();
                match self.tables.iter().find(|(k, _, _)| *k == kind) {
                    Some((_, name, table)) => {
                        ui.label(egui::RichText::new(name).strong());
                        self.table_view.ui(ui, table);
                    }
                    None => {
                        ui.label("No data loaded.");
                    }
                }
                return;
            }

            let theme = self.state.theme;
            match self.state.active_chart {
                ChartKind::Scatter => self.scatter.ui(ui),
                ChartKind::Parallel => self.parallel.ui(ui, theme),
                ChartKind::Heatmap => self.heatmap.ui(ui, theme),
                ChartKind::Matrix => self.matrix.ui(ui, theme),
                ChartKind::Ranking => self.ranking.ui(ui),
                ChartKind::Stream => self.stream.ui(ui),
                ChartKind::Horizon => self.horizon.ui(ui),
            }
        });

        // Poll the background load.
        if let Some(ref pending) = self.pending_load {
            let mut lock = pending.result.lock().unwrap();
            if let Some(result) = lock.take() {
                let kind = pending.kind;
                drop(lock);
                self.pending_load = None;
                match result {
                    Ok(file) => self.apply_loaded(file),
                    Err(e) => {
                        tracing::error!("failed to load {} data: {e}", kind.label());
                        self.error_message = Some(format!("Failed to load file: {e}"));
                    }
                }
            }
        }

        if self.pending_load.is_some() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading file...");
                    });
                });
            ctx.request_repaint();
        }
    }
}
