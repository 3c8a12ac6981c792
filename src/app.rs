use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use envelope_plot::data::{loader, records};
use envelope_plot::error::LoadError;
use envelope_plot::export::png::Snapshot;
use envelope_plot::export::{filename, html, table};
use envelope_plot::geometry::{EnvelopeParams, ScaleMode};
use envelope_plot::render::figure::Figure;
use envelope_plot::state::app_state::{AppState, VERSION};
use envelope_plot::state::device_record::{sample_records, DeviceRecord, REQUIRED_COLUMNS};
use envelope_plot::state::palette::PaletteKind;
use envelope_plot::state::theme::Theme;

use crate::ui::envelope_chart::{self, ChartView};
use crate::ui::{records_table, settings_panel};

const DATA_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];
const PROJECT_EXTENSIONS: [&str; 2] = ["envplot", "json"];

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// Pending async file load result.
struct PendingLoad {
    path: PathBuf,
    result: Arc<Mutex<Option<Result<Vec<DeviceRecord>, LoadError>>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainView {
    Chart,
    Table,
}

/// Inputs the cached figure was built from.
type FigureKey = (u64, ScaleMode, PaletteKind, EnvelopeParams);

/// The main Envelope Plot application.
pub struct EnvelopePlotApp {
    state: AppState,
    figure: Figure,
    figure_key: Option<FigureKey>,
    chart: ChartView,
    view: MainView,
    show_settings: bool,
    show_about: bool,
    /// An error message shown in the footer until dismissed.
    error_message: Option<String>,
    pending_load: Option<PendingLoad>,
    pending_screenshot: Option<PendingScreenshot>,
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

impl EnvelopePlotApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);
        ctx.set_visuals(state.settings.theme.visuals());

        let figure = Figure::build(&[], state.settings.scale, state.settings.palette.colors());

        Self {
            state,
            figure,
            figure_key: None,
            chart: ChartView {
                fit_requested: true,
                ..ChartView::default()
            },
            view: MainView::Chart,
            show_settings: true,
            show_about: false,
            error_message: None,
            pending_load: None,
            pending_screenshot: None,
        }
    }

    /// Rebuild the figure when the records or geometry options changed.
    fn refresh_figure(&mut self) {
        let settings = &self.state.settings;
        let key = (self.state.revision, settings.scale, settings.palette, settings.envelope);
        if self.figure_key.as_ref() == Some(&key) {
            return;
        }
        let scale_changed = self.figure_key.map(|k| k.1) != Some(settings.scale);
        self.figure = Figure::build_with(&self.state.records, settings.scale, settings.palette.colors(), &settings.envelope);
        self.figure_key = Some(key);
        if scale_changed {
            self.chart.fit_requested = true;
        }
    }

    fn show_error(&mut self, message: String) {
        tracing::error!("{message}");
        self.error_message = Some(message);
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &DATA_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a data file on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let result: Arc<Mutex<Option<Result<Vec<DeviceRecord>, LoadError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf).and_then(|data| records::records_from_table(&data));
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad {
            path: path.to_path_buf(),
            result,
        });
    }

    fn poll_pending_load(&mut self) {
        let finished = match &self.pending_load {
            Some(pending) => match pending.result.lock() {
                Ok(mut slot) => slot.take(),
                Err(poisoned) => poisoned.into_inner().take(),
            },
            None => return,
        };
        let Some(result) = finished else {
            return;
        };
        let Some(pending) = self.pending_load.take() else {
            return;
        };
        let name = file_label(&pending.path);

        match result {
            Ok(records) if records.is_empty() => {
                self.show_error(format!("{name} contains no devices"));
            }
            Ok(records) => {
                tracing::info!(file = %name, devices = records.len(), "loaded devices");
                self.state.replace_records(records, Some(name));
                self.chart.fit_requested = true;
                self.error_message = None;
            }
            Err(e @ LoadError::MissingColumns(_)) => {
                self.show_error(format!(
                    "Failed to load {name}: {e}. Expected columns: {}",
                    REQUIRED_COLUMNS.join(", ")
                ));
            }
            Err(e) => {
                self.show_error(format!("Failed to load {name}: {e}"));
            }
        }
    }

    fn save_project(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(filename::export_name_now(&self.state.settings.title, "envplot"))
            .add_filter("Envelope Plot Project", &PROJECT_EXTENSIONS)
            .save_file()
        else {
            return;
        };
        let result = self
            .state
            .to_json()
            .map_err(|e| format!("Failed to serialize project: {e}"))
            .and_then(|json| std::fs::write(&path, json).map_err(|e| format!("Failed to save project: {e}")));
        match result {
            Ok(()) => tracing::info!("Project saved to {:?}", path),
            Err(msg) => self.show_error(msg),
        }
    }

    fn load_project_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Envelope Plot Project", &PROJECT_EXTENSIONS)
            .pick_file()
        {
            self.load_project(&path);
        }
    }

    fn load_project(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(json) => match AppState::from_json(&json) {
                Ok(loaded_state) => {
                    self.state = loaded_state;
                    self.figure_key = None;
                    self.chart.fit_requested = true;
                    tracing::info!("Project loaded from {:?}", path);
                }
                Err(e) => self.show_error(format!("Failed to parse project: {e}")),
            },
            Err(e) => self.show_error(format!("Failed to read file: {e}")),
        }
    }

    fn export_html(&mut self) {
        if self.figure.is_empty() {
            self.show_error("Nothing to export: no device could be drawn".to_string());
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(filename::export_name_now(&self.state.settings.title, "html"))
            .add_filter("HTML Page", &["html"])
            .save_file()
        else {
            return;
        };
        if let Err(e) = html::save_html(&path, &self.figure, &self.state.settings) {
            self.show_error(format!("Failed to export HTML: {e}"));
        }
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(filename::export_name_now(&self.state.settings.title, "csv"))
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };
        if let Err(e) = table::save_records_csv(&path, &self.state.records) {
            self.show_error(format!("Failed to export CSV: {e}"));
        }
    }

    fn request_screenshot(&mut self, ctx: &egui::Context, action: PendingScreenshot) {
        self.view = MainView::Chart;
        self.pending_screenshot = Some(action);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    /// Handle a screenshot requested during an earlier frame.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() {
            return;
        }
        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });
        let Some(color_image) = screenshot_image else {
            return;
        };
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        // Crop to just the chart
        let snapshot = Snapshot::from_color_image(&color_image, self.chart.last_rect, ctx.pixels_per_point());

        match action {
            PendingScreenshot::SaveFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(filename::export_name_now(&self.state.settings.title, "png"))
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    if let Err(e) = snapshot.save_png(&path) {
                        self.show_error(format!("Failed to save image: {e}"));
                    }
                }
            }
            PendingScreenshot::Clipboard => {
                if let Err(e) = snapshot.copy_to_clipboard() {
                    self.show_error(format!("Failed to copy to clipboard: {e}"));
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let mut dropped_paths: Vec<PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    dropped_paths.push(path.clone());
                }
            }
        });

        // Only the last supported file counts.
        for path in dropped_paths {
            let ext = extension_of(&path);
            if DATA_EXTENSIONS.contains(&ext.as_str()) {
                self.load_file(&path);
            } else if PROJECT_EXTENSIONS.contains(&ext.as_str()) {
                self.load_project(&path);
            } else {
                self.show_error(format!("Unsupported file: {}", file_label(&path)));
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let mut open_data = false;
        let mut save_project = false;
        let mut load_project = false;
        let mut export_html = false;
        let mut export_csv = false;
        let mut screenshot: Option<PendingScreenshot> = None;

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let heading_response = ui.heading("Envelope Plot");
                    heading_response.context_menu(|ui| {
                        if ui.button("About Envelope Plot").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                        if ui.button("Reset to Sample Data").clicked() {
                            self.state.replace_records(sample_records(), None);
                            self.chart.fit_requested = true;
                            ui.close_menu();
                        }
                    });

                    ui.separator();

                    if ui.button("Open Data").on_hover_text("Load a CSV or Excel file").clicked() {
                        open_data = true;
                    }
                    if ui.button("Save Project").clicked() {
                        save_project = true;
                    }
                    if ui.button("Load Project").clicked() {
                        load_project = true;
                    }

                    ui.separator();

                    ui.selectable_value(&mut self.view, MainView::Chart, "Chart");
                    ui.selectable_value(&mut self.view, MainView::Table, "Table");
                    if ui.button("Fit View").on_hover_text("Fit the chart to all envelopes").clicked() {
                        self.view = MainView::Chart;
                        self.chart.fit_requested = true;
                    }

                    ui.menu_button("Export", |ui| {
                        ui.set_min_width(180.0);
                        if ui.button("Interactive HTML").clicked() {
                            export_html = true;
                            ui.close_menu();
                        }
                        if ui.button("Device Table (CSV)").clicked() {
                            export_csv = true;
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button("Save as PNG").clicked() {
                            screenshot = Some(PendingScreenshot::SaveFile);
                            ui.close_menu();
                        }
                        if ui.button("Copy Image").clicked() {
                            screenshot = Some(PendingScreenshot::Clipboard);
                            ui.close_menu();
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let settings = &mut self.state.settings;
                        let theme_label = match settings.theme.toggle() {
                            Theme::Light => "Light Mode",
                            Theme::Dark => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            settings.theme = settings.theme.toggle();
                        }
                        ui.toggle_value(&mut self.show_settings, "Settings");
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if open_data {
            self.open_file_dialog();
        }
        if save_project {
            self.save_project();
        }
        if load_project {
            self.load_project_dialog();
        }
        if export_html {
            self.export_html();
        }
        if export_csv {
            self.export_csv();
        }
        if let Some(action) = screenshot {
            self.request_screenshot(ctx, action);
        }
    }

    fn show_footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let count = self.state.records.len();
                    let label = if count == 1 { "1 device".to_string() } else { format!("{count} devices") };
                    ui.label(egui::RichText::new(label).weak());

                    if let Some(source) = &self.state.source_name {
                        ui.separator();
                        ui.label(egui::RichText::new(source).weak());
                    }

                    if !self.figure.skipped.is_empty() {
                        ui.separator();
                        let details: Vec<String> = self.figure.skipped.iter().map(|e| e.to_string()).collect();
                        ui.colored_label(
                            egui::Color32::from_rgb(230, 160, 40),
                            format!("{} skipped", self.figure.skipped.len()),
                        )
                        .on_hover_text(details.join("\n"));
                    }

                    if let Some(anchor) = self.chart.hovered {
                        if let Some(text) = envelope_chart::describe_anchor(&self.figure, anchor, &self.state.settings) {
                            ui.separator();
                            ui.label(text);
                        }
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
    }

    fn show_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.state.settings.title)
                    .font(egui::TextStyle::Heading)
                    .frame(false)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(4.0);

            match self.view {
                MainView::Chart if self.state.records.is_empty() => {
                    ui.add_space(80.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("No devices loaded");
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(format!(
                                "Open or drag-and-drop a CSV / Excel file with columns: {}",
                                REQUIRED_COLUMNS.join(", ")
                            ))
                            .weak(),
                        );
                    });
                }
                MainView::Chart => {
                    let height = ui.available_height().max(200.0);
                    envelope_chart::show_envelope_chart(ui, &self.figure, &self.state.settings, &mut self.chart, height);
                }
                MainView::Table => {
                    let y_unit = self.state.settings.y_unit.clone();
                    records_table::show_records_table(ui, &mut self.state, &self.figure.skipped, &y_unit);
                }
            }
        });
    }
}

impl eframe::App for EnvelopePlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.settings.theme.visuals());

        self.handle_screenshot(ctx);
        self.handle_dropped_files(ctx);
        self.poll_pending_load();
        self.refresh_figure();

        self.show_header(ctx);
        self.show_footer(ctx);

        if self.show_settings {
            egui::SidePanel::left("settings_panel")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| {
                    settings_panel::show_settings_panel(ui, &mut self.state.settings);
                });
        }

        self.show_central(ctx);

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

        if self.show_about {
            egui::Window::new("About Envelope Plot")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(340.0)
                .show(ctx, |ui| {
                    ui.heading("Envelope Plot");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Power / performance envelopes for hardware devices.");
                    ui.add_space(10.0);
                    ui.label("Each device spans an ellipse between its (min power, min performance)");
                    ui.label("and (max power, max performance) corners.");
                    ui.add_space(10.0);
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
