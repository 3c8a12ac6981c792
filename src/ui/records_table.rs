use egui_extras::{Column, TableBuilder};

use envelope_plot::error::RecordError;
use envelope_plot::state::app_state::AppState;
use envelope_plot::state::device_record::DeviceRecord;

/// Row-level edits requested from the table, applied after it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowEdit {
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
}

fn value_cell(ui: &mut egui::Ui, value: &mut f64) -> bool {
    ui.add(egui::DragValue::new(value).speed(0.1).max_decimals(4)).changed()
}

/// Editable device table. Rows that failed geometry are flagged with the
/// reason from `skipped`.
pub fn show_records_table(ui: &mut egui::Ui, state: &mut AppState, skipped: &[RecordError], y_unit: &str) {
    if state.records.is_empty() {
        ui.label(egui::RichText::new("No devices. Load a file or add a row.").weak());
    }

    let mut edit: Option<RowEdit> = None;
    let mut changed = false;
    let row_count = state.records.len();
    let unit = if y_unit.trim().is_empty() { String::new() } else { format!(" ({})", y_unit.trim()) };

    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(30.0))
        .column(Column::initial(220.0).at_least(120.0))
        .columns(Column::auto().at_least(90.0), 4)
        .column(Column::remainder().at_least(120.0))
        .min_scrolled_height(300.0);

    table
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Min Power (W)");
            });
            header.col(|ui| {
                ui.strong("Max Power (W)");
            });
            header.col(|ui| {
                ui.strong(format!("Min Perf{unit}"));
            });
            header.col(|ui| {
                ui.strong(format!("Max Perf{unit}"));
            });
            header.col(|ui| {
                ui.strong("");
            });
        })
        .body(|body| {
            body.rows(26.0, row_count, |mut row| {
                let i = row.index();
                let error = skipped.iter().find(|e| e.index == i);
                let record: &mut DeviceRecord = &mut state.records[i];

                row.col(|ui| {
                    let text = egui::RichText::new(format!("{}", i + 1));
                    match error {
                        Some(e) => {
                            ui.label(text.color(egui::Color32::from_rgb(220, 60, 60)))
                                .on_hover_text(e.source.to_string());
                        }
                        None => {
                            ui.label(text);
                        }
                    }
                });
                row.col(|ui| {
                    changed |= ui
                        .add(egui::TextEdit::singleline(&mut record.name).desired_width(f32::INFINITY))
                        .changed();
                });
                row.col(|ui| changed |= value_cell(ui, &mut record.pmin));
                row.col(|ui| changed |= value_cell(ui, &mut record.pmax));
                row.col(|ui| changed |= value_cell(ui, &mut record.fmin));
                row.col(|ui| changed |= value_cell(ui, &mut record.fmax));
                row.col(|ui| {
                    ui.spacing_mut().item_spacing.x = 2.0;
                    if ui
                        .add_enabled(i > 0, egui::Button::new("^").small())
                        .on_hover_text("Move up")
                        .clicked()
                    {
                        edit = Some(RowEdit::MoveUp(i));
                    }
                    if ui
                        .add_enabled(i + 1 < row_count, egui::Button::new("v").small())
                        .on_hover_text("Move down")
                        .clicked()
                    {
                        edit = Some(RowEdit::MoveDown(i));
                    }
                    let remove = egui::Button::new(
                        egui::RichText::new("Remove").color(egui::Color32::from_rgb(220, 60, 60)),
                    )
                    .small();
                    if ui.add(remove).clicked() {
                        edit = Some(RowEdit::Remove(i));
                    }
                });
            });
        });

    ui.add_space(6.0);
    if ui.add(egui::Button::new("+ Add Device").min_size(egui::vec2(120.0, 26.0))).clicked() {
        state.add_record();
    }

    if changed {
        state.mark_changed();
    }
    match edit {
        Some(RowEdit::Remove(i)) => {
            state.remove_record(i);
        }
        Some(RowEdit::MoveUp(i)) => state.move_record(i, true),
        Some(RowEdit::MoveDown(i)) => state.move_record(i, false),
        None => {}
    }
}
