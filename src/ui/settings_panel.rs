use envelope_plot::geometry::ScaleMode;
use envelope_plot::state::palette::{color32, PaletteKind};
use envelope_plot::state::plot_settings::PlotSettings;
use envelope_plot::state::theme::Theme;

fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new(title).strong().size(15.0));
    ui.add_space(2.0);
}

fn palette_swatch(ui: &mut egui::Ui, kind: PaletteKind) {
    let colors = kind.colors();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(100.0, 12.0), egui::Sense::hover());
    let w = rect.width() / colors.len() as f32;
    for (i, c) in colors.iter().enumerate() {
        let x0 = rect.left() + i as f32 * w;
        let r = egui::Rect::from_min_max(egui::pos2(x0, rect.top()), egui::pos2(x0 + w, rect.bottom()));
        ui.painter().rect_filled(r, 0.0, color32(*c));
    }
}

/// Chart options. Edits apply directly to `settings`.
pub fn show_settings_panel(ui: &mut egui::Ui, settings: &mut PlotSettings) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        section(ui, "Chart");
        egui::Grid::new("chart_labels").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
            ui.label("Title");
            ui.text_edit_singleline(&mut settings.title);
            ui.end_row();

            ui.label("Y label");
            ui.text_edit_singleline(&mut settings.y_label);
            ui.end_row();

            ui.label("Y unit");
            ui.text_edit_singleline(&mut settings.y_unit);
            ui.end_row();
        });

        section(ui, "Scale");
        let mut log_y = settings.scale.is_log();
        if ui
            .checkbox(&mut log_y, "Logarithmic performance axis")
            .on_hover_text("Log mode needs positive performance values")
            .changed()
        {
            settings.scale = ScaleMode::from_log_flag(log_y);
        }

        section(ui, "Appearance");
        egui::ComboBox::from_label("Palette")
            .selected_text(settings.palette.label())
            .show_ui(ui, |ui| {
                for kind in PaletteKind::ALL {
                    ui.selectable_value(&mut settings.palette, kind, kind.label());
                }
            });
        palette_swatch(ui, settings.palette);

        ui.horizontal(|ui| {
            ui.label("Theme");
            ui.selectable_value(&mut settings.theme, Theme::Light, Theme::Light.label());
            ui.selectable_value(&mut settings.theme, Theme::Dark, Theme::Dark.label());
        });
        ui.add(egui::Slider::new(&mut settings.fill_opacity, 0.0..=1.0).text("Fill opacity"));
        ui.checkbox(&mut settings.show_labels, "Device labels");

        section(ui, "Envelope");
        ui.add(egui::Slider::new(&mut settings.envelope.samples, 8..=400).text("Outline points"));
        ui.add_enabled(
            !settings.scale.is_log(),
            egui::Slider::new(&mut settings.envelope.linear_minor_ratio, 0.05..=1.0).text("Linear thickness"),
        )
        .on_hover_text("Minor/major axis ratio used on a linear axis");
    });
}
