use std::path::PathBuf;

use envelope_plot::data::{loader, records};
use envelope_plot::error::{EnvelopeError, LoadError};
use envelope_plot::export::{html, table};
use envelope_plot::geometry::{Outline, ScaleMode};
use envelope_plot::render::figure::Figure;
use envelope_plot::state::app_state::AppState;
use envelope_plot::state::palette::PaletteKind;
use envelope_plot::state::plot_settings::PlotSettings;

const DEVICES_CSV: &str = "\
Edge accelerators,,,,
Name,Pmin,Pmax,Fmin,Fmax
Jetson Nano,5,10,0.2,0.5
Jetson TX2,7.5,15,0.5,1.3
Jetson Xavier NX,10,20,14,21
Jetson AGX Orin 64GB,15,60,100,275
";

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("envelope_plot_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn load(path: &PathBuf) -> Result<Vec<envelope_plot::state::device_record::DeviceRecord>, LoadError> {
    loader::load_file(path).and_then(|data| records::records_from_table(&data))
}

#[test]
fn csv_file_to_html_page() {
    let path = temp_file("devices.csv", DEVICES_CSV);
    let devices = load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(devices.len(), 4);

    let settings = PlotSettings::default();
    let figure = Figure::build(&devices, ScaleMode::Log, settings.palette.colors());
    assert_eq!(figure.traces.len(), 4);
    assert!(figure.skipped.is_empty());
    for trace in &figure.traces {
        assert!(matches!(trace.shape.outline, Outline::Ellipse(ref pts) if pts.len() == 100));
    }

    let out = std::env::temp_dir().join(format!("envelope_plot_{}_out.html", std::process::id()));
    html::save_html(&out, &figure, &settings).unwrap();
    let page = std::fs::read_to_string(&out).unwrap();
    std::fs::remove_file(&out).ok();

    for name in ["Jetson Nano", "Jetson TX2", "Jetson Xavier NX", "Jetson AGX Orin 64GB"] {
        assert!(page.contains(name), "{name} missing from page");
    }
    assert!(page.contains("\"type\":\"log\""));
    assert!(page.contains("AI Performance (TOPS)"));
}

#[test]
fn bad_row_is_skipped_but_keeps_its_color_slot() {
    let csv = DEVICES_CSV.replace("Jetson TX2,7.5,15,0.5,1.3", "Jetson TX2,7.5,15,0,1.3");
    let path = temp_file("bad_row.csv", &csv);
    let devices = load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let palette = PaletteKind::Viridis.colors();
    let figure = Figure::build(&devices, ScaleMode::Log, palette);
    assert_eq!(figure.traces.len(), 3);
    assert_eq!(figure.skipped.len(), 1);
    assert_eq!(figure.skipped[0].index, 1);
    assert!(matches!(figure.skipped[0].source, EnvelopeError::Domain(_)));
    assert_eq!(figure.traces[2].color, palette[palette.len() - 1]);

    // The same row is fine on a linear axis.
    let linear = Figure::build(&devices, ScaleMode::Linear, palette);
    assert_eq!(linear.traces.len(), 4);
}

#[test]
fn missing_columns_are_reported_together() {
    let path = temp_file("missing.csv", "name,pmin,fmin\nA,1,2\n");
    let err = load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    match err {
        LoadError::MissingColumns(cols) => assert_eq!(cols, vec!["fmax".to_string(), "pmax".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let path = temp_file("devices.txt", DEVICES_CSV);
    let err = load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "txt"));
}

#[test]
fn exported_table_and_project_reload() {
    let path = temp_file("roundtrip_src.csv", DEVICES_CSV);
    let devices = load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let exported = std::env::temp_dir().join(format!("envelope_plot_{}_export.csv", std::process::id()));
    table::save_records_csv(&exported, &devices).unwrap();
    let reloaded = load(&exported).unwrap();
    std::fs::remove_file(&exported).ok();
    assert_eq!(reloaded, devices);

    let mut state = AppState::new();
    state.replace_records(devices.clone(), Some("devices.csv".to_string()));
    state.settings.scale = ScaleMode::Linear;
    let restored = AppState::from_json(&state.to_json().unwrap()).unwrap();
    assert_eq!(restored.records, devices);
    assert_eq!(restored.settings.scale, ScaleMode::Linear);
    assert_eq!(restored.source_name.as_deref(), Some("devices.csv"));
}
