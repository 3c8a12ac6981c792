pub mod envelope_chart;
pub mod records_table;
pub mod settings_panel;
