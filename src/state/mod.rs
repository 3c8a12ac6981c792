pub mod app_state;
pub mod device_record;
pub mod palette;
pub mod plot_settings;
pub mod theme;
