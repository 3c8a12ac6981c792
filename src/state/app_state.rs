use serde::{Deserialize, Serialize};

use crate::state::device_record::{sample_records, DeviceRecord};
use crate::state::plot_settings::PlotSettings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a project file holds: the records table and the chart options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub records: Vec<DeviceRecord>,
    #[serde(default)]
    pub settings: PlotSettings,
    /// File the records were loaded from, for display only.
    #[serde(default)]
    pub source_name: Option<String>,
    /// Bumped on every edit so the figure is rebuilt lazily.
    #[serde(skip)]
    pub revision: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            records: sample_records(),
            settings: PlotSettings::default(),
            source_name: None,
            revision: 0,
        }
    }

    pub fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replace the table with freshly loaded records. Settings are kept.
    pub fn replace_records(&mut self, records: Vec<DeviceRecord>, source_name: Option<String>) {
        self.records = records;
        self.source_name = source_name;
        self.mark_changed();
    }

    pub fn add_record(&mut self) -> &mut DeviceRecord {
        self.records.push(DeviceRecord::default());
        self.mark_changed();
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    pub fn remove_record(&mut self, index: usize) -> Option<DeviceRecord> {
        if index < self.records.len() {
            self.mark_changed();
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Swap a record with its neighbour. Order drives color assignment.
    pub fn move_record(&mut self, index: usize, up: bool) {
        let target = if up { index.checked_sub(1) } else { Some(index + 1) };
        if let Some(target) = target {
            if index < self.records.len() && target < self.records.len() {
                self.records.swap(index, target);
                self.mark_changed();
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: AppState = serde_json::from_str(json)?;
        state.mark_changed();
        Ok(state)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
