use cityweather_weather::TempScale;
use serde::{Deserialize, Serialize};

/// The `options` slot.
///
/// Field names are the camelCase ones the original extension stored, so data
/// written by older builds still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Toggle the page overlay automatically when a page loads
    pub has_auto_overlay: bool,
    /// Empty means no home city
    pub home_city: String,
    pub temp_scale: TempScale,
}

impl Options {
    /// The home city, if one is set.
    pub fn home_city(&self) -> Option<&str> {
        if self.home_city.is_empty() {
            None
        } else {
            Some(&self.home_city)
        }
    }

    pub fn toggle_temp_scale(&mut self) {
        self.temp_scale = self.temp_scale.toggled();
    }
}
