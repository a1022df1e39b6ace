use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature scale the weather API is queried in.
///
/// Serialized as the OpenWeather `units` parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TempScale {
    #[default]
    Imperial,
    Metric,
}

impl TempScale {
    /// The other scale.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Imperial => Self::Metric,
            Self::Metric => Self::Imperial,
        }
    }

    /// Value of the `units` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imperial => "imperial",
            Self::Metric => "metric",
        }
    }

    /// Degree symbol shown next to temperatures and on the scale button
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Imperial => "\u{2109}",
            Self::Metric => "\u{2103}",
        }
    }
}

impl std::fmt::Display for TempScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TempScale {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" => Ok(Self::Imperial),
            "metric" => Ok(Self::Metric),
            other => Err(WeatherError::Config(format!(
                "unknown temperature scale '{}', expected 'imperial' or 'metric'",
                other
            ))),
        }
    }
}

/// Raw `data/2.5/weather` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherData {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wind {
    pub deg: f64,
    pub speed: f64,
}

/// A single point-in-time reading for one city. Never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// City display name as returned by the API
    pub name: String,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub conditions: Vec<Condition>,
    pub wind: Wind,
    /// Scale the temperatures are expressed in
    pub scale: TempScale,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn from_api(data: OpenWeatherData, scale: TempScale) -> Self {
        Self {
            name: data.name,
            temp: data.main.temp,
            feels_like: data.main.feels_like,
            temp_min: data.main.temp_min,
            temp_max: data.main.temp_max,
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            conditions: data.weather,
            wind: data.wind,
            scale,
            fetched_at: Utc::now(),
        }
    }

    pub fn rounded_temp(&self) -> i64 {
        round_half_up(self.temp)
    }

    pub fn rounded_feels_like(&self) -> i64 {
        round_half_up(self.feels_like)
    }
}

/// Rounds halves towards positive infinity, so -2.5 displays as -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Shown on a card whenever a reading cannot be displayed.
pub const FETCH_FAILED_MESSAGE: &str = "Error: could not retrieve weather data for this city.";

/// Weather client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The API answered with a non-success status (unknown city, bad key, rate limit...)
    #[error("Weather request failed with status {status}")]
    Fetch { status: u16 },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Decode(String),
    #[error("Invalid weather configuration: {0}")]
    Config(String),
}

impl WeatherError {
    /// The single message every card shows when it cannot display a reading.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Weather is not configured. Check the API key in settings.",
            Self::Fetch { .. } | Self::Network(_) | Self::Decode(_) => FETCH_FAILED_MESSAGE,
        }
    }

    /// True when the API rejected the city name.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch { status: 404 })
    }
}
