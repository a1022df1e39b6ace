//! OpenWeather current-conditions client.

use tracing::instrument;

use crate::types::{OpenWeatherData, TempScale, WeatherError, WeatherSnapshot};

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
const WEATHER_PATH: &str = "/data/2.5/weather";
#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Anything that can produce a snapshot for a city. Cards depend on this
/// rather than on the HTTP client directly.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn fetch_weather(
        &self,
        city: &str,
        scale: TempScale,
    ) -> Result<WeatherSnapshot, WeatherError>;
}

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherClient {
    /// Create a client against the public OpenWeather host.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE)
    }

    /// Create a client against a different host (staging, proxies, tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(WeatherError::Config("base URL is empty".to_string()));
        }

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS));
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch current conditions for `city`, with temperatures in `scale`.
    ///
    /// Any non-success status maps to [`WeatherError::Fetch`]; the API does
    /// not let us tell an unknown city from a rejected key in a useful way.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(
        &self,
        city: &str,
        scale: TempScale,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}{}", self.base_url, WEATHER_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("units", scale.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather request for '{}' returned status {}", city, status);
            return Err(WeatherError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let data: OpenWeatherData = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Decode(format!("JSON parse error: {}", e)))?;

        Ok(WeatherSnapshot::from_api(data, scale))
    }
}

impl WeatherSource for WeatherClient {
    async fn fetch_weather(
        &self,
        city: &str,
        scale: TempScale,
    ) -> Result<WeatherSnapshot, WeatherError> {
        WeatherClient::fetch_weather(self, city, scale).await
    }
}
