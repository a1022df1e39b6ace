use cityweather_extension::PopupError;
use cityweather_store::StoreError;
use cityweather_weather::WeatherError;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::chrome::js_error;

/// Failures while building a page.
#[derive(Debug, Error)]
pub enum GlueError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error(transparent)]
    Popup(#[from] PopupError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl From<JsValue> for GlueError {
    fn from(value: JsValue) -> Self {
        GlueError::Dom(js_error(&value))
    }
}

impl GlueError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GlueError::Dom(_) => "Something went wrong drawing this page. Try reopening it.",
            GlueError::Popup(e) => e.user_message(),
            GlueError::Store(e) => e.user_message(),
            GlueError::Weather(e) => e.user_message(),
        }
    }
}
