//! Weather data for the city weather extension
//!
//! Provides current conditions for a named city via the OpenWeather
//! `data/2.5/weather` endpoint, in either imperial or metric units.

pub mod client;
pub mod types;

pub use client::{WeatherClient, WeatherSource, OPENWEATHER_API_BASE};
pub use types::*;
