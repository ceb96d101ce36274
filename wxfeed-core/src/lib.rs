//! Weather feeds from Google, Yahoo! Weather, NOAA and weather.com, normalized into
//! one nested report shape.
//!
//! This crate defines:
//! - One fetch-and-normalize entry point per provider feed
//! - The blocking HTTP seam and charset handling
//! - Wind helpers for values found in reports
//! - Configuration used by `wxfeed-cli`
//!
//! ```no_run
//! let report = wxfeed_core::fetch_noaa_weather("KJFK")?;
//! println!("{}", report.text(&["weather"]).unwrap_or("unknown"));
//! # Ok::<(), wxfeed_core::WeatherError>(())
//! ```

use std::collections::BTreeMap;

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod transport;
pub mod wind;
mod xml;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use model::{City, Country, Field, Record, Report, Units, WeatherRequest};
pub use provider::{ProviderId, WeatherClient, city_codes};
pub use transport::{HttpTransport, Payload, Transport};
pub use wind::{Compass, beaufort_scale, wind_direction};

pub fn fetch_google_weather(location_id: &str, language: &str) -> Result<Report> {
    WeatherClient::default().google_weather(location_id, language)
}

pub fn fetch_google_countries(language: &str) -> Result<Vec<Country>> {
    WeatherClient::default().google_countries(language)
}

pub fn fetch_google_cities(country_code: &str, language: &str) -> Result<Vec<City>> {
    WeatherClient::default().google_cities(country_code, language)
}

pub fn fetch_yahoo_weather(location_id: &str, units: Units) -> Result<Report> {
    WeatherClient::default().yahoo_weather(location_id, units)
}

pub fn fetch_yahoo_all_cities(country_code: &str, city_count: u32) -> Result<BTreeMap<String, Report>> {
    WeatherClient::default().yahoo_all_cities(country_code, city_count)
}

pub fn fetch_noaa_weather(station_id: &str) -> Result<Report> {
    WeatherClient::default().noaa_weather(station_id)
}

pub fn fetch_weather_com_report(location_id: &str, units: Units) -> Result<Report> {
    WeatherClient::default().weather_com_report(location_id, units)
}
