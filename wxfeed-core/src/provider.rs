use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::{collections::BTreeMap, fmt};

use crate::{
    error::{Result, WeatherError},
    model::{City, Country, Report, Units, WeatherRequest},
    transport::{HttpTransport, Payload, Transport},
};

pub mod google;
pub mod noaa;
pub mod weather_com;
pub mod yahoo;

pub use yahoo::city_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Google,
    Yahoo,
    Noaa,
    WeatherCom,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::Yahoo => "yahoo",
            ProviderId::Noaa => "noaa",
            ProviderId::WeatherCom => "weather.com",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Google => "Google",
            ProviderId::Yahoo => "Yahoo! Weather",
            ProviderId::Noaa => "NOAA",
            ProviderId::WeatherCom => "Weather.com",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Google, ProviderId::Yahoo, ProviderId::Noaa, ProviderId::WeatherCom]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "google" => Ok(ProviderId::Google),
            "yahoo" => Ok(ProviderId::Yahoo),
            "noaa" => Ok(ProviderId::Noaa),
            "weather.com" | "weathercom" | "weather_com" => Ok(ProviderId::WeatherCom),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: google, yahoo, noaa, weather.com."
            )),
        }
    }
}

/// Characters left literal in ids: alphanumerics plus `-_.~/`.
const ID: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~').remove(b'/');

pub(crate) fn quote(id: &str) -> String {
    utf8_percent_encode(id, ID).to_string()
}

/// Entry point for every feed. Holds the transport used for all requests.
#[derive(Debug)]
pub struct WeatherClient {
    transport: Box<dyn Transport>,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(HttpTransport::new())
    }
}

impl WeatherClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self { transport: Box::new(transport) }
    }

    /// GET `url`, mapping any transport failure to [`WeatherError::Connect`] for `provider`.
    pub(crate) fn fetch(&self, provider: ProviderId, url: &str) -> Result<Payload> {
        tracing::debug!("{provider}: GET {url}");
        self.transport.get(url).map_err(|e| {
            tracing::warn!("{provider}: {e}");
            WeatherError::Connect { provider }
        })
    }

    /// Current conditions and forecast from any provider, picking the request fields it uses.
    pub fn report(&self, id: ProviderId, request: &WeatherRequest) -> Result<Report> {
        match id {
            ProviderId::Google => self.google_weather(&request.location, &request.language),
            ProviderId::Yahoo => self.yahoo_weather(&request.location, request.units),
            ProviderId::Noaa => self.noaa_weather(&request.location),
            ProviderId::WeatherCom => self.weather_com_report(&request.location, request.units),
        }
    }

    pub fn google_weather(&self, location_id: &str, language: &str) -> Result<Report> {
        google::weather(self, location_id, language)
    }

    pub fn google_countries(&self, language: &str) -> Result<Vec<Country>> {
        google::countries(self, language)
    }

    pub fn google_cities(&self, country_code: &str, language: &str) -> Result<Vec<City>> {
        google::cities(self, country_code, language)
    }

    pub fn yahoo_weather(&self, location_id: &str, units: Units) -> Result<Report> {
        yahoo::weather(self, location_id, units)
    }

    pub fn yahoo_all_cities(
        &self,
        country_code: &str,
        city_count: u32,
    ) -> Result<BTreeMap<String, Report>> {
        yahoo::all_cities(self, country_code, city_count)
    }

    pub fn noaa_weather(&self, station_id: &str) -> Result<Report> {
        noaa::weather(self, station_id)
    }

    pub fn weather_com_report(&self, location_id: &str, units: Units) -> Result<Report> {
        weather_com::report(self, location_id, units)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::transport::TransportError;
    use std::sync::{Arc, Mutex};

    /// Transport that serves canned bodies, or refuses every connection.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        body: Option<(Option<&'static str>, Vec<u8>)>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl FakeTransport {
        pub fn serving(content_type: Option<&'static str>, body: impl Into<Vec<u8>>) -> Self {
            Self { body: Some((content_type, body.into())), requested: Arc::default() }
        }

        pub fn refusing() -> Self {
            Self::default()
        }

        /// Urls requested so far, shared with the transport after it moves into a client.
        pub fn requested(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.requested)
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<Payload, TransportError> {
            self.requested.lock().unwrap().push(url.to_owned());
            match &self.body {
                Some((ct, body)) => Ok(Payload::new(*ct, body.clone())),
                None => Err(TransportError {
                    url: url.to_owned(),
                    source: "connection refused".into(),
                }),
            }
        }
    }

    pub fn client_serving(body: &str) -> WeatherClient {
        WeatherClient::new(FakeTransport::serving(Some("text/xml; charset=utf-8"), body))
    }
}
