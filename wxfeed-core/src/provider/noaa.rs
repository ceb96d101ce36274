//! National Weather Service current observations (weather.gov XML feed).
//!
//! The feed is flat: every value is the text of a child of `current_observation`.
//! Stations routinely leave tags out (no heat index in winter, no gust when calm), so
//! absent tags are dropped from the report instead of failing it.

use roxmltree::Node;

use super::{ProviderId, WeatherClient, quote};
use crate::{
    error::Result,
    model::{Record, Report},
    xml,
};

const URL: &str = "http://www.weather.gov/xml/current_obs";

const TAGS: &[&str] = &[
    "suggested_pickup",
    "suggested_pickup_period",
    "location",
    "station_id",
    "latitude",
    "longitude",
    "observation_time",
    "observation_time_rfc822",
    "weather",
    "temperature_string",
    "temp_f",
    "temp_c",
    "relative_humidity",
    "wind_string",
    "wind_dir",
    "wind_degrees",
    "wind_mph",
    "wind_gust_mph",
    "pressure_string",
    "pressure_mb",
    "pressure_in",
    "dewpoint_string",
    "dewpoint_f",
    "dewpoint_c",
    "heat_index_string",
    "heat_index_f",
    "heat_index_c",
    "windchill_string",
    "windchill_f",
    "windchill_c",
    "icon_url_base",
    "icon_url_name",
    "two_day_history_url",
    "ob_url",
];

pub fn url(station_id: &str) -> String {
    format!("{URL}/{}.xml", quote(station_id))
}

pub(crate) fn weather(client: &WeatherClient, station_id: &str) -> Result<Report> {
    let payload = client.fetch(ProviderId::Noaa, &url(station_id))?;
    parse(&payload.text()?)
}

pub fn parse(text: &str) -> Result<Report> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();
    let observation = xml::locate(root, "current_observation")?;
    Ok(Report::new(observation_fields(observation)))
}

fn observation_fields(observation: Node<'_, '_>) -> Record {
    let mut record = Record::new();
    for &tag in TAGS {
        match xml::first(observation, tag).and_then(xml::text_of) {
            Some(text) => {
                record.insert(tag.to_owned(), text.into());
            }
            None => tracing::trace!("noaa: no <{tag}> in observation"),
        }
    }
    record
}
