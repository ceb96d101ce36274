//! Google's iGoogle weather API and its country/city directories.
//!
//! Every value is carried in a `data` attribute of an otherwise empty element:
//! `<city><name data="Bourges"/><latitude_e6 data="47079999"/>...</city>`.
//! A `problem_cause` element anywhere in the reply means the request was rejected.

use roxmltree::Node;

use super::{ProviderId, WeatherClient, quote};
use crate::{
    error::{Result, WeatherError},
    model::{City, Country, Field, Record, Report},
    xml,
};

const URL: &str = "http://www.google.com/ig";

/// Groups under `weather` and the children read from each. Absent children are skipped.
const GROUPS: &[(&str, &[&str])] = &[
    (
        "forecast_information",
        &[
            "city",
            "postal_code",
            "latitude_e6",
            "longitude_e6",
            "forecast_date",
            "current_date_time",
            "unit_system",
        ],
    ),
    ("current_conditions", &["condition", "temp_f", "temp_c", "humidity", "wind_condition", "icon"]),
];

const FORECAST: &[&str] = &["day_of_week", "low", "high", "icon", "condition"];

pub fn weather_url(location_id: &str, language: &str) -> String {
    format!("{URL}/api?weather={}&hl={}", quote(location_id), quote(language))
}

pub fn countries_url(language: &str) -> String {
    format!("{URL}/countries?output=xml&hl={}", quote(language))
}

pub fn cities_url(country_code: &str, language: &str) -> String {
    format!(
        "{URL}/cities?output=xml&country={}&hl={}",
        quote(&country_code.to_lowercase()),
        quote(language)
    )
}

pub(crate) fn weather(client: &WeatherClient, location_id: &str, language: &str) -> Result<Report> {
    let payload = client.fetch(ProviderId::Google, &weather_url(location_id, language))?;
    parse_weather(&payload.text()?)
}

pub(crate) fn countries(client: &WeatherClient, language: &str) -> Result<Vec<Country>> {
    let payload = client.fetch(ProviderId::Google, &countries_url(language))?;
    parse_countries(&payload.text()?)
}

pub(crate) fn cities(client: &WeatherClient, country_code: &str, language: &str) -> Result<Vec<City>> {
    let payload = client.fetch(ProviderId::Google, &cities_url(country_code, language))?;
    parse_cities(&payload.text()?)
}

pub fn parse_weather(text: &str) -> Result<Report> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();
    check_problem(root)?;

    let weather = xml::locate(root, "weather")?;

    let mut record = Record::new();
    for &(tag, children) in GROUPS {
        let mut group = Record::new();
        if let Some(node) = xml::first(weather, tag) {
            for &child in children {
                if let Some(element) = xml::first(node, child) {
                    group.insert(child.to_owned(), xml::attr(element, "data").into());
                }
            }
        }
        record.insert(tag.to_owned(), group.into());
    }

    let forecasts = xml::elements(weather, "forecast_conditions")
        .map(|node| {
            FORECAST
                .iter()
                .map(|&tag| -> Result<(String, Field)> {
                    Ok((tag.to_owned(), Field::Text(data(node, tag)?)))
                })
                .collect::<Result<Record>>()
        })
        .collect::<Result<Vec<_>>>()?;
    record.insert("forecasts".into(), forecasts.into());

    Ok(Report::new(record))
}

pub fn parse_countries(text: &str) -> Result<Vec<Country>> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();
    check_problem(root)?;

    xml::elements(root, "country")
        .map(|node| -> Result<Country> {
            Ok(Country { name: data(node, "name")?, iso_code: data(node, "iso_code")? })
        })
        .collect()
}

pub fn parse_cities(text: &str) -> Result<Vec<City>> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();
    check_problem(root)?;

    xml::elements(root, "city")
        .map(|node| -> Result<City> {
            Ok(City {
                name: data(node, "name")?,
                latitude_e6: data(node, "latitude_e6")?,
                longitude_e6: data(node, "longitude_e6")?,
            })
        })
        .collect()
}

/// `data` attribute of the first `tag` under `node`; the element itself is required.
fn data(node: Node<'_, '_>, tag: &str) -> Result<String> {
    Ok(xml::attr(xml::require(node, tag)?, "data"))
}

fn check_problem(root: Node<'_, '_>) -> Result<()> {
    let Some(problem) = xml::first(root, "problem_cause") else {
        return Ok(());
    };
    let cause = problem.attribute("data").filter(|d| !d.is_empty());
    let message = cause.unwrap_or("Google could not resolve the requested location").to_owned();
    tracing::warn!("google: {message}");
    Err(WeatherError::Provider(message))
}
