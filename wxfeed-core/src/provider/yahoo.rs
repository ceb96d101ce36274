//! Yahoo! Weather RSS feed.
//!
//! Almost everything lives in `yweather:` elements whose values are attributes, e.g.
//! `<yweather:condition text="Sunny" code="32" temp="18" date="..."/>`.
//! An error feed lacks the channel `title`/`link` and puts the message in `item/title`.

use std::collections::BTreeMap;

use super::{ProviderId, WeatherClient, quote};
use crate::{
    error::{Result, WeatherError},
    model::{Field, Record, Report, Units},
    xml,
};

const URL: &str = "http://xml.weather.yahoo.com/forecastrss";
const NS: &str = "http://xml.weather.yahoo.com/ns/rss/1.0";
const GEO_NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";

/// Singleton `yweather:` elements and the attributes copied out of each.
const GROUPS: &[(&str, &[&str])] = &[
    ("location", &["city", "region", "country"]),
    ("units", &["temperature", "distance", "pressure", "speed"]),
    ("wind", &["chill", "direction", "speed"]),
    ("atmosphere", &["humidity", "visibility", "pressure", "rising"]),
    ("astronomy", &["sunrise", "sunset"]),
    ("condition", &["text", "code", "temp", "date"]),
];

const FORECAST: &[&str] = &["day", "date", "low", "high", "text", "code"];

pub fn url(location_id: &str, units: Units) -> String {
    let unit = match units {
        Units::Metric => 'c',
        Units::Imperial => 'f',
    };
    format!("{URL}/{}_{unit}.xml", quote(location_id))
}

pub(crate) fn weather(client: &WeatherClient, location_id: &str, units: Units) -> Result<Report> {
    let payload = client.fetch(ProviderId::Yahoo, &url(location_id, units))?;
    parse(&payload.text()?)
}

/// Ids `<country><nnnn>` for cities 1 through `count`, e.g. `FRXX0001`.
///
/// The iterator is `Clone`; calling again with the same arguments gives the same ids.
pub fn city_codes(country_code: &str, count: u32) -> impl Iterator<Item = String> + Clone + '_ {
    (1..=count).map(move |i| format!("{country_code}{i:04}"))
}

/// Metric reports for the first `city_count` cities of a country, keyed by city name.
///
/// Stops at the first city that fails and returns that error.
pub(crate) fn all_cities(
    client: &WeatherClient,
    country_code: &str,
    city_count: u32,
) -> Result<BTreeMap<String, Report>> {
    let mut reports = BTreeMap::new();
    for code in city_codes(country_code, city_count) {
        let report = weather(client, &code, Units::Metric)?;
        let city = report.text(&["location", "city"]).unwrap_or_default().to_owned();
        tracing::debug!("yahoo: {code} is {city}");
        reports.insert(city, report);
    }
    Ok(reports)
}

pub fn parse(text: &str) -> Result<Report> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();

    let title = xml::first(root, "title").and_then(xml::text_of);
    let link = xml::first(root, "link").and_then(xml::text_of);
    let (Some(title), Some(link)) = (title, link) else {
        let item = xml::require(root, "item")?;
        let message = xml::require_text(item, "title")?;
        tracing::warn!("yahoo: feed reported '{message}'");
        return Err(WeatherError::Provider(message));
    };

    let mut record = Record::new();
    record.insert("title".into(), title.into());
    record.insert("link".into(), link.into());

    for &(tag, names) in GROUPS {
        let element = xml::elements_ns(root, NS, tag)
            .next()
            .ok_or_else(|| WeatherError::missing(format!("yweather:{tag}")))?;
        record.insert(tag.to_owned(), xml::attrs(element, names).into());
    }

    let coordinate =
        |name: &'static str| xml::elements_ns(root, GEO_NS, name).next().and_then(xml::text_of);
    let mut geo = Record::new();
    geo.insert("lat".into(), coordinate("lat").unwrap_or_default().into());
    geo.insert("long".into(), coordinate("long").unwrap_or_default().into());
    record.insert("geo".into(), geo.into());

    let item = xml::require(root, "item")?;
    if let Some(Field::Group(condition)) = record.get_mut("condition") {
        condition.insert("title".into(), xml::require_text(item, "title")?.into());
    }
    record.insert("html_description".into(), xml::require_text(item, "description")?.into());

    let forecasts: Vec<Record> =
        xml::elements_ns(root, NS, "forecast").map(|f| xml::attrs(f, FORECAST)).collect();
    record.insert("forecasts".into(), forecasts.into());

    Ok(Report::new(record))
}
