//! weather.com XML data feed (`xml.weather.com/weather/local`).
//!
//! The feed uses terse tag names (`tmp`, `flik`, `hmid`, ...). They are renamed through
//! [`KEY_MAP`], which all nesting levels share. Every listed tag is required: a
//! success document missing any of them fails with [`WeatherError::Missing`].

use roxmltree::Node;

use super::{ProviderId, WeatherClient, quote};
use crate::{
    error::{Result, WeatherError},
    model::{Field, Record, Report, Units},
    xml,
};

const URL: &str = "http://xml.weather.com/weather/local";
const PARTNER: &str = "par=1138276742&key=15ee9c789ccd70f5";

/// Feed tag -> report key.
pub const KEY_MAP: &[(&str, &str)] = &[
    ("head", "units"),
    ("ut", "temperature"),
    ("ud", "distance"),
    ("us", "speed"),
    ("up", "pressure"),
    ("ur", "rainfall"),
    ("loc", "location"),
    ("dnam", "name"),
    ("lat", "lat"),
    ("lon", "lon"),
    ("cc", "current_conditions"),
    ("lsup", "last_updated"),
    ("obst", "station"),
    ("tmp", "temperature"),
    ("flik", "feels_like"),
    ("t", "text"),
    ("icon", "icon"),
    ("bar", "barometer"),
    ("r", "reading"),
    ("d", "direction"),
    ("wind", "wind"),
    ("s", "speed"),
    ("gust", "gust"),
    ("hmid", "humidity"),
    ("vis", "visibility"),
    ("uv", "uv"),
    ("i", "index"),
    ("dewp", "dewpoint"),
    ("moon", "moon_phase"),
    ("hi", "high"),
    ("low", "low"),
    ("sunr", "sunrise"),
    ("suns", "sunset"),
    ("bt", "brief_text"),
    ("ppcp", "chance_precip"),
];

/// Top-level groups under `weather`.
const GROUPS: &[(&str, &[&str])] = &[
    ("head", &["ut", "ud", "us", "up", "ur"]),
    ("loc", &["dnam", "lat", "lon"]),
    ("cc", &["lsup", "obst", "tmp", "flik", "t", "icon", "hmid", "vis", "dewp"]),
];

/// Groups nested inside `cc`.
const CC_GROUPS: &[(&str, &[&str])] = &[
    ("bar", &["r", "d"]),
    ("wind", &["s", "gust", "d", "t"]),
    ("uv", &["i", "t"]),
    ("moon", &["icon", "t"]),
];

const DAY: &[&str] = &["hi", "low", "sunr", "suns"];
const PART: &[&str] = &["icon", "t", "bt", "ppcp", "hmid"];
const WIND: &[&str] = &["s", "gust", "d", "t"];

/// Report key for a feed tag. Unmapped tags keep their own name.
pub fn key(tag: &str) -> &str {
    KEY_MAP.iter().find(|(t, _)| *t == tag).map_or(tag, |&(_, k)| k)
}

pub fn url(location_id: &str, units: Units) -> String {
    let unit = match units {
        Units::Metric => "m",
        Units::Imperial => "",
    };
    format!("{URL}/{}?{PARTNER}&unit={unit}&dayf=5&cc=*", quote(location_id))
}

pub(crate) fn report(client: &WeatherClient, location_id: &str, units: Units) -> Result<Report> {
    let payload = client.fetch(ProviderId::WeatherCom, &url(location_id, units))?;
    parse(&payload.text()?)
}

pub fn parse(text: &str) -> Result<Report> {
    let doc = xml::parse(text)?;
    let root = doc.root_element();

    let Ok(weather) = xml::locate(root, "weather") else {
        let error = xml::locate(root, "error")?;
        let message = xml::require_text(error, "err")?;
        tracing::warn!("weather.com: feed reported '{message}'");
        return Err(WeatherError::Provider(message));
    };

    let mut record = Record::new();
    for &(tag, children) in GROUPS {
        let node = xml::require(weather, tag)?;
        let mut group = xml::texts(node, children, key)?;
        if tag == "cc" {
            for &(inner, children) in CC_GROUPS {
                let sub = xml::texts(xml::require(node, inner)?, children, key)?;
                group.insert(key(inner).to_owned(), sub.into());
            }
        }
        record.insert(key(tag).to_owned(), group.into());
    }

    let forecasts = xml::elements(xml::require(weather, "dayf")?, "day")
        .map(forecast)
        .collect::<Result<Vec<_>>>()?;
    record.insert("forecasts".into(), forecasts.into());

    Ok(Report::new(record))
}

fn forecast(day: Node<'_, '_>) -> Result<Record> {
    let mut record = xml::texts(day, DAY, key)?;
    record.insert("day_of_week".into(), xml::attr(day, "t").into());
    record.insert("date".into(), xml::attr(day, "dt").into());

    for part in xml::elements(day, "part") {
        let time_of_day = match part.attribute("p") {
            Some("d") => "day",
            Some("n") => "night",
            other => return Err(WeatherError::UnknownPart(other.unwrap_or_default().to_owned())),
        };
        let mut period = xml::texts(part, PART, key)?;
        let wind = xml::texts(xml::require(part, "wind")?, WIND, key)?;
        period.insert("wind".into(), wind.into());
        record.insert(time_of_day.into(), Field::Group(period));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::client_serving;

    const FEED: &str = include_str!("../../tests/fixtures/weather_com_usny0996.xml");

    #[test]
    fn url_embeds_partner_and_unit() {
        assert_eq!(
            url("USNY0996", Units::Metric),
            "http://xml.weather.com/weather/local/USNY0996?par=1138276742&key=15ee9c789ccd70f5&unit=m&dayf=5&cc=*"
        );
        assert!(url("USNY0996", Units::Imperial).contains("&unit=&dayf=5"));
    }

    #[test]
    fn every_structured_tag_has_a_key() {
        let tables = GROUPS.iter().chain(CC_GROUPS);
        for (tag, children) in tables {
            assert!(KEY_MAP.iter().any(|(t, _)| t == tag), "{tag}");
            for child in *children {
                assert!(KEY_MAP.iter().any(|(t, _)| t == child), "{child}");
            }
        }
        for tag in DAY.iter().chain(PART).chain(WIND) {
            assert!(KEY_MAP.iter().any(|(t, _)| t == tag), "{tag}");
        }
    }

    #[test]
    fn top_level_groups_are_renamed() {
        let report = parse(FEED).unwrap();
        assert_eq!(report.text(&["units", "temperature"]), Some("C"));
        assert_eq!(report.text(&["units", "rainfall"]), Some("mm"));
        assert_eq!(report.text(&["location", "name"]), Some("New York, NY (10001)"));
        assert_eq!(report.text(&["location", "lat"]), Some("40.75"));
        assert_eq!(report.text(&["current_conditions", "last_updated"]), Some("5/14/13 2:51 PM EDT"));
        assert_eq!(report.text(&["current_conditions", "station"]), Some("New York, NY"));
        assert_eq!(report.text(&["current_conditions", "temperature"]), Some("18"));
        assert_eq!(report.text(&["current_conditions", "feels_like"]), Some("18"));
        assert_eq!(report.text(&["current_conditions", "text"]), Some("Fair"));
        assert_eq!(report.text(&["current_conditions", "dewpoint"]), Some("6"));
    }

    #[test]
    fn current_conditions_nest_a_second_level() {
        let report = parse(FEED).unwrap();
        let cc = |path: &[&str]| {
            let mut full = vec!["current_conditions"];
            full.extend_from_slice(path);
            report.text(&full).map(str::to_owned)
        };
        assert_eq!(cc(&["barometer", "reading"]).as_deref(), Some("1016.3"));
        assert_eq!(cc(&["barometer", "direction"]).as_deref(), Some("steady"));
        assert_eq!(cc(&["wind", "speed"]).as_deref(), Some("26"));
        assert_eq!(cc(&["wind", "gust"]).as_deref(), Some("N/A"));
        assert_eq!(cc(&["wind", "direction"]).as_deref(), Some("220"));
        assert_eq!(cc(&["wind", "text"]).as_deref(), Some("SW"));
        assert_eq!(cc(&["uv", "index"]).as_deref(), Some("6"));
        assert_eq!(cc(&["uv", "text"]).as_deref(), Some("High"));
        assert_eq!(cc(&["moon_phase", "icon"]).as_deref(), Some("4"));
        assert_eq!(cc(&["moon_phase", "text"]).as_deref(), Some("Waxing Crescent"));
    }

    #[test]
    fn forecasts_have_day_and_night_parts() {
        let report = parse(FEED).unwrap();
        let forecasts = report.series("forecasts").unwrap();
        assert_eq!(forecasts.len(), 2);

        let today = &forecasts[0];
        assert_eq!(today["day_of_week"], Field::from("Tuesday"));
        assert_eq!(today["date"], Field::from("May 14"));
        assert_eq!(today["high"], Field::from("21"));
        assert_eq!(today["low"], Field::from("11"));
        assert_eq!(today["sunrise"], Field::from("5:40 AM"));
        assert_eq!(today["sunset"], Field::from("8:05 PM"));

        let day = today["day"].as_group().unwrap();
        assert_eq!(day["text"], Field::from("Sunny"));
        assert_eq!(day["brief_text"], Field::from("Sunny"));
        assert_eq!(day["chance_precip"], Field::from("0"));
        let wind = day["wind"].as_group().unwrap();
        assert_eq!(wind["text"], Field::from("WSW"));
        assert_eq!(wind["speed"], Field::from("24"));

        let night = today["night"].as_group().unwrap();
        assert_eq!(night["text"], Field::from("Clear"));
        assert_eq!(night["humidity"], Field::from("55"));
        assert_eq!(night["wind"].as_group().unwrap()["direction"], Field::from("250"));
    }

    #[test]
    fn missing_tag_fails_the_whole_report() {
        let feed = FEED.replacen("<flik>18</flik>", "", 1);
        let err = parse(&feed).unwrap_err();
        assert!(matches!(err, WeatherError::Missing { element } if element == "flik"));

        let feed = FEED.replacen("<moon>", "<lune>", 1).replacen("</moon>", "</lune>", 1);
        assert!(matches!(parse(&feed), Err(WeatherError::Missing { element }) if element == "moon"));
    }

    #[test]
    fn unknown_part_is_rejected() {
        let feed = FEED.replacen(r#"<part p="n">"#, r#"<part p="x">"#, 1);
        assert!(matches!(parse(&feed), Err(WeatherError::UnknownPart(p)) if p == "x"));
    }

    #[test]
    fn error_document_yields_err_text() {
        let feed = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<error>
  <err type="100">Invalid location provided.</err>
</error>"#;
        let err = parse(feed).unwrap_err();
        assert!(err.is_provider_error());
        assert_eq!(err.to_string(), "Invalid location provided.");
    }

    #[test]
    fn latin1_feed_is_decoded_before_parsing() {
        let feed = FEED.replace("New York, NY (10001)", "Zürich, Switzerland");
        let latin1: Vec<u8> = feed.chars().map(|c| u8::try_from(u32::from(c)).unwrap()).collect();
        let transport = crate::provider::testing::FakeTransport::serving(
            Some("text/xml; charset=ISO-8859-1"),
            latin1,
        );
        let report = WeatherClient::new(transport)
            .weather_com_report("SZXX0033", Units::Metric)
            .unwrap();
        assert_eq!(report.text(&["location", "name"]), Some("Zürich, Switzerland"));
    }

    #[test]
    fn fetch_goes_through_client() {
        let report = client_serving(FEED).weather_com_report("USNY0996", Units::Metric).unwrap();
        assert_eq!(report.series("forecasts").map(<[Record]>::len), Some(2));
    }
}
