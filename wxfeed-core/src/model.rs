use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// What to ask a provider for. Providers ignore the parts they have no use for:
/// NOAA takes neither units nor language, Yahoo and weather.com take no language,
/// Google takes no units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRequest {
    pub location: String,
    pub units: Units,
    pub language: String,
}

impl WeatherRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into(), ..Self::default() }
    }
}

/// One level of a normalized report, keyed by field name.
pub type Record = BTreeMap<String, Field>;

/// A node in a normalized report: a string leaf, a nested group, or a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Text(String),
    Group(Record),
    Series(Vec<Record>),
}

impl Field {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Record> {
        match self {
            Field::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&[Record]> {
        match self {
            Field::Series(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_owned())
    }
}

impl From<Record> for Field {
    fn from(r: Record) -> Self {
        Field::Group(r)
    }
}

impl From<Vec<Record>> for Field {
    fn from(v: Vec<Record>) -> Self {
        Field::Series(v)
    }
}

/// Normalized weather report of one provider.
///
/// The layout below the top level is provider specific; see the provider modules
/// for the exact keys each one produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(Record);

impl Report {
    pub fn new(record: Record) -> Self {
        Self(record)
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn group(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(Field::as_group)
    }

    pub fn series(&self, key: &str) -> Option<&[Record]> {
        self.get(key).and_then(Field::as_series)
    }

    /// Follow `path` through nested groups down to a text leaf.
    ///
    /// `report.text(&["current_conditions", "wind", "speed"])`
    pub fn text(&self, path: &[&str]) -> Option<&str> {
        let (last, groups) = path.split_last()?;
        let mut record = &self.0;
        for key in groups {
            record = record.get(*key)?.as_group()?;
        }
        record.get(*last)?.as_text()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Record> for Report {
    fn from(record: Record) -> Self {
        Self(record)
    }
}

/// Entry of the Google country directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub iso_code: String,
}

/// Entry of the Google city directory. Coordinates are degrees times 10^6, as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude_e6: String,
    pub longitude_e6: String,
}

/// Unit system requested from providers that support a choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything other than "metric" means imperial; this never fails.
impl FromStr for Units {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("metric") {
            Ok(Units::Metric)
        } else {
            Ok(Units::Imperial)
        }
    }
}
