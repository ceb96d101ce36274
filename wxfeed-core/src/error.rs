use crate::provider::ProviderId;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

/// Everything that can go wrong between building a feed URL and handing back a report.
#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    /// DNS, refused connection, timeout or a non-success HTTP status.
    #[error("Could not connect to {}", .provider.display_name())]
    Connect { provider: ProviderId },

    /// The feed itself reported a problem, e.g. an unknown location or station.
    #[error("{0}")]
    Provider(String),

    #[error("Feed is missing required element <{element}>")]
    Missing { element: String },

    #[error("Feed element <{element}> has no text")]
    MissingText { element: String },

    #[error("Unknown forecast part '{0}' (expected 'd' or 'n')")]
    UnknownPart(String),

    #[error("Unsupported charset '{0}'")]
    Charset(String),

    #[error("Malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl WeatherError {
    pub(crate) fn missing(element: impl Into<String>) -> Self {
        Self::Missing { element: element.into() }
    }

    pub(crate) fn missing_text(element: impl Into<String>) -> Self {
        Self::MissingText { element: element.into() }
    }

    /// True for failures reported by the feed rather than by the network or the parser.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
