//! HTTP seam and the decode step that turns a response body into UTF-8 text.

use encoding_rs::Encoding;
use std::{borrow::Cow, fmt::Debug};

use crate::error::{Result, WeatherError};

/// Raw response of a feed request.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Payload {
    pub fn new(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self { content_type: content_type.map(str::to_owned), body: body.into() }
    }

    /// Body decoded per the header charset, else the XML declaration, else UTF-8.
    pub fn text(&self) -> Result<Cow<'_, str>> {
        let label = self
            .content_type
            .as_deref()
            .and_then(charset)
            .or_else(|| declared_encoding(&self.body))
            .unwrap_or("utf-8");
        decode(&self.body, label)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("GET {url} failed: {source}")]
pub struct TransportError {
    pub url: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Fetches a URL and returns the whole body.
pub trait Transport: Send + Sync + Debug {
    fn get(&self, url: &str) -> Result<Payload, TransportError>;
}

/// Blocking reqwest transport. Plain GET, no custom headers.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Payload, TransportError> {
        let fail = |e: reqwest::Error| TransportError { url: url.to_owned(), source: Box::new(e) };

        let res = self.http.get(url).send().and_then(|r| r.error_for_status()).map_err(fail)?;

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = res.bytes().map_err(fail)?.to_vec();

        Ok(Payload { content_type, body })
    }
}

/// Extract the `charset=` token of a content-type header value.
pub fn charset(content_type: &str) -> Option<&str> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let value = content_type[start..].split(';').next()?.trim().trim_matches('"');
    (!value.is_empty()).then_some(value)
}

/// The `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
pub fn declared_encoding(body: &[u8]) -> Option<&str> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    let rest = body.trim_ascii_start().strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&rest[..end]).ok()?;

    let start = decl.find("encoding")? + "encoding".len();
    let value = decl[start..].trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let value = &value[1..];
    let label = &value[..value.find(quote)?];
    (!label.is_empty()).then_some(label)
}

/// Decode `body` as `label`, re-encoding to UTF-8 when the label is anything else.
pub fn decode<'a>(body: &'a [u8], label: &str) -> Result<Cow<'a, str>> {
    if label.eq_ignore_ascii_case("utf-8") || label.eq_ignore_ascii_case("utf8") {
        return Ok(String::from_utf8_lossy(body));
    }

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| WeatherError::Charset(label.to_owned()))?;
    tracing::debug!("decoding feed body from {}", encoding.name());

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::warn!("feed body had bytes not valid in {}", encoding.name());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_is_extracted_from_content_type() {
        assert_eq!(charset("text/xml; charset=ISO-8859-1"), Some("ISO-8859-1"));
        assert_eq!(charset("text/xml;Charset=\"utf-8\"; foo=bar"), Some("utf-8"));
        assert_eq!(charset("text/xml"), None);
        assert_eq!(charset("text/xml; charset="), None);
    }

    #[test]
    fn latin1_body_is_reencoded() {
        // "Düsseldorf" in ISO-8859-1
        let body = b"D\xfcsseldorf".to_vec();
        let payload = Payload::new(Some("text/xml; charset=ISO-8859-1"), body);
        assert_eq!(payload.text().unwrap(), "Düsseldorf");
    }

    #[test]
    fn missing_charset_means_utf8() {
        let payload = Payload::new(Some("text/xml"), "Zürich".as_bytes());
        assert_eq!(payload.text().unwrap(), "Zürich");

        let payload = Payload::new(None, "Zürich".as_bytes());
        assert!(matches!(payload.text().unwrap(), Cow::Borrowed("Zürich")));
    }

    #[test]
    fn declaration_encoding_is_read() {
        let head = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#;
        assert_eq!(declared_encoding(head), Some("ISO-8859-1"));
        assert_eq!(declared_encoding(b"\xEF\xBB\xBF<?xml version='1.0' encoding = 'utf-8' ?>"), Some("utf-8"));
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><a encoding="x"/>"#), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
        assert_eq!(declared_encoding(b""), None);
    }

    #[test]
    fn declaration_applies_when_header_has_no_charset() {
        let body = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><c>D\xfcsseldorf</c>".to_vec();
        let payload = Payload::new(Some("application/xml"), body.clone());
        assert_eq!(payload.text().unwrap(), "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><c>Düsseldorf</c>");

        let payload = Payload::new(None, body);
        assert!(payload.text().unwrap().contains("Düsseldorf"));
    }

    #[test]
    fn header_charset_wins_over_declaration() {
        let body = "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><c>Zürich</c>";
        let payload = Payload::new(Some("text/xml; charset=utf-8"), body.as_bytes());
        assert!(payload.text().unwrap().contains("Zürich"));
    }

    #[test]
    fn unknown_charset_is_an_error() {
        let payload = Payload::new(Some("text/xml; charset=klingon-7"), "x".as_bytes());
        assert!(matches!(payload.text(), Err(WeatherError::Charset(c)) if c == "klingon-7"));
    }
}
