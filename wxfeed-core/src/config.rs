use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{
    model::{Units, WeatherRequest},
    provider::ProviderId,
};

/// Defaults for the command-line front end, stored on disk.
///
/// Example TOML:
/// ```toml
/// default_provider = "noaa"
/// units = "metric"
/// language = "en"
///
/// [locations]
/// noaa = "KJFK"
/// yahoo = "USNY0996"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "yahoo" or "weather.com".
    pub default_provider: Option<String>,

    pub units: Units,

    /// Language code for Google; empty means English.
    pub language: String,

    /// Default location or station id per provider.
    pub locations: HashMap<String, String>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `wxfeed configure` or pass a provider explicitly."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxfeed", "wxfeed")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the default location of a provider, making it the default provider
    /// if none is set yet.
    pub fn upsert_location(&mut self, provider_id: ProviderId, location: String) {
        self.locations.insert(provider_id.as_str().to_string(), location);

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    pub fn location(&self, provider_id: ProviderId) -> Option<&str> {
        self.locations.get(provider_id.as_str()).map(String::as_str)
    }

    /// Build a request for `provider_id`, preferring an explicit location over the stored one.
    pub fn request_for(
        &self,
        provider_id: ProviderId,
        location: Option<String>,
    ) -> Result<WeatherRequest> {
        let location = match location {
            Some(location) => location,
            None => self.location(provider_id).map(str::to_owned).ok_or_else(|| {
                anyhow!(
                    "No location given and none configured for provider '{provider_id}'.\n\
                     Hint: run `wxfeed configure` or pass a location."
                )
            })?,
        };

        Ok(WeatherRequest { location, units: self.units, language: self.language.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn upsert_sets_location_and_default() {
        let mut cfg = Config::default();

        cfg.upsert_location(ProviderId::Noaa, "KJFK".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::Noaa);
        assert_eq!(cfg.location(ProviderId::Noaa), Some("KJFK"));
        assert_eq!(cfg.location(ProviderId::Yahoo), None);
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_location(ProviderId::Noaa, "KJFK".into());
        cfg.upsert_location(ProviderId::Yahoo, "USNY0996".into());

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Noaa);

        cfg.set_default_provider(ProviderId::Yahoo);
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Yahoo);
    }

    #[test]
    fn request_prefers_explicit_location() {
        let mut cfg = Config { units: Units::Imperial, language: "de".into(), ..Config::default() };
        cfg.upsert_location(ProviderId::Yahoo, "USNY0996".into());

        let req = cfg.request_for(ProviderId::Yahoo, None).unwrap();
        assert_eq!(req.location, "USNY0996");
        assert_eq!(req.units, Units::Imperial);
        assert_eq!(req.language, "de");

        let req = cfg.request_for(ProviderId::Yahoo, Some("FRXX0076".into())).unwrap();
        assert_eq!(req.location, "FRXX0076");

        let err = cfg.request_for(ProviderId::Noaa, None).unwrap_err();
        assert!(err.to_string().contains("none configured for provider 'noaa'"));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let text = r#"
            default_provider = "weather.com"
            units = "imperial"

            [locations]
            "weather.com" = "USNY0996"
        "#;
        let cfg: Config = toml::from_str(text).unwrap();
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::WeatherCom);
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.language, "");
        assert_eq!(cfg.location(ProviderId::WeatherCom), Some("USNY0996"));

        let back: Config = toml::from_str(&toml::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(back.location(ProviderId::WeatherCom), Some("USNY0996"));
    }
}
