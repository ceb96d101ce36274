use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use wxfeed_core::{Config, ProviderId, Report, Units, WeatherClient, WeatherError};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxfeed", version, about = "Weather feeds, normalized")]
pub struct Cli {
    /// Verbose logging to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store default provider, locations, units and language.
    Configure,

    /// Print the normalized report of one provider as JSON.
    Weather {
        /// google, yahoo, noaa or weather.com; defaults to the configured provider.
        #[arg(long, short)]
        provider: Option<String>,

        /// Location or station id; defaults to the configured one for the provider.
        location: Option<String>,

        /// "metric" or anything else for imperial.
        #[arg(long)]
        units: Option<String>,

        /// Language code (Google only).
        #[arg(long)]
        lang: Option<String>,
    },

    /// List Google's countries.
    Countries {
        #[arg(long)]
        lang: Option<String>,
    },

    /// List Google's cities of a country.
    Cities {
        /// Two-letter country code, e.g. "fr".
        country: String,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Yahoo! Weather reports for the first COUNT cities of a country.
    YahooAll {
        /// Four-letter country code, e.g. "FRXX".
        country: String,

        count: u32,
    },

    /// One line per configured provider: condition and temperature right now.
    Summary,

    /// Compass direction for a bearing in degrees.
    Wind { degrees: String },

    /// Beaufort force for a wind speed in km/h.
    Beaufort { km_per_hour: String },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        let client = WeatherClient::default();

        match self.command {
            Command::Configure => {
                configure(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Weather { provider, location, units, lang } => {
                let id = match provider {
                    Some(p) => ProviderId::try_from(p.as_str())?,
                    None => config.default_provider_id()?,
                };
                let mut request = config.request_for(id, location)?;
                if let Some(units) = units {
                    request.units = units.parse().unwrap_or_default();
                }
                if let Some(lang) = lang {
                    request.language = lang;
                }
                emit(client.report(id, &request))
            }
            Command::Countries { lang } => {
                let lang = lang.unwrap_or_else(|| config.language.clone());
                emit(client.google_countries(&lang))
            }
            Command::Cities { country, lang } => {
                let lang = lang.unwrap_or_else(|| config.language.clone());
                emit(client.google_cities(&country, &lang))
            }
            Command::YahooAll { country, count } => emit(client.yahoo_all_cities(&country, count)),
            Command::Summary => summary(&client, &config),
            Command::Wind { degrees } => {
                let direction = wxfeed_core::wind_direction(degrees.as_str());
                println!("{}", direction.map_or("", |c| c.as_str()));
                Ok(ExitCode::SUCCESS)
            }
            Command::Beaufort { km_per_hour } => {
                let force = wxfeed_core::beaufort_scale(km_per_hour.as_str());
                println!("{}", force.map(|f| f.to_string()).unwrap_or_default());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Pretty JSON on success, `{"error": ...}` and a failing exit code otherwise.
fn emit<T: Serialize>(result: Result<T, WeatherError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn summary(client: &WeatherClient, config: &Config) -> anyhow::Result<ExitCode> {
    let mut any = false;
    for &id in ProviderId::all() {
        let Ok(request) = config.request_for(id, None) else {
            continue;
        };
        any = true;
        match client.report(id, &request) {
            Ok(report) => println!("{}", describe(id, &report)),
            Err(e) => println!("{}: {e}", id.display_name()),
        }
    }

    if !any {
        anyhow::bail!("No locations configured.\nHint: run `wxfeed configure` first.");
    }
    println!("\nfetched: {}", chrono::Local::now().to_rfc2822());
    Ok(ExitCode::SUCCESS)
}

/// "Yahoo! Weather says: It is sunny and 18C now in Los Angeles."
fn describe(id: ProviderId, report: &Report) -> String {
    let (condition, temp, unit, place) = match id {
        ProviderId::Google => (
            report.text(&["current_conditions", "condition"]),
            report.text(&["current_conditions", "temp_c"]),
            Some("C"),
            report.text(&["forecast_information", "city"]),
        ),
        ProviderId::Yahoo => (
            report.text(&["condition", "text"]),
            report.text(&["condition", "temp"]),
            report.text(&["units", "temperature"]),
            report.text(&["location", "city"]),
        ),
        ProviderId::Noaa => (
            report.text(&["weather"]),
            report.text(&["temp_c"]),
            Some("C"),
            report.text(&["location"]),
        ),
        ProviderId::WeatherCom => (
            report.text(&["current_conditions", "text"]),
            report.text(&["current_conditions", "temperature"]),
            report.text(&["units", "temperature"]),
            report.text(&["location", "name"]),
        ),
    };

    format!(
        "{} says: It is {} and {}{} now in {}.",
        id.display_name(),
        condition.unwrap_or("unknown").to_lowercase(),
        temp.unwrap_or("?"),
        unit.unwrap_or_default(),
        place.unwrap_or("an unnamed place"),
    )
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let id = inquire::Select::new("Provider:", ProviderId::all().to_vec())
        .prompt()
        .context("Provider selection cancelled")?;

    let mut prompt = inquire::Text::new("Location or station id:");
    if let Some(current) = config.location(id) {
        prompt = prompt.with_default(current);
    }
    let location = prompt.prompt().context("Location input cancelled")?;
    config.upsert_location(id, location.trim().to_owned());

    let units = inquire::Select::new("Units:", vec![Units::Metric, Units::Imperial])
        .with_starting_cursor(usize::from(config.units == Units::Imperial))
        .prompt()
        .context("Units selection cancelled")?;
    config.units = units;

    if id == ProviderId::Google {
        config.language = inquire::Text::new("Language code (empty for English):")
            .with_default(&config.language)
            .prompt()
            .context("Language input cancelled")?;
    }

    if inquire::Confirm::new(&format!("Make {id} the default provider?"))
        .with_default(config.default_provider.is_none())
        .prompt()
        .context("Confirmation cancelled")?
    {
        config.set_default_provider(id);
    }

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}
