// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_VARIABLES: &str = "temperature_2m,precipitation,rain,showers";

#[derive(Debug)]
pub enum WeatherError {
    NotFound { place: String },
    Network(String),
    Malformed(String),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::NotFound { place } => write!(f, "place {place:?} not found"),
            WeatherError::Network(msg) => write!(f, "weather request failed: {msg}"),
            WeatherError::Malformed(msg) => write!(f, "unexpected weather response: {msg}"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<ureq::Error> for WeatherError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => WeatherError::Network(format!("http status {code}")),
            ureq::Error::Transport(t) => WeatherError::Network(t.to_string()),
        }
    }
}

impl From<std::io::Error> for WeatherError {
    fn from(e: std::io::Error) -> Self {
        WeatherError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Malformed(e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
}

impl CurrentConditions {
    pub fn is_raining(&self) -> bool {
        self.rain > 0.0 || self.showers > 0.0
    }
}

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Location>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

pub fn parse_geocoding(body: &str) -> Result<Option<Location>, WeatherError> {
    let resp: GeocodingResponse = serde_json::from_str(body)?;
    Ok(resp.results.into_iter().next())
}

pub fn parse_forecast(body: &str) -> Result<CurrentConditions, WeatherError> {
    let resp: ForecastResponse = serde_json::from_str(body)?;
    resp.current
        .ok_or_else(|| WeatherError::Malformed("missing \"current\" block".to_string()))
}

pub trait WeatherSource: Send + Sync {
    fn geocode(&self, place: &str) -> Result<Option<Location>, WeatherError>;
    fn current(&self, location: &Location) -> Result<CurrentConditions, WeatherError>;
}

pub struct OpenMeteo {
    agent: ureq::Agent,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteo {
    pub fn new(geocoding_url: impl Into<String>, forecast_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build(),
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        }
    }
}

impl OpenMeteo {
    fn geocode_request(&self, place: &str) -> ureq::Request {
        self.agent
            .get(&self.geocoding_url)
            .query("name", place)
            .query("count", "10")
            .query("language", "en")
            .query("format", "json")
    }

    fn forecast_request(&self, location: &Location) -> ureq::Request {
        self.agent
            .get(&self.forecast_url)
            .query("latitude", &location.latitude.to_string())
            .query("longitude", &location.longitude.to_string())
            .query("current", CURRENT_VARIABLES)
            .query("temperature_unit", "fahrenheit")
            .query("wind_speed_unit", "mph")
            .query("timezone", "GMT")
    }
}

impl Default for OpenMeteo {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODING_URL, DEFAULT_FORECAST_URL)
    }
}

impl WeatherSource for OpenMeteo {
    fn geocode(&self, place: &str) -> Result<Option<Location>, WeatherError> {
        let body = self.geocode_request(place).call()?.into_string()?;
        parse_geocoding(&body)
    }

    fn current(&self, location: &Location) -> Result<CurrentConditions, WeatherError> {
        let body = self.forecast_request(location).call()?.into_string()?;
        parse_forecast(&body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub conditions: CurrentConditions,
    pub raining: bool,
    pub location_text: String,
    pub rain_text: String,
}

impl WeatherReport {
    pub fn new(location: Location, conditions: CurrentConditions) -> Self {
        let raining = conditions.is_raining();
        let country = location
            .country_code
            .as_deref()
            .unwrap_or("??")
            .to_lowercase();
        let location_text = format!(
            "current garden location: {}, {}",
            location.name.to_lowercase(),
            country
        );
        Self {
            location,
            conditions,
            raining,
            location_text,
            rain_text: rain_text(raining, conditions.precipitation),
        }
    }
}

pub fn rain_text(raining: bool, precipitation: f64) -> String {
    if raining {
        format!(
            "it is raining. total precipitation: {}mm",
            format_precipitation(precipitation)
        )
    } else {
        "it is not raining.".to_string()
    }
}

pub fn format_precipitation(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }

    let fixed = format!("{:.4}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0000"));
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().chain(frac.chars()).all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

pub fn lookup(source: &dyn WeatherSource, place: &str) -> Result<WeatherReport, WeatherError> {
    let place = place.trim();
    if place.is_empty() {
        return Err(WeatherError::NotFound {
            place: String::new(),
        });
    }

    let location = source
        .geocode(place)?
        .ok_or_else(|| WeatherError::NotFound {
            place: place.to_string(),
        })?;
    info!(
        place,
        name = %location.name,
        latitude = location.latitude,
        longitude = location.longitude,
        "place resolved"
    );

    let conditions = source.current(&location)?;
    info!(
        temperature_2m = conditions.temperature_2m,
        precipitation = conditions.precipitation,
        rain = conditions.rain,
        showers = conditions.showers,
        "current conditions"
    );

    Ok(WeatherReport::new(location, conditions))
}

#[derive(Debug)]
pub struct LookupOutcome {
    pub place: String,
    pub result: Result<WeatherReport, WeatherError>,
}

// Nothing guards against overlapping lookups; the last one to finish wins.
pub fn spawn_lookup(
    source: Arc<dyn WeatherSource>,
    place: String,
    tx: Sender<LookupOutcome>,
) -> std::io::Result<()> {
    info!(place = %place, "weather lookup started");
    thread::Builder::new()
        .name("weather-lookup".to_string())
        .spawn(move || {
            let result = lookup(source.as_ref(), &place);
            if tx.send(LookupOutcome { place, result }).is_err() {
                warn!("weather lookup finished after shutdown");
            }
        })?;
    Ok(())
}
