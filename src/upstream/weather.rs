//! OpenWeatherMap client
//!
//! Fetches current conditions from the `/data/2.5/weather` endpoint in
//! metric units.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{UpstreamError, WeatherSource, USER_AGENT};
use crate::models::{WeatherQuery, WeatherSnapshot};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeatherMap current-weather API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials("OPENWEATHER_API_KEY"))?;

        let mut params: Vec<(&str, String)> = vec![
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ];
        match query {
            WeatherQuery::City(city) => params.push(("q", city.clone())),
            WeatherQuery::Coordinates { lat, lon } => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
        }

        debug!("OpenWeatherMap request for {:?}", query);
        let response = self
            .client
            .get(OPENWEATHER_URL)
            .query(&params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(UpstreamError::NotFound(format!("location {:?}", query)));
            }
            status if !status.is_success() => return Err(UpstreamError::Status(status.as_u16())),
            _ => {}
        }

        let body: OwmResponse = response.json().await?;
        snapshot_from_response(body)
    }
}

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    wind: Option<OwmWind>,
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

// == Transform ==
fn snapshot_from_response(body: OwmResponse) -> Result<WeatherSnapshot, UpstreamError> {
    let condition = body
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::Malformed("weather conditions missing".to_string()))?;
    let sys = body.sys.unwrap_or(OwmSys {
        country: None,
        sunrise: None,
        sunset: None,
    });

    Ok(WeatherSnapshot {
        location: body.name,
        country: sys.country,
        temperature: body.main.temp,
        feels_like: body.main.feels_like,
        humidity: body.main.humidity,
        description: condition.description,
        icon: condition.icon,
        wind_speed: body.wind.map_or(0.0, |w| w.speed),
        sunrise: sys.sunrise.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        sunset: sys.sunset.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}
