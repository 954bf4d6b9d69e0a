use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use url::Url;
use wxmap_shared::models::Coordinates;

use crate::error::ApiError;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Thin client for the OpenWeatherMap 5 day / 3 hour forecast.
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn forecast_url(&self, coords: Coordinates) -> Result<Url, url::ParseError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        Url::parse_with_params(
            &format!("{}{}", self.base_url, FORECAST_PATH),
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ],
        )
    }

    /// Fetch the forecast and hand back the provider's JSON untouched.
    pub async fn forecast(&self, coords: Coordinates) -> Result<Value, ApiError> {
        let url = self.forecast_url(coords)?;
        info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "fetching forecast"
        );

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::UpstreamStatus(status));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
}

impl WeatherQuery {
    fn coordinates(&self) -> Result<Coordinates, ApiError> {
        let coords = Coordinates::new(self.latitude, self.longitude);
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(ApiError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

async fn weather_handler(
    State(client): State<Arc<OpenWeatherClient>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Value>, ApiError> {
    let coords = query.coordinates()?;
    let forecast = client.forecast(coords).await?;
    Ok(Json(forecast))
}

/// `GET /weather?latitude=..&longitude=..`
pub fn router(client: Arc<OpenWeatherClient>) -> Router {
    Router::new()
        .route("/weather", get(weather_handler))
        .with_state(client)
}
