use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::geometry_provider::LatLng;

pub const KAKAO_DIRECTIONS_API_URL: &str = "https://apis-navi.kakaomobility.com/v1/directions";
pub const KAKAO_API_KEY_ENV_VAR: &str = "KAKAO_API_KEY";

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("no route found ({code}): {message}")]
    NoRoute { code: i32, message: String },

    #[error("missing environment variable {0}")]
    MissingApiKey(&'static str),
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    result_code: i32,
    #[serde(default)]
    result_msg: String,
    summary: Option<RouteSummary>,
    #[serde(default)]
    sections: Vec<RouteSection>,
}

#[derive(Deserialize)]
struct RouteSummary {
    /// Seconds
    duration: f64,
}

#[derive(Deserialize)]
struct RouteSection {
    #[serde(default)]
    roads: Vec<Road>,
}

#[derive(Deserialize)]
struct Road {
    /// Flattened `[lon, lat, lon, lat, ...]`
    #[serde(default)]
    vertexes: Vec<f64>,
}

pub struct KakaoMobilityClientParams {
    pub api_key: String,
    pub timeout: Duration,
}

impl KakaoMobilityClientParams {
    pub fn from_env() -> Result<Self, DirectionsError> {
        let api_key = std::env::var(KAKAO_API_KEY_ENV_VAR)
            .map_err(|_| DirectionsError::MissingApiKey(KAKAO_API_KEY_ENV_VAR))?;

        Ok(Self {
            api_key,
            timeout: Duration::from_secs(10),
        })
    }
}

/// Car directions from the Kakao Mobility navigation API.
pub struct KakaoMobilityClient {
    params: KakaoMobilityClientParams,
    client: reqwest::Client,
}

impl KakaoMobilityClient {
    pub fn new(params: KakaoMobilityClientParams) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;
        Ok(Self { params, client })
    }

    /// Travel duration in seconds.
    pub async fn fetch_duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<f64, DirectionsError> {
        let route = self.fetch_route(from, to).await?;

        route
            .summary
            .map(|summary| summary.duration)
            .ok_or(DirectionsError::NoRoute {
                code: route.result_code,
                message: "missing route summary".to_owned(),
            })
    }

    pub async fn fetch_path(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<Vec<LatLng>, DirectionsError> {
        let route = self.fetch_route(from, to).await?;

        let path = route
            .sections
            .iter()
            .flat_map(|section| section.roads.iter())
            .flat_map(|road| road.vertexes.chunks_exact(2))
            .map(|pair| LatLng {
                lat: pair[1],
                lng: pair[0],
            })
            .collect();

        Ok(path)
    }

    async fn fetch_route(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<DirectionsRoute, DirectionsError> {
        let origin = format!("{},{}", from.x(), from.y());
        let destination = format!("{},{}", to.x(), to.y());

        let response = self
            .client
            .get(KAKAO_DIRECTIONS_API_URL)
            .header("Authorization", format!("KakaoAK {}", self.params.api_key))
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api { status, message });
        }

        let body: DirectionsResponse = response.json().await?;
        debug!("KakaoMobility: directions {} -> {}", origin, destination);

        let route = body.routes.into_iter().next().ok_or(DirectionsError::NoRoute {
            code: -1,
            message: "empty route list".to_owned(),
        })?;

        if route.result_code != 0 {
            return Err(DirectionsError::NoRoute {
                code: route.result_code,
                message: route.result_msg,
            });
        }

        Ok(route)
    }
}
