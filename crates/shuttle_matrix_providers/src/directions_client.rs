use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    as_the_crow_flies::AsTheCrowFlies,
    duration_provider::{DurationProvider, Minutes, ProviderError, minutes_from_seconds},
    geometry_provider::{GeometryProvider, LatLng},
    kakao_api::{KakaoMobilityClient, KakaoMobilityClientParams},
};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectionsProvider {
    /// https://developers.kakaomobility.com/docs/navi-api/directions/
    KakaoMobility,
    AsTheCrowFlies { speed_kmh: f64 },
}

/// Dispatches duration and geometry lookups to the configured provider.
pub struct DirectionsClient {
    provider: DirectionsProvider,
    kakao_client: Option<KakaoMobilityClient>,
}

impl DirectionsClient {
    /// Builds a client, reading `KAKAO_API_KEY` when the Kakao provider is selected.
    pub fn from_env(provider: DirectionsProvider) -> Result<Self, ProviderError> {
        let kakao_client = match provider {
            DirectionsProvider::KakaoMobility => Some(KakaoMobilityClient::new(
                KakaoMobilityClientParams::from_env()?,
            )?),
            DirectionsProvider::AsTheCrowFlies { .. } => None,
        };

        Ok(Self {
            provider,
            kakao_client,
        })
    }

    pub fn provider(&self) -> DirectionsProvider {
        self.provider
    }

    fn kakao(&self) -> Result<&KakaoMobilityClient, ProviderError> {
        self.kakao_client
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("kakao mobility client".to_owned()))
    }
}

impl DurationProvider for DirectionsClient {
    async fn duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<Minutes, ProviderError> {
        match self.provider {
            DirectionsProvider::KakaoMobility => {
                let seconds = self.kakao()?.fetch_duration(from, to).await?;
                Ok(minutes_from_seconds(seconds))
            }
            DirectionsProvider::AsTheCrowFlies { speed_kmh } => {
                AsTheCrowFlies::new(speed_kmh).duration(from, to).await
            }
        }
    }
}

impl GeometryProvider for DirectionsClient {
    async fn detailed_path(&self, from: geo_types::Point, to: geo_types::Point) -> Vec<LatLng> {
        if from == to {
            return Vec::new();
        }

        match self.provider {
            DirectionsProvider::KakaoMobility => {
                let client = match self.kakao() {
                    Ok(client) => client,
                    Err(error) => {
                        warn!("Geometry lookup skipped: {error}");
                        return Vec::new();
                    }
                };

                client.fetch_path(from, to).await.unwrap_or_else(|error| {
                    warn!("Geometry lookup failed: {error}");
                    Vec::new()
                })
            }
            DirectionsProvider::AsTheCrowFlies { speed_kmh } => {
                AsTheCrowFlies::new(speed_kmh).detailed_path(from, to).await
            }
        }
    }
}
