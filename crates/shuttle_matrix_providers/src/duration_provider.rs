use std::{future::Future, sync::Arc};

use thiserror::Error;

use crate::kakao_api::DirectionsError;

/// Travel durations are expressed in whole minutes.
pub type Minutes = i64;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("directions lookup failed: {0}")]
    Directions(#[from] DirectionsError),

    #[error("no route between {from:?} and {to:?}")]
    NoRoute {
        from: geo_types::Point,
        to: geo_types::Point,
    },

    #[error("provider is not configured: {0}")]
    NotConfigured(String),
}

/// Point-to-point duration lookup.
///
/// Implementations return the duration rounded up to the next minute, never
/// less than one minute for distinct points.
pub trait DurationProvider: Send + Sync {
    fn duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> impl Future<Output = Result<Minutes, ProviderError>> + Send;
}

impl<T> DurationProvider for Arc<T>
where
    T: DurationProvider,
{
    fn duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> impl Future<Output = Result<Minutes, ProviderError>> + Send {
        self.as_ref().duration(from, to)
    }
}

pub fn minutes_from_seconds(seconds: f64) -> Minutes {
    ((seconds / 60.0).ceil() as Minutes).max(1)
}
