use fxhash::FxHashMap;
use futures::StreamExt;
use shuttle_matrix_providers::{
    cache::{DurationCache, DurationMap, cache_key},
    duration_provider::{DurationProvider, Minutes},
};
use tracing::{Level, debug, info, instrument, warn};

use crate::{
    matrix::{penalty::apply_u_turn_penalty, time_matrix::TimeMatrix},
    params::MatrixParams,
    problem::virtual_stop::{NodeIdx, VirtualStop},
};

const PROGRESS_LOG_INTERVAL: usize = 100;

/// Resolves travel durations through the cache first and the provider second.
///
/// Fresh durations are written once per build with a single cache merge.
pub struct MatrixBuilder<C, P> {
    cache: C,
    provider: P,
    params: MatrixParams,
}

struct PendingLookup {
    from: geo_types::Point,
    to: geo_types::Point,
    positions: Vec<usize>,
}

impl<C, P> MatrixBuilder<C, P>
where
    C: DurationCache,
    P: DurationProvider,
{
    pub fn new(cache: C, provider: P, params: MatrixParams) -> Self {
        Self {
            cache,
            provider,
            params,
        }
    }

    pub fn params(&self) -> &MatrixParams {
        &self.params
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Builds the penalized matrix for `stops`. Never fails: pairs that cannot
    /// be resolved get the unknown duration.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub async fn build(&self, stops: &[VirtualStop]) -> TimeMatrix {
        let size = stops.len();
        let mut legs = Vec::with_capacity(size * size.saturating_sub(1));
        for (i, from) in stops.iter().enumerate() {
            for (j, to) in stops.iter().enumerate() {
                if i != j {
                    legs.push((from.point(), to.point()));
                }
            }
        }

        let durations = self.resolve(&legs).await;

        let mut matrix = TimeMatrix::zeros(size);
        let mut unknown = 0;
        let mut durations = durations.into_iter();
        for i in 0..size {
            for j in 0..size {
                if i == j {
                    continue;
                }

                let minutes = match durations.next().flatten() {
                    Some(minutes) => minutes,
                    None => {
                        unknown += 1;
                        self.params.unknown_duration
                    }
                };

                matrix.set(NodeIdx::new(i), NodeIdx::new(j), minutes);
            }
        }

        if unknown > 0 {
            warn!(
                "Time matrix degraded: {} of {} pairs have no duration and use {} minutes",
                unknown,
                legs.len(),
                self.params.unknown_duration
            );
        }

        let penalized = apply_u_turn_penalty(&mut matrix, stops, &self.params);
        info!(
            "Built {}x{} time matrix ({} U-turn penalties)",
            size, size, penalized
        );

        matrix
    }

    /// Raw durations for arbitrary legs, aligned with `legs`. `None` means the
    /// lookup failed.
    pub async fn leg_durations(
        &self,
        legs: &[(geo_types::Point, geo_types::Point)],
    ) -> Vec<Option<Minutes>> {
        self.resolve(legs).await
    }

    async fn resolve(
        &self,
        legs: &[(geo_types::Point, geo_types::Point)],
    ) -> Vec<Option<Minutes>> {
        let cached = self.cache.load().unwrap_or_else(|error| {
            warn!("Duration cache unreadable, starting empty: {error}");
            DurationMap::default()
        });

        let mut durations = vec![None; legs.len()];
        let mut pending: FxHashMap<String, PendingLookup> = FxHashMap::default();

        for (position, &(from, to)) in legs.iter().enumerate() {
            if from == to {
                durations[position] = Some(0);
                continue;
            }

            let key = cache_key(from, to);
            if let Some(&minutes) = cached.get(&key) {
                durations[position] = Some(minutes);
            } else {
                pending
                    .entry(key)
                    .or_insert_with(|| PendingLookup {
                        from,
                        to,
                        positions: Vec::new(),
                    })
                    .positions
                    .push(position);
            }
        }

        debug!(
            "{} legs, {} cache hits, {} lookups",
            legs.len(),
            legs.len() - pending.values().map(|p| p.positions.len()).sum::<usize>(),
            pending.len()
        );

        if pending.is_empty() {
            return durations;
        }

        let total = pending.len();
        let provider = &self.provider;
        let mut lookups = futures::stream::iter(pending.into_iter().map(
            |(key, lookup)| async move {
                let result = provider.duration(lookup.from, lookup.to).await;
                (key, lookup, result)
            },
        ))
        .buffer_unordered(self.params.max_concurrent_lookups.max(1));

        let mut fresh = DurationMap::default();
        let mut completed = 0;
        while let Some((key, lookup, result)) = lookups.next().await {
            completed += 1;
            if completed % PROGRESS_LOG_INTERVAL == 0 {
                debug!("Resolved {}/{} lookups", completed, total);
            }

            match result {
                Ok(minutes) => {
                    for &position in &lookup.positions {
                        durations[position] = Some(minutes);
                    }
                    fresh.insert(key, minutes);
                }
                Err(error) => {
                    warn!("Duration lookup {key} failed, using unknown duration: {error}");
                }
            }
        }

        if !fresh.is_empty() {
            if let Err(error) = self.cache.merge(&fresh) {
                warn!("Failed to persist {} durations: {error}", fresh.len());
            }
        }

        durations
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shuttle_matrix_providers::cache::InMemoryDurationCache;

    use super::*;
    use crate::{
        matrix::time_matrix::UNKNOWN_DURATION,
        test_utils::{CountingProvider, create_stop_at},
    };

    fn stops() -> Vec<VirtualStop> {
        vec![
            create_stop_at("DEPOT_0", 0, 37.50, 127.00),
            create_stop_at("ST_1", 4, 37.51, 127.01),
            create_stop_at("ST_2", 6, 37.52, 127.02),
        ]
    }

    #[tokio::test]
    async fn test_build_uses_provider_then_cache() {
        let provider = Arc::new(CountingProvider::constant(7));
        let builder = MatrixBuilder::new(
            InMemoryDurationCache::default(),
            Arc::clone(&provider),
            MatrixParams::default(),
        );

        let matrix = builder.build(&stops()).await;
        assert_eq!(provider.calls(), 6);
        assert_eq!(builder.cache().len(), 6);
        for i in 0..3 {
            assert_eq!(matrix.get(NodeIdx::new(i), NodeIdx::new(i)), 0);
        }
        assert_eq!(matrix.get(NodeIdx::new(1), NodeIdx::new(2)), 7);

        let warm = builder.build(&stops()).await;
        assert_eq!(provider.calls(), 6);
        assert_eq!(warm, matrix);
    }

    #[tokio::test]
    async fn test_colocated_parts_skip_provider() {
        let provider = Arc::new(CountingProvider::constant(5));
        let builder = MatrixBuilder::new(
            InMemoryDurationCache::default(),
            Arc::clone(&provider),
            MatrixParams::default(),
        );
        let stops = vec![
            create_stop_at("DEPOT_0", 0, 37.50, 127.00),
            create_stop_at("ST_1", 10, 37.51, 127.01),
            create_stop_at("ST_1", 10, 37.51, 127.01),
        ];

        let matrix = builder.build(&stops).await;

        assert_eq!(matrix.get(NodeIdx::new(1), NodeIdx::new(2)), 0);
        assert_eq!(matrix.get(NodeIdx::new(2), NodeIdx::new(1)), 0);
        // Both parts share the same keys towards and from the depot.
        assert_eq!(provider.calls(), 2);
        assert_eq!(matrix.get(NodeIdx::new(0), NodeIdx::new(2)), 5);
    }

    #[tokio::test]
    async fn test_failed_lookups_use_sentinel_and_are_not_cached() {
        let provider = Arc::new(CountingProvider::failing());
        let builder = MatrixBuilder::new(
            InMemoryDurationCache::default(),
            Arc::clone(&provider),
            MatrixParams::default(),
        );

        let matrix = builder.build(&stops()).await;

        assert_eq!(matrix.get(NodeIdx::new(0), NodeIdx::new(1)), UNKNOWN_DURATION);
        assert_eq!(matrix.get(NodeIdx::new(1), NodeIdx::new(1)), 0);
        assert!(builder.cache().is_empty());

        builder.build(&stops()).await;
        assert_eq!(provider.calls(), 12);
    }

    #[tokio::test]
    async fn test_leg_durations_are_not_penalized() {
        // About 111 m in 5 minutes would be flagged as a U-turn in a matrix.
        let provider = Arc::new(CountingProvider::constant(5));
        let builder = MatrixBuilder::new(
            InMemoryDurationCache::default(),
            Arc::clone(&provider),
            MatrixParams::default(),
        );
        let a = geo_types::Point::new(127.0, 37.0);
        let b = geo_types::Point::new(127.0, 37.001);

        let durations = builder.leg_durations(&[(a, b), (b, b)]).await;

        assert_eq!(durations, vec![Some(5), Some(0)]);
    }

    #[tokio::test]
    async fn test_builders_sharing_a_cache_keep_both_writes() {
        let cache = Arc::new(InMemoryDurationCache::default());
        let morning = MatrixBuilder::new(
            Arc::clone(&cache),
            Arc::new(CountingProvider::constant(5)),
            MatrixParams::default(),
        );
        let evening = MatrixBuilder::new(
            Arc::clone(&cache),
            Arc::new(CountingProvider::constant(8)),
            MatrixParams::default(),
        );
        let other_stops = vec![
            create_stop_at("DEPOT_1", 0, 37.60, 127.10),
            create_stop_at("ST_9", 3, 37.61, 127.11),
        ];

        let stops = stops();
        futures::join!(morning.build(&stops), evening.build(&other_stops));

        assert_eq!(cache.len(), 6 + 2);
    }
}
