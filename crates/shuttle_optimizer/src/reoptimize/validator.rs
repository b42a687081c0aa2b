use shuttle_matrix_providers::{
    cache::DurationCache,
    duration_provider::{DurationProvider, Minutes},
};
use tracing::{Level, debug, instrument, warn};

use crate::{
    matrix::matrix_builder::MatrixBuilder,
    problem::{
        configuration_error::ConfigurationError, stop_key::StopKey, virtual_stop::VirtualStop,
    },
    reoptimize::locked_route::{LockedRouteRequest, RouteValidation},
    solution::itinerary::Itinerary,
};

#[derive(Debug, Clone)]
pub struct ValidatedRoute {
    pub validation: RouteValidation,
    pub itinerary: Itinerary,
}

/// Recomputes load and travel time of a locked route against the catalog.
///
/// `catalog` starts with the depot and an empty one is rejected. Stops missing from the catalog carry no
/// demand and zero-minute legs. Durations are raw provider values without the
/// U-turn penalty.
#[instrument(skip_all, level = Level::DEBUG, fields(bus_id = route.bus_id))]
pub async fn validate_locked_route<C, P>(
    builder: &MatrixBuilder<C, P>,
    catalog: &[VirtualStop],
    route: &LockedRouteRequest,
    capacity: i64,
) -> Result<ValidatedRoute, ConfigurationError>
where
    C: DurationCache,
    P: DurationProvider,
{
    let Some((depot, _)) = catalog.split_first() else {
        warn!("Locked route {}: no depot to validate against", route.bus_id);
        return Err(ConfigurationError::EmptyCatalog);
    };
    let matched: Vec<Option<&VirtualStop>> = route
        .stops
        .iter()
        .map(|key| catalog.iter().find(|stop| stop.matches(key)))
        .collect();
    let is_depot = |key: &StopKey| key.original_id == depot.original_id();

    let unmatched: Vec<_> = route
        .stops
        .iter()
        .zip(&matched)
        .filter(|(_, stop)| stop.is_none())
        .map(|(key, _)| key.clone())
        .collect();
    for key in &unmatched {
        warn!("Locked route {}: stop {} is not in the catalog", route.bus_id, key);
    }

    let mut total_load = 0;
    let mut capacity_ok = true;
    for (key, stop) in route.stops.iter().zip(&matched) {
        if is_depot(key) {
            continue;
        }

        total_load += stop.map_or(0, |stop| stop.demand());
        if total_load > capacity {
            capacity_ok = false;
        }
    }

    // Consecutive legs, then back to the depot unless the route already ends there.
    let mut pairs: Vec<(Option<&VirtualStop>, Option<&VirtualStop>)> = matched
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    let ends_at_depot = route.stops.last().is_none_or(is_depot);
    if !ends_at_depot {
        pairs.push((matched.last().copied().flatten(), Some(depot)));
    }

    let lookups: Vec<_> = pairs
        .iter()
        .filter_map(|pair| match pair {
            (Some(from), Some(to)) => Some((from.point(), to.point())),
            _ => None,
        })
        .collect();
    let mut durations = builder.leg_durations(&lookups).await.into_iter();

    let legs: Vec<Minutes> = pairs
        .iter()
        .map(|pair| match pair {
            (Some(_), Some(_)) => durations
                .next()
                .flatten()
                .unwrap_or(builder.params().unknown_duration),
            _ => 0,
        })
        .collect();
    let total_time = legs.iter().sum();

    let message = if capacity_ok {
        "ok".to_owned()
    } else {
        format!("capacity exceeded: load {total_load} > capacity {capacity}")
    };
    debug!(
        "Locked route {}: load {}, {} min, {}",
        route.bus_id, total_load, total_time, message
    );

    let itinerary = build_itinerary(depot, route, &matched, &legs, is_depot, total_load);

    Ok(ValidatedRoute {
        validation: RouteValidation {
            bus_id: route.bus_id,
            total_load,
            total_time,
            capacity_ok,
            message,
            legs,
            unmatched,
        },
        itinerary,
    })
}

/// Visits are the matched non-depot stops, each with the load on board when
/// the bus arrives. Travel through skipped entries is carried over to the
/// next visit.
fn build_itinerary(
    depot: &VirtualStop,
    route: &LockedRouteRequest,
    matched: &[Option<&VirtualStop>],
    legs: &[Minutes],
    is_depot: impl Fn(&StopKey) -> bool,
    total_load: i64,
) -> Itinerary {
    let mut itinerary = Itinerary::new(depot.clone());
    let mut pending = 0;
    let mut load = 0;

    for (index, (key, stop)) in route.stops.iter().zip(matched).enumerate() {
        if index > 0 {
            pending += legs[index - 1];
        }

        match stop {
            Some(stop) if !is_depot(key) => {
                itinerary.push_visit((*stop).clone(), pending, load);
                load += stop.demand();
                pending = 0;
            }
            _ => {}
        }
    }

    // Trailing leg to the depot, if any.
    let trailing = legs.get(route.stops.len().saturating_sub(1)).copied().unwrap_or(0);
    itinerary.set_return(pending + trailing, total_load);

    itinerary
}
