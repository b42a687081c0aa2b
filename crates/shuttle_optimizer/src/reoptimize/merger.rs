use fxhash::FxHashSet;
use shuttle_matrix_providers::duration_provider::Minutes;
use tracing::warn;

use crate::{
    problem::virtual_stop::VirtualStop,
    reoptimize::locked_route::LockedRouteRequest,
    solution::{
        itinerary::{Itinerary, schedule_routes},
        route_solution::RouteSolution,
    },
};

/// Keeps the first occurrence of every stop across the locked routes. Later
/// occurrences are dropped with a warning. The depot may appear anywhere.
pub fn dedupe_locked_stops(
    locked_routes: &[LockedRouteRequest],
    depot_id: &str,
) -> Vec<LockedRouteRequest> {
    let mut seen = FxHashSet::default();

    locked_routes
        .iter()
        .map(|route| {
            let stops = route
                .stops
                .iter()
                .filter(|key| {
                    if key.original_id == depot_id || seen.insert((*key).clone()) {
                        return true;
                    }

                    warn!("Locked bus {}: stop {} is already locked, dropped", route.bus_id, key);
                    false
                })
                .cloned()
                .collect();

            LockedRouteRequest {
                bus_id: route.bus_id,
                stops,
            }
        })
        .collect()
}

/// Physical stop ids referenced by any locked route.
pub fn locked_stop_ids(locked_routes: &[LockedRouteRequest]) -> FxHashSet<String> {
    locked_routes
        .iter()
        .flat_map(|route| route.stops.iter())
        .map(|key| key.original_id.clone())
        .collect()
}

/// Catalog stops left for the solver: the depot plus every stop whose
/// physical stop is not locked. All parts of a locked physical stop go away.
pub fn free_stops(catalog: &[VirtualStop], locked_ids: &FxHashSet<String>) -> Vec<VirtualStop> {
    let Some((depot, stops)) = catalog.split_first() else {
        return Vec::new();
    };

    std::iter::once(depot)
        .chain(
            stops
                .iter()
                .filter(|stop| stop.original_id() != depot.original_id())
                .filter(|stop| !locked_ids.contains(stop.original_id())),
        )
        .cloned()
        .collect()
}

/// Locked routes first, in request order, then the solved ones. Every route
/// is renumbered, recolored and timed against the shared deadline.
pub fn merge_itineraries(
    locked: Vec<Itinerary>,
    solved: Vec<Itinerary>,
    deadline: Minutes,
) -> RouteSolution {
    let itineraries: Vec<Itinerary> = locked.into_iter().chain(solved).collect();
    schedule_routes(itineraries, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{problem::stop_key::StopKey, test_utils::create_stop_at};

    fn catalog() -> Vec<VirtualStop> {
        vec![
            create_stop_at("DEPOT_0", 0, 37.50, 127.00),
            create_stop_at("ST_1", 10, 37.51, 127.01),
            create_stop_at("ST_1", 3, 37.51, 127.01),
            create_stop_at("ST_2", 5, 37.52, 127.02),
            create_stop_at("ST_3", 5, 37.53, 127.03),
        ]
    }

    #[test]
    fn test_free_stops() {
        let locked = vec![LockedRouteRequest {
            bus_id: 1,
            stops: vec![
                StopKey::unsplit("DEPOT_0"),
                StopKey::new("ST_1", Some(1)),
                StopKey::unsplit("ST_3"),
            ],
        }];

        let locked_ids = locked_stop_ids(&locked);
        let free = free_stops(&catalog(), &locked_ids);

        let ids: Vec<&str> = free.iter().map(|stop| stop.original_id()).collect();
        assert_eq!(ids, vec!["DEPOT_0", "ST_2"]);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let locked = vec![
            LockedRouteRequest {
                bus_id: 1,
                stops: vec![StopKey::unsplit("DEPOT_0"), StopKey::unsplit("ST_2")],
            },
            LockedRouteRequest {
                bus_id: 2,
                stops: vec![
                    StopKey::unsplit("DEPOT_0"),
                    StopKey::unsplit("ST_2"),
                    StopKey::new("ST_1", Some(1)),
                    StopKey::new("ST_1", Some(2)),
                    StopKey::new("ST_1", Some(1)),
                ],
            },
        ];

        let deduped = dedupe_locked_stops(&locked, "DEPOT_0");

        assert_eq!(deduped[0], locked[0]);
        assert_eq!(deduped[1].bus_id, 2);
        assert_eq!(
            deduped[1].stops,
            vec![
                StopKey::unsplit("DEPOT_0"),
                StopKey::new("ST_1", Some(1)),
                StopKey::new("ST_1", Some(2)),
            ]
        );
    }

    #[test]
    fn test_free_stops_without_locks() {
        let free = free_stops(&catalog(), &FxHashSet::default());

        assert_eq!(free, catalog());
        assert!(free_stops(&[], &FxHashSet::default()).is_empty());
    }

    #[test]
    fn test_merge_keeps_locked_first() {
        let depot = create_stop_at("DEPOT_0", 0, 37.50, 127.00);

        let mut locked = Itinerary::new(depot.clone());
        locked.push_visit(create_stop_at("ST_1", 3, 37.51, 127.01), 0, 0);
        locked.set_return(10, 3);

        let mut solved = Itinerary::new(depot);
        solved.push_visit(create_stop_at("ST_2", 5, 37.52, 127.02), 0, 0);
        solved.set_return(4, 5);

        let solution = merge_itineraries(vec![locked], vec![solved], 480);

        assert_eq!(solution.used_buses, 2);
        assert_eq!(solution.routes[0].visits[0].stop.original_id(), "ST_1");
        assert_eq!(solution.routes[0].visits[0].arrival_time, 470);
        assert_eq!(solution.routes[1].bus_id, 2);
        assert_eq!(solution.routes[1].visits[0].arrival_time, 476);
        assert_eq!(solution.objective, None);
    }
}
