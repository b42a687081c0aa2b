use shuttle_matrix_providers::duration_provider::Minutes;

use crate::{
    colors::route_colors,
    problem::virtual_stop::VirtualStop,
    solution::{bus_route::BusRoute, route_solution::RouteSolution, stop_visit::StopVisit},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVisit {
    pub stop: VirtualStop,
    /// Travel from the previous visit, or from the depot for the first one.
    pub travel: Minutes,
    /// Passengers on board when the bus arrives, before boarding.
    pub load: i64,
}

/// Untimed route: ordered visits with the travel between them.
///
/// Arrival times are only known once the route is anchored to a deadline,
/// see [`schedule_routes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    depot: VirtualStop,
    visits: Vec<PlannedVisit>,
    return_travel: Minutes,
    final_load: i64,
}

impl Itinerary {
    pub fn new(depot: VirtualStop) -> Self {
        Self {
            depot,
            visits: Vec::new(),
            return_travel: 0,
            final_load: 0,
        }
    }

    pub fn push_visit(&mut self, stop: VirtualStop, travel: Minutes, load: i64) {
        self.final_load = load + stop.demand();
        self.visits.push(PlannedVisit { stop, travel, load });
    }

    pub fn set_return(&mut self, travel: Minutes, final_load: i64) {
        self.return_travel = travel;
        self.final_load = final_load;
    }

    pub fn visits(&self) -> &[PlannedVisit] {
        &self.visits
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn total_duration(&self) -> Minutes {
        self.visits.iter().map(|visit| visit.travel).sum::<Minutes>() + self.return_travel
    }

    pub fn final_load(&self) -> i64 {
        self.final_load
    }

    /// Times the route backwards from `deadline`, the arrival at the depot.
    pub fn schedule(self, bus_id: usize, deadline: Minutes, color: String) -> BusRoute {
        let total_duration = self.total_duration();
        let mut time = deadline - total_duration;

        let mut visits: Vec<StopVisit> = self
            .visits
            .into_iter()
            .map(|visit| {
                time += visit.travel;
                StopVisit {
                    stop: visit.stop,
                    arrival_time: time,
                    load: visit.load,
                }
            })
            .collect();

        visits.push(StopVisit {
            stop: self.depot,
            arrival_time: deadline,
            load: self.final_load,
        });

        BusRoute {
            bus_id,
            visits,
            total_duration,
            final_load: self.final_load,
            color,
            geometry: Vec::new(),
        }
    }
}

/// Numbers routes from 1 in order, colors them and times them against the
/// shared deadline.
pub fn schedule_routes(itineraries: Vec<Itinerary>, deadline: Minutes) -> RouteSolution {
    let colors = route_colors(itineraries.len());

    let routes: Vec<BusRoute> = itineraries
        .into_iter()
        .zip(colors)
        .enumerate()
        .map(|(index, (itinerary, color))| itinerary.schedule(index + 1, deadline, color))
        .collect();

    RouteSolution {
        used_buses: routes.len(),
        routes,
        objective: None,
    }
}
