pub mod bus_route;
pub mod itinerary;
pub mod route_solution;
pub mod stop_visit;
