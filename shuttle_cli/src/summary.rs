use comfy_table::{Table, presets::UTF8_FULL};
use shuttle_optimizer::{
    problem::physical_stop::PhysicalStop,
    reoptimize::locked_route::RouteValidation,
    solution::{route_solution::RouteSolution, stop_visit::clock_time},
};

pub fn solution_table(solution: &RouteSolution) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Bus", "Departure", "Stops", "Passengers", "Minutes", "Color"]);

    for route in &solution.routes {
        let departure = route
            .departure_time()
            .map(|minutes| clock_time(minutes).strftime("%H:%M").to_string())
            .unwrap_or_default();
        let stops = route
            .stops()
            .iter()
            .map(|visit| visit.stop.name())
            .collect::<Vec<_>>()
            .join(" > ");

        table.add_row(vec![
            route.bus_id.to_string(),
            departure,
            stops,
            route.final_load.to_string(),
            route.total_duration.to_string(),
            route.color.clone(),
        ]);
    }

    table
}

pub fn validation_table(validation: &RouteValidation) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Bus", "Passengers", "Minutes", "Legs", "Status"]);

    let legs = validation
        .legs
        .iter()
        .map(|minutes| minutes.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    table.add_row(vec![
        validation.bus_id.to_string(),
        validation.total_load.to_string(),
        validation.total_time.to_string(),
        legs,
        validation.message.clone(),
    ]);

    table
}

pub fn stops_table(stops: &[PhysicalStop]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "Name", "Passengers", "Lat", "Lon"]);

    for stop in stops {
        table.add_row(vec![
            stop.id.clone(),
            stop.name.clone(),
            stop.demand.to_string(),
            stop.lat.to_string(),
            stop.lon.to_string(),
        ]);
    }

    table
}
