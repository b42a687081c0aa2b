use tracing::debug;

use crate::problem::{
    configuration_error::ConfigurationError, physical_stop::PhysicalStop,
    virtual_stop::VirtualStop,
};

/// Splits every physical stop whose demand exceeds `capacity` into parts that
/// each fit in a single vehicle.
///
/// The first stop is the depot. Order is preserved and parts of the same stop
/// are adjacent.
pub fn split_stops(
    stops: &[PhysicalStop],
    capacity: i64,
) -> Result<Vec<VirtualStop>, ConfigurationError> {
    if capacity <= 0 {
        return Err(ConfigurationError::InvalidCapacity(capacity));
    }

    let depot = stops.first().ok_or(ConfigurationError::EmptyCatalog)?;
    if depot.demand != 0 {
        return Err(ConfigurationError::DepotDemand {
            id: depot.id.clone(),
            demand: depot.demand,
        });
    }

    let mut virtual_stops = Vec::with_capacity(stops.len());

    for stop in stops {
        if stop.demand < 0 {
            return Err(ConfigurationError::NegativeDemand {
                id: stop.id.clone(),
                demand: stop.demand,
            });
        }

        if stop.demand <= capacity {
            virtual_stops.push(VirtualStop::whole(stop));
            continue;
        }

        let mut remaining = stop.demand;
        let mut split_index = 1;
        while remaining > 0 {
            let demand = remaining.min(capacity);
            virtual_stops.push(VirtualStop::part(stop, split_index, demand));
            remaining -= demand;
            split_index += 1;
        }

        debug!(
            "Split stop {} (demand {}) into {} parts",
            stop.id,
            stop.demand,
            split_index - 1
        );
    }

    Ok(virtual_stops)
}
