use geo::{Distance, Haversine};
use tracing::debug;

use crate::{
    matrix::time_matrix::TimeMatrix,
    params::MatrixParams,
    problem::virtual_stop::{NodeIdx, VirtualStop},
};

/// Inflates legs that are suspiciously slow for their straight-line distance.
///
/// A short hop that takes a long time usually means the vehicle has to turn
/// around. Cells on the diagonal, zero cells and unknown cells are left alone.
/// Returns the number of penalized cells.
pub fn apply_u_turn_penalty(
    matrix: &mut TimeMatrix,
    stops: &[VirtualStop],
    params: &MatrixParams,
) -> usize {
    let mut penalized = 0;

    for (i, from) in stops.iter().enumerate() {
        for (j, to) in stops.iter().enumerate() {
            if i == j {
                continue;
            }

            let (from_idx, to_idx) = (NodeIdx::new(i), NodeIdx::new(j));
            let minutes = matrix.get(from_idx, to_idx);
            if minutes <= 0 || minutes >= params.unknown_duration {
                continue;
            }

            let meters = Haversine.distance(from.point(), to.point());
            let meters_per_minute = meters / minutes as f64;

            if meters_per_minute < params.u_turn_threshold_meters_per_minute {
                let penalized_minutes = (minutes as f64 * params.u_turn_penalty_factor) as i64;
                matrix.set(from_idx, to_idx, penalized_minutes);
                penalized += 1;

                debug!(
                    "U-turn penalty {} -> {}: {:.0} m in {} min, now {} min",
                    from.name(),
                    to.name(),
                    meters,
                    minutes,
                    penalized_minutes
                );
            }
        }
    }

    penalized
}
