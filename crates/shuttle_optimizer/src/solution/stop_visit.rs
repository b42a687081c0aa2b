use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shuttle_matrix_providers::duration_provider::Minutes;

use crate::problem::virtual_stop::VirtualStop;

const MINUTES_PER_DAY: Minutes = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StopVisit {
    pub stop: VirtualStop,
    /// Minutes since midnight.
    pub arrival_time: Minutes,
    /// Passengers on board when the bus arrives. At the depot, everyone it
    /// collected.
    pub load: i64,
}

impl StopVisit {
    pub fn arrival_clock(&self) -> jiff::civil::Time {
        clock_time(self.arrival_time)
    }
}

/// Wall-clock time of a minute offset, wrapping around midnight.
pub fn clock_time(minutes: Minutes) -> jiff::civil::Time {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    jiff::civil::Time::new((minutes / 60) as i8, (minutes % 60) as i8, 0, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time(540).to_string(), "09:00:00");
        assert_eq!(clock_time(512).to_string(), "08:32:00");
        assert_eq!(clock_time(-30).to_string(), "23:30:00");
    }
}
