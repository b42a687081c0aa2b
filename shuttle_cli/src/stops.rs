use std::path::PathBuf;

use clap::Args;
use shuttle_optimizer::problem::{
    physical_stop::PhysicalStop, stop_data_provider::StopDataProvider,
};
use tracing::info;

use crate::{catalog::CsvStopDataProvider, output, summary};

#[derive(Args)]
pub struct StopsArgs {
    /// Stop catalog to list, `{source}.csv` in `SHUTTLE_DATA_FOLDER`
    #[arg(short, long)]
    source: String,

    /// Write the stops to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: StopsArgs) -> anyhow::Result<()> {
    let catalog = CsvStopDataProvider::from_env()?;
    let stops = list_stops(&catalog, &args.source)?;

    eprintln!("{}", summary::stops_table(&stops));
    output::write_json(&stops, args.output.as_deref())
}

/// Physical stops of `source_id`, depot first, as stored in the catalog.
pub fn list_stops(
    catalog: &impl StopDataProvider,
    source_id: &str,
) -> anyhow::Result<Vec<PhysicalStop>> {
    let stops = catalog.physical_stops(source_id)?;
    info!(
        "{} has {} stops and {} passengers",
        source_id,
        stops.len().saturating_sub(1),
        stops.iter().map(|stop| stop.demand).sum::<i64>()
    );

    Ok(stops)
}

#[cfg(test)]
mod tests {
    use shuttle_optimizer::problem::stop_data_provider::InMemoryStopDataProvider;

    use super::*;

    fn catalog() -> InMemoryStopDataProvider {
        let mut catalog = InMemoryStopDataProvider::new();
        catalog.insert(
            "morning",
            vec![
                PhysicalStop::new("DEPOT_0", "Plant", 0, 37.347, 127.1965),
                PhysicalStop::new("ST_1", "North gate", 12, 37.35, 127.20),
            ],
        );
        catalog
    }

    #[test]
    fn test_list_stops_keeps_catalog_order() {
        let stops = list_stops(&catalog(), "morning").unwrap();

        let ids: Vec<&str> = stops.iter().map(|stop| stop.id.as_str()).collect();
        assert_eq!(ids, vec!["DEPOT_0", "ST_1"]);

        let json = serde_json::to_value(&stops).unwrap();
        assert_eq!(json[1]["name"], "North gate");
        assert_eq!(json[1]["demand"], 12);
    }

    #[test]
    fn test_unknown_source() {
        assert!(list_stops(&catalog(), "evening").is_err());
    }
}
