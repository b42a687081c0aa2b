use std::path::{Path, PathBuf};

use shuttle_optimizer::problem::{
    physical_stop::PhysicalStop, stop_data_provider::StopDataProvider,
};
use thiserror::Error;
use tracing::{info, warn};

const DATA_FOLDER_ENV_VAR: &str = "SHUTTLE_DATA_FOLDER";
const DEPOT_ID: &str = "DEPOT_0";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("stop data folder is not configured: {0}")]
    MissingFolder(#[from] std::env::VarError),

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{0} has no depot line")]
    MissingDepot(PathBuf),
}

/// Stop catalogs stored as `{source_id}.csv` in a folder.
///
/// The first line is the depot as `name,lat,lon`. Every other line is a stop as
/// `name,lat,lon,demand`; fractional demands are rounded.
pub struct CsvStopDataProvider {
    folder: PathBuf,
}

impl CsvStopDataProvider {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn from_env() -> Result<Self, CatalogError> {
        let folder = std::env::var(DATA_FOLDER_ENV_VAR)?;
        Ok(Self::new(folder))
    }

    pub fn catalog_path(&self, source_id: &str) -> PathBuf {
        let path = self.folder.join(source_id);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension("csv")
        }
    }

    fn read_catalog(&self, path: &Path) -> Result<Vec<PhysicalStop>, CatalogError> {
        let csv_error = |source| CatalogError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_error)?;

        let mut records = reader.records();
        let depot = match records.next() {
            Some(record) => record.map_err(csv_error)?,
            None => return Err(CatalogError::MissingDepot(path.to_path_buf())),
        };
        let depot = parse_depot(&depot).ok_or_else(|| CatalogError::MissingDepot(path.to_path_buf()))?;

        let mut stops = vec![depot];
        for record in records {
            let record = record.map_err(csv_error)?;

            match parse_stop(&record, stops.len()) {
                Some(stop) => stops.push(stop),
                None => warn!("Skipping malformed line {:?} in {}", record, path.display()),
            }
        }

        info!(
            "Loaded {} stops and a depot from {}",
            stops.len() - 1,
            path.display()
        );

        Ok(stops)
    }
}

impl StopDataProvider for CsvStopDataProvider {
    fn physical_stops(&self, source_id: &str) -> anyhow::Result<Vec<PhysicalStop>> {
        Ok(self.read_catalog(&self.catalog_path(source_id))?)
    }
}

fn parse_depot(record: &csv::StringRecord) -> Option<PhysicalStop> {
    let name = record.get(0)?;
    let lat = record.get(1)?.parse().ok()?;
    let lon = record.get(2)?.parse().ok()?;

    Some(PhysicalStop::new(DEPOT_ID, name, 0, lat, lon))
}

fn parse_stop(record: &csv::StringRecord, number: usize) -> Option<PhysicalStop> {
    let name = record.get(0)?;
    let lat = record.get(1)?.parse().ok()?;
    let lon = record.get(2)?.parse().ok()?;
    let demand = record.get(3)?.parse::<f64>().ok()?.round() as i64;

    Some(PhysicalStop::new(format!("ST_{number}"), name, demand, lat, lon))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_catalog(name: &str, content: &str) -> CsvStopDataProvider {
        let folder = std::env::temp_dir().join(format!("shuttle_catalog_{name}_{}", std::process::id()));
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(format!("{name}.csv")), content).unwrap();

        CsvStopDataProvider::new(folder)
    }

    #[test]
    fn test_read_catalog() {
        let provider = write_catalog(
            "morning",
            "Plant,37.347,127.1965\n\
             North gate, 37.35, 127.20, 12.6\n\
             broken line\n\
             Station,37.36,127.21,4\n",
        );

        let stops = provider.physical_stops("morning").unwrap();

        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].id, "DEPOT_0");
        assert_eq!(stops[0].name, "Plant");
        assert_eq!(stops[0].demand, 0);
        assert_eq!(stops[1].id, "ST_1");
        assert_eq!(stops[1].name, "North gate");
        assert_eq!(stops[1].demand, 13);
        assert_eq!(stops[2].id, "ST_2");
        assert_eq!(stops[2].demand, 4);
    }

    #[test]
    fn test_source_with_extension() {
        let provider = write_catalog("evening", "Plant,37.347,127.1965\n");

        let stops = provider.physical_stops("evening.csv").unwrap();

        assert_eq!(stops.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let provider = CsvStopDataProvider::new(std::env::temp_dir().join("shuttle_catalog_missing"));

        assert!(provider.physical_stops("nowhere").is_err());
    }

    #[test]
    fn test_empty_file_has_no_depot() {
        let provider = write_catalog("empty", "");

        let error = provider.physical_stops("empty").unwrap_err();

        assert!(matches!(
            error.downcast_ref::<CatalogError>(),
            Some(CatalogError::MissingDepot(_))
        ));
    }
}
