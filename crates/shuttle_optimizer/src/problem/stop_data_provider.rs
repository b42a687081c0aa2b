use fxhash::FxHashMap;

use crate::problem::{physical_stop::PhysicalStop, split::split_stops, virtual_stop::VirtualStop};

/// Source of stop catalogs. The first stop of a catalog is the depot.
pub trait StopDataProvider: Send + Sync {
    fn physical_stops(&self, source_id: &str) -> anyhow::Result<Vec<PhysicalStop>>;

    fn virtual_stops(&self, capacity: i64, source_id: &str) -> anyhow::Result<Vec<VirtualStop>> {
        let stops = self.physical_stops(source_id)?;
        Ok(split_stops(&stops, capacity)?)
    }
}

/// Catalogs held in memory, keyed by source id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStopDataProvider {
    catalogs: FxHashMap<String, Vec<PhysicalStop>>,
}

impl InMemoryStopDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source_id: impl Into<String>, stops: Vec<PhysicalStop>) -> &mut Self {
        self.catalogs.insert(source_id.into(), stops);
        self
    }
}

impl StopDataProvider for InMemoryStopDataProvider {
    fn physical_stops(&self, source_id: &str) -> anyhow::Result<Vec<PhysicalStop>> {
        self.catalogs
            .get(source_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown stop source {source_id}"))
    }
}
