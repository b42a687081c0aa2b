use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{physical_stop::PhysicalStop, stop_key::StopKey},
};

define_index_newtype!(NodeIdx, VirtualStop);

/// A routing node. Either a whole physical stop or one capacity-sized part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VirtualStop {
    original_id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    split_index: Option<u32>,
    demand: i64,
    lat: f64,
    lon: f64,
}

impl VirtualStop {
    pub fn whole(stop: &PhysicalStop) -> Self {
        Self {
            original_id: stop.id.clone(),
            name: stop.name.clone(),
            split_index: None,
            demand: stop.demand,
            lat: stop.lat,
            lon: stop.lon,
        }
    }

    pub fn part(stop: &PhysicalStop, split_index: u32, demand: i64) -> Self {
        Self {
            original_id: stop.id.clone(),
            name: format!("{}-{}", stop.name, split_index),
            split_index: Some(split_index),
            demand,
            lat: stop.lat,
            lon: stop.lon,
        }
    }

    pub fn original_id(&self) -> &str {
        &self.original_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn split_index(&self) -> Option<u32> {
        self.split_index
    }

    pub fn demand(&self) -> i64 {
        self.demand
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn key(&self) -> StopKey {
        StopKey::new(self.original_id.clone(), self.split_index)
    }

    pub fn matches(&self, key: &StopKey) -> bool {
        self.original_id == key.original_id && self.split_index == key.split_index
    }

    pub fn point(&self) -> geo_types::Point {
        geo_types::Point::new(self.lon, self.lat)
    }

    pub fn is_colocated_with(&self, other: &VirtualStop) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

impl From<&VirtualStop> for geo_types::Point {
    fn from(value: &VirtualStop) -> Self {
        value.point()
    }
}
