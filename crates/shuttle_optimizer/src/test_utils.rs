use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use shuttle_matrix_providers::duration_provider::{DurationProvider, Minutes, ProviderError};

use crate::{
    matrix::time_matrix::TimeMatrix,
    problem::{
        physical_stop::PhysicalStop,
        routing_problem::{RoutingProblemInstance, RoutingProblemInstanceBuilder},
        virtual_stop::{NodeIdx, VirtualStop},
    },
    solver::routing_model::RoutingModel,
};

pub fn create_stop_at(id: &str, demand: i64, lat: f64, lon: f64) -> VirtualStop {
    VirtualStop::whole(&PhysicalStop::new(id, id, demand, lat, lon))
}

/// First demand is the depot.
pub fn create_stops(demands: &[i64]) -> Vec<VirtualStop> {
    demands
        .iter()
        .enumerate()
        .map(|(index, &demand)| {
            let id = if index == 0 {
                String::from("DEPOT_0")
            } else {
                format!("ST_{index}")
            };
            let offset = index as f64 * 0.01;
            create_stop_at(&id, demand, 37.5 + offset, 127.0 + offset)
        })
        .collect()
}

pub fn create_time_matrix(rows: Vec<Vec<Minutes>>) -> TimeMatrix {
    TimeMatrix::from_rows(rows)
}

pub fn create_test_problem(
    demands: Vec<i64>,
    rows: Vec<Vec<Minutes>>,
    vehicle_count: usize,
    capacity: i64,
    per_leg_time_limit: Minutes,
    max_service_time: Minutes,
) -> RoutingProblemInstance {
    let mut builder = RoutingProblemInstanceBuilder::default();
    builder
        .set_stops(create_stops(&demands))
        .set_time_matrix(Arc::new(create_time_matrix(rows)))
        .set_fleet(vehicle_count, capacity)
        .set_per_leg_time_limit(per_leg_time_limit)
        .set_max_service_time(max_service_time);

    builder.build().unwrap()
}

/// Asymmetric arc costs, free out of the depot, and a capacity dimension
/// where every stop carries one passenger.
pub fn create_test_model(node_count: usize, vehicle_count: usize, capacity: i64) -> RoutingModel {
    let depot = NodeIdx::new(0);
    let mut model = RoutingModel::new(node_count, vehicle_count, depot);

    model.set_arc_cost_evaluator(move |from, to| {
        if from == depot || from == to {
            0
        } else {
            ((from.get() * 7 + to.get() * 3) % 11 + 1) as i64
        }
    });
    model.add_unary_dimension_with_vehicle_capacity(
        "Capacity",
        move |node| if node == depot { 0 } else { 1 },
        vec![capacity; vehicle_count],
    );

    model
}

pub fn nodes(indices: &[usize]) -> Vec<NodeIdx> {
    indices.iter().copied().map(NodeIdx::new).collect()
}

/// Provider returning a fixed duration, counting how often it is asked.
pub struct CountingProvider {
    minutes: Option<Minutes>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn constant(minutes: Minutes) -> Self {
        Self {
            minutes: Some(minutes),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            minutes: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DurationProvider for CountingProvider {
    async fn duration(
        &self,
        _from: geo_types::Point,
        _to: geo_types::Point,
    ) -> Result<Minutes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.minutes
            .ok_or_else(|| ProviderError::NotConfigured(String::from("failing provider")))
    }
}
