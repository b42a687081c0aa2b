use clap::ValueEnum;
use shuttle_optimizer::{
    problem::optimization_request::OptimizationRequest,
    reoptimize::locked_route::{LockedRouteRequest, RouteValidation},
    solution::route_solution::RouteSolution,
};

use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaKind {
    Request,
    LockedRoutes,
    Solution,
    Validation,
}

pub fn run(kind: SchemaKind) -> anyhow::Result<()> {
    let schema = match kind {
        SchemaKind::Request => schemars::schema_for!(OptimizationRequest),
        SchemaKind::LockedRoutes => schemars::schema_for!(Vec<LockedRouteRequest>),
        SchemaKind::Solution => schemars::schema_for!(RouteSolution),
        SchemaKind::Validation => schemars::schema_for!(RouteValidation),
    };

    output::write_json(&schema, None)
}
