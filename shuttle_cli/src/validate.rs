use std::path::PathBuf;

use clap::Args;
use shuttle_optimizer::reoptimize::locked_route::LockedRouteRequest;

use crate::{args::EngineArgs, catalog::CsvStopDataProvider, output, summary};

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file with a single locked route
    #[arg(short, long)]
    route: PathBuf,

    #[arg(short, long)]
    source: String,

    #[arg(short, long)]
    capacity: i64,

    #[command(flatten)]
    engine: EngineArgs,
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let route: LockedRouteRequest = output::read_json(&args.route)?;

    let catalog = CsvStopDataProvider::from_env()?;
    let optimizer = args.engine.build_optimizer()?;

    let validation = optimizer
        .validate(&catalog, &route, args.capacity, &args.source)
        .await?;

    eprintln!("{}", summary::validation_table(&validation));
    output::write_json(&validation, None)
}
