use std::path::PathBuf;

use clap::Args;
use shuttle_optimizer::reoptimize::locked_route::LockedRouteRequest;
use tracing::info;

use crate::{
    args::{EngineArgs, RequestArgs},
    catalog::CsvStopDataProvider,
    output, summary,
};

#[derive(Args)]
pub struct ReoptimizeArgs {
    /// JSON file with the locked routes, see `shuttle schema locked-routes`
    #[arg(short, long)]
    locked: PathBuf,

    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Solution JSON file, printed to stdout when omitted
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub async fn run(args: ReoptimizeArgs) -> anyhow::Result<()> {
    let locked: Vec<LockedRouteRequest> = output::read_json(&args.locked)?;
    info!("Read {} locked routes", locked.len());

    let catalog = CsvStopDataProvider::from_env()?;
    let optimizer = args.engine.build_optimizer()?;

    let solution = optimizer
        .reoptimize(&catalog, &locked, &args.request.to_request())
        .await?;

    eprintln!("{}", summary::solution_table(&solution));
    output::write_json(&solution, args.out.as_deref())
}
