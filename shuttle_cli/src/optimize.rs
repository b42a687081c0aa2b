use std::path::PathBuf;

use clap::Args;

use crate::{
    args::{EngineArgs, RequestArgs},
    catalog::CsvStopDataProvider,
    output, summary,
};

#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Solution JSON file, printed to stdout when omitted
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let catalog = CsvStopDataProvider::from_env()?;
    let optimizer = args.engine.build_optimizer()?;

    let solution = optimizer
        .optimize(&catalog, &args.request.to_request())
        .await?;

    eprintln!("{}", summary::solution_table(&solution));
    output::write_json(&solution, args.out.as_deref())
}
