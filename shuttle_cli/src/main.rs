use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{
    optimize::OptimizeArgs, reoptimize::ReoptimizeArgs, schema::SchemaKind, stops::StopsArgs,
    validate::ValidateArgs,
};

mod args;
mod catalog;
mod optimize;
mod output;
mod parsers;
mod reoptimize;
mod schema;
mod stops;
mod summary;
mod validate;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plans routes for every stop of a catalog
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Keeps the given routes and plans the remaining stops
    Reoptimize {
        #[command(flatten)]
        args: ReoptimizeArgs,
    },
    /// Checks load and travel time of a hand-edited route
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },
    /// Lists the physical stops of a catalog
    Stops {
        #[command(flatten)]
        args: StopsArgs,
    },
    /// Prints the JSON schema of an input or output format
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize { args } => optimize::run(args).await?,
        Commands::Reoptimize { args } => reoptimize::run(args).await?,
        Commands::Validate { args } => validate::run(args).await?,
        Commands::Stops { args } => stops::run(args)?,
        Commands::Schema { kind } => schema::run(kind)?,
    }

    Ok(())
}
