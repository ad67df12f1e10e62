use clap::Parser;
use fetchpool_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    let debug = cli.debug_logging();
    if logging::init_logging(debug).is_err() {
        logging::init_logging_stderr(debug);
    }

    if let Err(err) = cli.run().await {
        eprintln!("fetchpool error: {:#}", err);
        std::process::exit(1);
    }
}
