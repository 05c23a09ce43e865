mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_capture, run_extract};
use log::LevelFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Extract { input, walk } => {
            run_extract(&raw_args, args.config, args.verbose, input, walk).await
        }
        Commands::Capture {
            url,
            viewport,
            nav_timeout,
            network_idle_timeout,
            process_timeout,
            walk,
        } => {
            run_capture(
                &raw_args,
                args.config,
                args.verbose,
                url,
                viewport,
                nav_timeout,
                network_idle_timeout,
                process_timeout,
                walk,
            )
            .await
        }
    }
}

/// Logs go to stderr; `RUST_LOG` still wins over the default level.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
