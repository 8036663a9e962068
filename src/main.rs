use clap::Parser;
use std::process::ExitCode;
use tessera::cli::{self, Args};
use tessera::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config_file = args.config_file();

    let _guard = match logging::init(&args.command, config_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {:?}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
