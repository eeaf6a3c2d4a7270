use chrono::Local;
use clap::Parser;
use tracker_fetch::{cli::Cli, info_time, process::run, warn_time};

#[tokio::main]
async fn main() {
    let start_time = Local::now();
    let cli = Cli::parse();

    match run(&cli.run_config(), &cli.filters()).await {
        Ok(outcome) if outcome.is_complete() => {
            info_time!(start_time, "Full program time:");
        }
        Ok(_) => {
            info_time!(start_time, "Full program time:");
            std::process::exit(2);
        }
        Err(e) => {
            warn_time!("Failed to retrieve data: {e}");
            std::process::exit(1);
        }
    }
}
