use std::path::PathBuf;

use clap::{builder::PossibleValuesParser, Parser};

use crate::config::RunConfig;
use crate::filter::{Filters, JobType, Status};
use crate::{BASE_URL, CONFIG_PATH, OUTPUT_PATH, PAGE_DELAY};

#[derive(Debug, Parser)]
#[command(name = "tracker-fetch")]
#[command(about = "Fetch job tracker data from the Simplify Jobs API.")]
pub struct Cli {
    /// Fetch all data without filters.
    #[arg(long)]
    pub all: bool,

    /// Start date (e.g. 2025-03-01) for date_applied_after.
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// End date (e.g. 2025-03-07) for date_applied_before.
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Job type filter: internship (1), part-time (3), full-time (2).
    #[arg(long, ignore_case = true, value_parser = PossibleValuesParser::new(JobType::LABELS))]
    pub job_type: Option<String>,

    /// Status filter: applied (2), saved (1), screen (11), interview (12), offer (13),
    /// withdrawn (21), ghosted (22), rejected (23), accepted (24).
    #[arg(long, ignore_case = true, value_parser = PossibleValuesParser::new(Status::LABELS))]
    pub status: Option<String>,

    /// Credentials file with `cookie` and `x-csrf-token`.
    #[arg(long, value_name = "PATH", default_value = CONFIG_PATH)]
    pub config: PathBuf,

    /// Where the collected items are written.
    #[arg(long, value_name = "PATH", default_value = OUTPUT_PATH)]
    pub output: PathBuf,

    /// Tracker endpoint.
    #[arg(long, value_name = "URL", default_value = BASE_URL)]
    pub endpoint: String,
}

impl Cli {
    pub fn filters(&self) -> Filters {
        Filters {
            after: self.after.clone(),
            before: self.before.clone(),
            job_type: self.job_type.clone(),
            status: self.status.clone(),
            fetch_all: self.all,
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            endpoint: self.endpoint.clone(),
            config_path: self.config.clone(),
            output_path: self.output.clone(),
            page_delay: PAGE_DELAY,
        }
    }
}
