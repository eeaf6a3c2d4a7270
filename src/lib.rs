//! Pulls every application from the Simplify job tracker, page by page,
//! and stores the lot as one JSON document.

mod error;
#[doc(hidden)]
pub mod macros;

pub mod cli;
pub mod config;
pub mod filter;
pub mod paginate;
pub mod process;
pub mod request;

pub use error::{Error, Result};

use std::time::Duration;

pub const BASE_URL: &str = "https://api.simplify.jobs/v2/candidate/me/tracker/";
/// Items requested per page. The API is asked for this many, the last page may hold fewer.
pub const PAGE_SIZE: u32 = 25;
/// Pause between page requests so the API doesn't rate limit us.
pub const PAGE_DELAY: Duration = Duration::from_secs(1);
pub const CONFIG_PATH: &str = "config.json";
pub const SAMPLE_CONFIG_NAME: &str = "config.json.sample";
pub const OUTPUT_PATH: &str = "tracker_data.json";
