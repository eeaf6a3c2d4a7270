use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, ORIGIN};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{info_time, warn_time, Error, Result, SAMPLE_CONFIG_NAME};

const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Session secrets copied out of a logged-in browser.
/// Neither is checked here, a bad pair shows up as a failed first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub cookie: String,
    #[serde(default, rename = "x-csrf-token")]
    pub csrf_token: String,
}

impl Credentials {
    pub fn new(cookie: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Reads the credentials file.
    /// If it doesn't exist a sample is written next to it (unless one is already there)
    /// and `Error::ConfigMissing` is returned.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                write_sample(path).await?;
                return Err(Error::ConfigMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw).map_err(|e| Error::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The fixed header set every tracker request carries, with the secrets merged in.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://simplify.jobs"));
        headers.insert(COOKIE, header_value("cookie", &self.cookie)?);
        headers.insert(CSRF_HEADER, header_value("x-csrf-token", &self.csrf_token)?);
        Ok(headers)
    }

    fn placeholder() -> Self {
        Self::new(
            "YOUR_AUTHORIZATION_AND_CSRF_TOKEN_HERE",
            "YOUR_X_CSRF_TOKEN_HERE",
        )
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.to_string()))
}

/// Where the sample template goes for a given config path.
pub fn sample_path(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) => dir.join(SAMPLE_CONFIG_NAME),
        None => PathBuf::from(SAMPLE_CONFIG_NAME),
    }
}

async fn write_sample(config_path: &Path) -> Result<()> {
    let sample = sample_path(config_path);
    if fs::try_exists(&sample).await? {
        warn_time!("{} not found, see {}", config_path.display(), sample.display());
        return Ok(());
    }

    let body = serde_json::to_string_pretty(&Credentials::placeholder())?;
    fs::write(&sample, body).await?;
    info_time!(
        "Generated {}. Fill it with your credentials and save it as {}.",
        sample.display(),
        config_path.display()
    );
    Ok(())
}

/// Everything one run needs, built by the caller and owned by that run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub endpoint: String,
    pub config_path: PathBuf,
    pub output_path: PathBuf,
    pub page_delay: Duration,
}
