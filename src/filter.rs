//! Turns user supplied filters into the tracker's query string.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{info_time, Error, Result, PAGE_SIZE};

/// Job type as the tracker encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    Internship,
    PartTime,
    FullTime,
}

impl JobType {
    pub const LABELS: [&'static str; 3] = ["internship", "part-time", "full-time"];

    pub fn code(self) -> u8 {
        match self {
            JobType::Internship => 1,
            // Observed in the tracker UI. Full-time is inferred from the gap and hasn't been
            // confirmed against the API.
            JobType::FullTime => 2,
            JobType::PartTime => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobType::Internship => "internship",
            JobType::PartTime => "part-time",
            JobType::FullTime => "full-time",
        }
    }
}

impl FromStr for JobType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "internship" => Ok(JobType::Internship),
            "part-time" => Ok(JobType::PartTime),
            "full-time" => Ok(JobType::FullTime),
            _ => Err(Error::InvalidFilter {
                filter: "job type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Application status as the tracker encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Applied,
    Saved,
    Screen,
    Interview,
    Offer,
    Withdrawn,
    Ghosted,
    Rejected,
    Accepted,
}

impl Status {
    pub const LABELS: [&'static str; 9] = [
        "applied",
        "saved",
        "screen",
        "interview",
        "offer",
        "withdrawn",
        "ghosted",
        "rejected",
        "accepted",
    ];

    pub fn code(self) -> u8 {
        match self {
            Status::Saved => 1,
            Status::Applied => 2,
            Status::Screen => 11,
            Status::Interview => 12,
            Status::Offer => 13,
            Status::Withdrawn => 21,
            Status::Ghosted => 22,
            Status::Rejected => 23,
            Status::Accepted => 24,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Applied => "applied",
            Status::Saved => "saved",
            Status::Screen => "screen",
            Status::Interview => "interview",
            Status::Offer => "offer",
            Status::Withdrawn => "withdrawn",
            Status::Ghosted => "ghosted",
            Status::Rejected => "rejected",
            Status::Accepted => "accepted",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let status = match s.to_lowercase().as_str() {
            "applied" => Status::Applied,
            "saved" => Status::Saved,
            "screen" => Status::Screen,
            "interview" => Status::Interview,
            "offer" => Status::Offer,
            "withdrawn" => Status::Withdrawn,
            "ghosted" => Status::Ghosted,
            "rejected" => Status::Rejected,
            "accepted" => Status::Accepted,
            _ => {
                return Err(Error::InvalidFilter {
                    filter: "status",
                    value: s.to_string(),
                })
            }
        };
        Ok(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Query string sent with every tracker request.
/// Only `page` changes between the requests of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameters {
    pub size: u32,
    pub value: String,
    pub archived: bool,
    pub page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_applied_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_applied_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            size: PAGE_SIZE,
            value: String::new(),
            archived: false,
            page: 0,
            date_applied_after: None,
            date_applied_before: None,
            job_type: None,
            status: None,
        }
    }
}

impl QueryParameters {
    pub fn has_filters(&self) -> bool {
        self.date_applied_after.is_some()
            || self.date_applied_before.is_some()
            || self.job_type.is_some()
            || self.status.is_some()
    }
}

/// Raw filter input, labels and dates as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub after: Option<String>,
    pub before: Option<String>,
    pub job_type: Option<String>,
    pub status: Option<String>,
    pub fetch_all: bool,
}

impl Filters {
    /// Validates the filters and encodes them. `fetch_all` drops every filter.
    pub fn build(&self) -> Result<QueryParameters> {
        let mut params = QueryParameters::default();
        if self.fetch_all {
            info_time!("Fetching all data without filters...");
            return Ok(params);
        }

        if let Some(after) = &self.after {
            check_date("after", after)?;
            params.date_applied_after = Some(format!("{after}T00:00:00.000Z"));
        }
        if let Some(before) = &self.before {
            check_date("before", before)?;
            params.date_applied_before = Some(format!("{before}T23:59:59.999Z"));
        }
        if let Some(label) = &self.job_type {
            let job_type: JobType = label.parse()?;
            params.job_type = Some(job_type.code());
            info_time!("Filtering by job_type: {} (job_type={})", job_type, job_type.code());
        }
        if let Some(label) = &self.status {
            let status: Status = label.parse()?;
            params.status = Some(status.code());
            info_time!("Filtering by status: {} (status={})", status, status.code());
        }

        Ok(params)
    }
}

#[inline]
fn check_date(filter: &'static str, date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| Error::InvalidFilter {
            filter,
            value: date.to_string(),
        })
}
