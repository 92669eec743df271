use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Review status of a submitted resume. Assigned `Pending` when a record is
/// first persisted and mutated only through the review workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "Pending",
            Status::Reviewed => "Reviewed",
            Status::Shortlisted => "Shortlisted",
            Status::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "reviewed" => Ok(Status::Reviewed),
            "shortlisted" => Ok(Status::Shortlisted),
            "rejected" => Ok(Status::Rejected),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

/// One extracted candidate, keyed by email for deduplication.
///
/// Every field except `status` is optional: `None` means the corresponding
/// sub-extractor found nothing. The extractor never substitutes an empty
/// string for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "College")]
    pub college: Option<String>,
    #[serde(rename = "Degree")]
    pub degree: Option<String>,
    #[serde(rename = "CGPA")]
    pub cgpa: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Status,
}

impl CandidateRecord {
    /// Leading numeric part of the CGPA text, e.g. `"9.04 / 10"` -> `9.04`.
    /// `None` when the field is absent or not number-shaped.
    pub fn cgpa_value(&self) -> Option<f64> {
        let raw = self.cgpa.as_deref()?;
        raw.split('/').next()?.trim().parse::<f64>().ok()
    }
}
