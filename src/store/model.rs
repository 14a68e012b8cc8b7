use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::parser::ParsedMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelStatus {
    #[default]
    Pending,
    /// Terminal state
    Collected,
}

impl ParcelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "pending",
            ParcelStatus::Collected => "collected",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown parcel status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ParcelStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ParcelStatus::Pending),
            "collected" => Ok(ParcelStatus::Collected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A parcel waiting to be stored. Status and timestamp are optional and
/// filled in when the record is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParcel {
    pub code: String,
    pub courier: String,
    pub location: String,
    pub raw_text: String,
    pub status: Option<ParcelStatus>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewParcel {
    pub fn status_or_default(&self) -> ParcelStatus {
        self.status.unwrap_or_default()
    }

    pub fn timestamp_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(now)
    }
}

impl From<ParsedMessage> for NewParcel {
    fn from(message: ParsedMessage) -> Self {
        NewParcel {
            code: message.code().to_string(),
            courier: message.courier().to_string(),
            location: message.location().to_string(),
            raw_text: message.raw_text().to_string(),
            status: None,
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: Uuid,
    pub code: String,
    pub courier: String,
    pub location: String,
    pub raw_text: String,
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
}
