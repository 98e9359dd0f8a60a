//! Parcel domain model.
//!
//! # Responsibility
//! - Define the canonical shipment record persisted by the parcel store.
//! - Provide lifecycle helpers for status progression.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - `created_at` is fixed at creation; `Parcel::new` stamps RFC3339, rows
//!   from elsewhere are carried as stored.
//! - Only the current status is kept; no history.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Owning client identifier. Not checked against any client registry.
pub type ClientId = i64;

/// Number carried by a parcel that has not been persisted yet.
pub const UNASSIGNED_NUMBER: ParcelNumber = 0;

/// Parcel lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping; address may still change.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the client. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Returns the storage string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the following lifecycle state, or `None` when terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown parcel status `{}`", self.0)
    }
}

impl Error for UnknownStatus {}

impl FromStr for ParcelStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Validation errors raised by the service before a parcel is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelValidationError {
    EmptyAddress,
    InvalidCreatedAt(String),
}

impl Display for ParcelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "parcel address cannot be empty"),
            Self::InvalidCreatedAt(value) => {
                write!(f, "created_at `{value}` is not an RFC3339 timestamp")
            }
        }
    }
}

impl Error for ParcelValidationError {}

/// Canonical shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Assigned on insert; `UNASSIGNED_NUMBER` before that.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// RFC3339, UTC, second precision.
    pub created_at: String,
}

impl Parcel {
    /// Creates a registered, not yet persisted parcel stamped with the
    /// current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: UNASSIGNED_NUMBER,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: now_rfc3339(),
        }
    }

    /// Validates fields before a parcel is registered.
    ///
    /// # Errors
    /// - `EmptyAddress` when the address is blank.
    /// - `InvalidCreatedAt` when `created_at` is not RFC3339.
    pub fn validate(&self) -> Result<(), ParcelValidationError> {
        if self.address.trim().is_empty() {
            return Err(ParcelValidationError::EmptyAddress);
        }
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(ParcelValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Returns whether this parcel has been assigned a storage number.
    pub fn is_persisted(&self) -> bool {
        self.number != UNASSIGNED_NUMBER
    }
}

/// Current UTC time formatted the way `created_at` is stored.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::{Parcel, ParcelStatus, ParcelValidationError};

    #[test]
    fn status_progresses_to_delivered_and_stops() {
        assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
        assert_eq!(ParcelStatus::Delivered.next(), None);
    }

    #[test]
    fn status_parses_storage_strings() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>(), Ok(status));
        }
        assert!("lost".parse::<ParcelStatus>().is_err());
    }

    #[test]
    fn new_parcel_is_registered_and_valid() {
        let parcel = Parcel::new(1000, "test");
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert!(!parcel.is_persisted());
        assert!(parcel.created_at.ends_with('Z'));
        parcel.validate().expect("fresh parcel should validate");
    }

    #[test]
    fn validate_rejects_blank_address_and_bad_timestamp() {
        let mut parcel = Parcel::new(1, "   ");
        assert_eq!(parcel.validate(), Err(ParcelValidationError::EmptyAddress));

        parcel.address = "somewhere".to_string();
        parcel.created_at = "yesterday".to_string();
        assert!(matches!(
            parcel.validate(),
            Err(ParcelValidationError::InvalidCreatedAt(value)) if value == "yesterday"
        ));
    }
}
