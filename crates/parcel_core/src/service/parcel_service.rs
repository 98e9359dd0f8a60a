//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide registration and lifecycle entry points for core callers.
//! - Enforce status rules the store deliberately does not know about.
//!
//! # Invariants
//! - Addresses must not be blank; the store itself accepts any string.
//! - Address changes and deletion are allowed only while `registered`.
//! - Status only moves forward: registered -> sent -> delivered.
//! - Repository errors are passed through unchanged inside `Repo`.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError};
use crate::repo::parcel_repo::{ParcelRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for parcel use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before reaching the store.
    Validation(ParcelValidationError),
    /// Persistence-layer failure, including `NotFound`.
    Repo(RepoError),
    /// Operation requires `registered` but the parcel has moved on.
    StatusLocked {
        number: ParcelNumber,
        status: ParcelStatus,
    },
}

impl ServiceError {
    /// Returns whether the underlying cause is a missing parcel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(err) if err.is_not_found())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StatusLocked { number, status } => write!(
                f,
                "parcel {number} has status `{status}`; only `registered` parcels can be changed"
            ),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::StatusLocked { .. } => None,
        }
    }
}

impl From<ParcelValidationError> for ServiceError {
    fn from(value: ParcelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper over a parcel repository.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel for `client` and returns it with its number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.validate()?;
        parcel.number = self.repo.add(&parcel)?;

        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Gets one parcel by number.
    pub fn get(&self, number: ParcelNumber) -> ServiceResult<Parcel> {
        Ok(self.repo.get(number)?)
    }

    /// Lists all parcels of one client.
    pub fn client_parcels(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.repo.get_by_client(client)?)
    }

    /// Advances the parcel one lifecycle step.
    ///
    /// Returns the new status, or `None` without writing when the parcel is
    /// already delivered.
    pub fn next_status(&self, number: ParcelNumber) -> ServiceResult<Option<ParcelStatus>> {
        let parcel = self.repo.get(number)?;
        let Some(next) = parcel.status.next() else {
            info!(
                "event=parcel_next_status module=service status=skipped number={} current={}",
                number, parcel.status
            );
            return Ok(None);
        };

        self.repo.set_status(number, next)?;
        info!(
            "event=parcel_next_status module=service status=ok number={} from={} to={}",
            number, parcel.status, next
        );
        Ok(Some(next))
    }

    /// Replaces the delivery address of a registered parcel.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        if address.trim().is_empty() {
            return Err(ParcelValidationError::EmptyAddress.into());
        }
        self.ensure_registered(number, "parcel_change_address")?;
        self.repo.set_address(number, address)?;
        info!("event=parcel_change_address module=service status=ok number={number}");
        Ok(())
    }

    /// Deletes a registered parcel.
    pub fn delete(&self, number: ParcelNumber) -> ServiceResult<()> {
        self.ensure_registered(number, "parcel_delete")?;
        self.repo.delete(number)?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }

    fn ensure_registered(&self, number: ParcelNumber, event: &str) -> ServiceResult<()> {
        let parcel = self.repo.get(number)?;
        if parcel.status != ParcelStatus::Registered {
            warn!(
                "event={} module=service status=rejected number={} current={} error_code=status_locked",
                event, number, parcel.status
            );
            return Err(ServiceError::StatusLocked {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}
