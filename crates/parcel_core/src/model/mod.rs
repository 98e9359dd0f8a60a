//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and services.
//!
//! # Invariants
//! - Every persisted parcel is identified by a stable `ParcelNumber`.
//! - Deletion removes the record; there are no tombstones.

pub mod parcel;
