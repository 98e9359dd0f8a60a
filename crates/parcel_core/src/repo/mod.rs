//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return a semantic `NotFound` in addition to DB
//!   transport errors.

pub mod parcel_repo;
