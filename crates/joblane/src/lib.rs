//! Job marketplace domain engine.
//!
//! The crate is organized around the marketplace core (identity, job catalog,
//! application ledger, and the access-scoped query layer) plus the ambient
//! configuration, telemetry, and error modules shared with the API service.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
