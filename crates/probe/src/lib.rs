//! Inspection and bootstrap tooling for a ledger's JSON API.
pub mod bootstrap;
pub mod coverage;
pub mod report;
pub mod snapshot;
pub mod submit;
pub mod summary;
