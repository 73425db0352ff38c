//! Types of the JSON Ledger API (v2) as used by the ledger probes.
pub mod envelope;
pub mod error;
pub mod identifier;
pub mod reply;
pub mod request;
