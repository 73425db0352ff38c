//! Human readable reports, one per probe.
//!
//! Reports are built from already fetched data and rendered through
//! [Display](std::fmt::Display) so they can be checked without a ledger.
pub mod acs;
pub mod balances;
pub mod bridge;
pub mod purge;
pub mod status;
pub mod wallet;

/// Contracts listed per template before eliding the rest.
pub const LISTING_LIMIT: usize = 5;
