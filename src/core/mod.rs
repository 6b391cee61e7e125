//! Core business logic - framework-agnostic operations over the registry.
//!
//! Every mutating operation runs inside a single database transaction so that
//! its existence and uniqueness checks and its writes are atomic.

/// Admin role assignment
pub mod admin;
/// Association registration and maintenance
pub mod association;
/// Membership links between users and associations
pub mod membership;
/// Ledger balances and summaries
pub mod report;
/// Ledger transactions
pub mod transaction;
/// Time-bounded treasurer terms
pub mod treasurer;
/// User registration and maintenance
pub mod user;
/// Candidate record validation
pub mod validation;
