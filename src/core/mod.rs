//! Core business logic - framework-agnostic menu, customer, order and report
//! operations. Every function takes a database connection and returns a
//! [`crate::errors::Result`]; the HTTP layer only adapts inputs and outputs.

/// Customer directory
pub mod customer;
/// Menu catalog
pub mod menu;
/// Order lifecycle: creation, pricing, status changes, deletion
pub mod order;
/// Read-only sales summaries
pub mod report;
