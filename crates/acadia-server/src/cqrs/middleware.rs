//! CQRS marker traits
//!
//! Commands mutate state; queries only read. The markers let the mediator
//! wiring (and tests) assert the split without affecting runtime behavior.

/// Marker for write operations.
pub trait Command {}

/// Marker for read-only operations.
pub trait Query {}
