//! Application layer coordinating the grid engine, the payment store and the
//! live connections.
//!
//! Real-time commands go through the [`coordinator::SessionCoordinator`];
//! request/response grid generation goes through the
//! [`generator::GridGenerator`], which is the only path that is rate limited.

pub mod coordinator;
pub mod generator;
pub mod rate_limiter;
pub mod registry;
