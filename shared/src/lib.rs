//! Ambient concerns shared across every service in the fleet: response
//! envelopes, job/result types, graceful shutdown, telemetry setup, and
//! timezone-aware date helpers.

pub mod responses;
pub mod shutdown;
pub mod telemetry;
pub mod time;
pub mod types;
