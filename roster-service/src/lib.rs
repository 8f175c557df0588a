//! `roster-service` wraps the day-by-day constraint solving engine in
//! [`engine`] with the job lifecycle, persistence, and HTTP surface a caller
//! actually drives: submit a roster-generation request, let it run in the
//! background, fetch its status and result.

pub mod api;
pub mod domain;
pub mod engine;
pub mod error;
pub mod infrastructure;
