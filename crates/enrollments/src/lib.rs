//! Enrollment service core.
//!
//! Records the association of a user to a course, confirming both exist in their
//! upstream services before anything is persisted.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod pagination;
pub mod telemetry;
pub mod upstream;
