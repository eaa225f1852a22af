//! Enrollment of users into courses.
//!
//! Creation confirms both the user and the course exist upstream before a pending
//! record is persisted. Listing and status updates delegate straight to the repository.

pub mod domain;
pub mod error;
pub mod lookup;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Enrollment, EnrollmentUpdate, Filters, STATUS_ACTIVE, STATUS_PENDING};
pub use error::{EnrollmentError, ValidationError};
pub use lookup::{Course, CourseLookup, LookupError, User, UserLookup};
pub use memory::InMemoryEnrollmentRepository;
pub use postgres::PgEnrollmentRepository;
pub use repository::EnrollmentRepository;
pub use router::{enrollment_router, status_for, ApiResponse, CreateRequest, UpdateRequest};
pub use service::EnrollmentService;
