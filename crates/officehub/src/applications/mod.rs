//! Rental application lifecycle: submission, status transitions, listing,
//! and administrative deletion.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, ApplicationRecord, ApplicationStatus};
pub use repository::{ApplicationRepository, SubmissionConflict};
pub use router::application_router;
pub use service::{ApplicationService, StatusOutcome, SubmitOutcome};
