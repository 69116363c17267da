use std::sync::Arc;

use tracing::info;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus};
use super::repository::ApplicationRepository;
use crate::auth::AdminGate;
use crate::identity::{AuthToken, UserRepository};
use crate::offices::OfficeId;

/// Service owning the application lifecycle. Listing and deletion are gated
/// at the route layer; submission applies the admin-ownership rule itself.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    gate: Arc<AdminGate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    UserNotFound,
    AdminRefused,
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Cancelled,
    Accepted,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + UserRepository,
{
    pub fn new(repository: Arc<R>, gate: Arc<AdminGate>) -> Self {
        Self { repository, gate }
    }

    /// Submit a rental request. The admin can never own an application, and
    /// a (user, office) pair can hold at most one; office existence is not
    /// checked here (see DESIGN.md).
    pub fn submit(&self, token: &AuthToken, office: OfficeId) -> SubmitOutcome {
        let Some(user) = self.repository.user_by_token(token) else {
            return SubmitOutcome::UserNotFound;
        };
        if self.gate.is_admin_token(token) {
            return SubmitOutcome::AdminRefused;
        }

        match self.repository.insert_application(user.id, office) {
            Ok(record) => {
                info!(
                    application = record.id.0,
                    user = user.id.0,
                    office = office.0,
                    "application submitted"
                );
                SubmitOutcome::Submitted
            }
            Err(_) => SubmitOutcome::AlreadySubmitted,
        }
    }

    /// Store the given status code verbatim. Zero reports as cancelled,
    /// every other code as accepted; `None` means no such application.
    pub fn set_status(&self, id: ApplicationId, code: i32) -> Option<StatusOutcome> {
        self.repository
            .set_status(id, ApplicationStatus(code))
            .map(|record| {
                if record.status.is_cancelled() {
                    StatusOutcome::Cancelled
                } else {
                    StatusOutcome::Accepted
                }
            })
    }

    pub fn list_all(&self) -> Vec<ApplicationRecord> {
        self.repository.applications()
    }

    /// An empty listing for an existing user is a normal outcome; an
    /// unknown token is reported as `None` and surfaces as a 404.
    pub fn list_for_user(&self, token: &AuthToken) -> Option<Vec<ApplicationRecord>> {
        let user = self.repository.user_by_token(token)?;
        Some(self.repository.applications_for_user(user.id))
    }

    pub fn delete(&self, id: ApplicationId) -> bool {
        let deleted = self.repository.delete_application(id);
        if deleted {
            info!(application = id.0, "application deleted");
        }
        deleted
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }
}
