use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus};
use crate::identity::UserId;
use crate::offices::OfficeId;

/// The (user, office) pair already owns an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("application already submitted")]
pub struct SubmissionConflict;

/// Storage abstraction for rental applications. `insert_application` runs
/// the per-(user, office) uniqueness check and the insert as one critical
/// section, so concurrent submissions for the same pair cannot both land.
pub trait ApplicationRepository: Send + Sync {
    fn insert_application(
        &self,
        user: UserId,
        office: OfficeId,
    ) -> Result<ApplicationRecord, SubmissionConflict>;
    fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Option<ApplicationRecord>;
    /// All applications ordered by id.
    fn applications(&self) -> Vec<ApplicationRecord>;
    fn applications_for_user(&self, user: UserId) -> Vec<ApplicationRecord>;
    /// Returns false when no such application exists.
    fn delete_application(&self, id: ApplicationId) -> bool;
}
