use super::domain::{AuthToken, NewUserRecord, UserChanges, UserId, UserRecord};
use crate::offices::OfficeId;

/// Uniqueness violations reported by user insertion. Email wins when both
/// fields collide, matching the original check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationConflict {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("phone already registered")]
    DuplicatePhone,
}

/// Storage abstraction for user rows. Implementations must run each
/// operation as a single atomic step; `insert_user` in particular performs
/// the duplicate check and the insert under one critical section.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, RegistrationConflict>;
    fn user_by_token(&self, token: &AuthToken) -> Option<UserRecord>;
    fn user_by_id(&self, id: UserId) -> Option<UserRecord>;
    fn user_by_email(&self, email: &str) -> Option<UserRecord>;
    /// Non-admin users ordered by id.
    fn regular_users(&self) -> Vec<UserRecord>;
    /// Applies only the populated fields; returns the updated row.
    fn update_user(&self, id: UserId, changes: UserChanges) -> Option<UserRecord>;
    /// Deletes the user together with their applications and favorite links.
    /// Returns false when no such user exists.
    fn delete_user(&self, id: UserId) -> bool;
    /// Non-admin users whose normalized phone contains the fragment.
    fn users_by_phone_fragment(&self, fragment: &str) -> Vec<UserRecord>;
}

/// Result of a favorite-set mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Inserted,
    AlreadyPresent,
}

/// Favorite offices as a (user, office) join relation with set semantics.
pub trait FavoriteRepository: Send + Sync {
    /// Membership insert; atomic, so concurrent toggles cannot lose updates.
    fn add_favorite(&self, user: UserId, office: OfficeId) -> FavoriteChange;
    /// Returns true when the link existed and was removed.
    fn remove_favorite(&self, user: UserId, office: OfficeId) -> bool;
    fn favorites_of(&self, user: UserId) -> Vec<OfficeId>;
}
