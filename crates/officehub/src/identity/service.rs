use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::info;

use super::domain::{
    normalize_phone, AuthToken, NewUserProfile, NewUserRecord, UserChanges, UserId, UserRecord,
    UserRole, UserUpdate, UserView,
};
use super::repository::{FavoriteChange, FavoriteRepository, RegistrationConflict, UserRepository};
use crate::auth::AdminGate;
use crate::config::AdminConfig;
use crate::offices::{OfficeId, OfficeRepository};

/// Service owning registration, authentication, profile maintenance, and
/// favorite-office membership.
pub struct IdentityService<R> {
    repository: Arc<R>,
    gate: Arc<AdminGate>,
}

/// Failures that cannot be expressed as a domain outcome.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("admin seed rejected: {0}")]
    AdminSeed(RegistrationConflict),
}

#[derive(Debug)]
pub enum RegistrationOutcome {
    Created(UserView),
    DuplicateEmail,
    DuplicatePhone,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated { token: AuthToken, role: UserRole },
    NotFound,
    Blocked,
    BadPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAddOutcome {
    Added,
    AlreadyFavorite,
    AdminRefused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteRemoveOutcome {
    Removed,
    NotFavorite,
    UserNotFound,
}

/// Lookup failures on the favorite paths that surface as transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FavoriteLookupError {
    #[error("user not found")]
    UserNotFound,
    #[error("office not found")]
    OfficeNotFound,
}

/// Ensure the well-known administrator row exists and return it. Runs once
/// at startup; the returned token seeds the [`AdminGate`].
pub fn bootstrap_admin<R>(repository: &R, seed: &AdminConfig) -> Result<UserRecord, IdentityError>
where
    R: UserRepository,
{
    if let Some(existing) = repository.user_by_email(&seed.email) {
        return Ok(existing);
    }

    let record = repository
        .insert_user(NewUserRecord {
            last_name: "Admin".to_string(),
            first_name: "User".to_string(),
            tel: "000-000-0000".to_string(),
            age: 30,
            email: seed.email.clone(),
            password_hash: hash_password(&seed.password)?,
            admin: true,
            blocked: false,
            token: AuthToken::generate(),
        })
        .map_err(IdentityError::AdminSeed)?;

    info!(email = %seed.email, "administrator account created");
    Ok(record)
}

impl<R> IdentityService<R>
where
    R: UserRepository + FavoriteRepository + OfficeRepository,
{
    pub fn new(repository: Arc<R>, gate: Arc<AdminGate>) -> Self {
        Self { repository, gate }
    }

    pub fn register(&self, profile: NewUserProfile) -> Result<RegistrationOutcome, IdentityError> {
        let record = NewUserRecord {
            last_name: profile.last_name,
            first_name: profile.first_name,
            tel: profile.tel,
            age: profile.age,
            email: profile.email,
            password_hash: hash_password(&profile.password)?,
            admin: false,
            blocked: false,
            token: AuthToken::generate(),
        };

        match self.repository.insert_user(record) {
            Ok(stored) => {
                info!(user = stored.id.0, "user registered");
                Ok(RegistrationOutcome::Created(self.view_of(&stored)))
            }
            Err(RegistrationConflict::DuplicateEmail) => Ok(RegistrationOutcome::DuplicateEmail),
            Err(RegistrationConflict::DuplicatePhone) => Ok(RegistrationOutcome::DuplicatePhone),
        }
    }

    pub fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let Some(user) = self.repository.user_by_email(email) else {
            return LoginOutcome::NotFound;
        };
        if user.blocked {
            return LoginOutcome::Blocked;
        }
        if !verify_password(&user.password_hash, password) {
            return LoginOutcome::BadPassword;
        }

        let role = if self.gate.is_admin_token(&user.token) {
            UserRole::Admin
        } else {
            UserRole::User
        };
        LoginOutcome::Authenticated {
            token: user.token,
            role,
        }
    }

    pub fn profile(&self, token: &AuthToken) -> Option<UserView> {
        self.repository
            .user_by_token(token)
            .map(|record| self.view_of(&record))
    }

    pub fn user_view_by_id(&self, id: UserId) -> Option<UserView> {
        self.repository
            .user_by_id(id)
            .map(|record| self.view_of(&record))
    }

    /// Non-admin users ordered by id.
    pub fn list_users(&self) -> Vec<UserView> {
        self.repository
            .regular_users()
            .iter()
            .map(|record| self.view_of(record))
            .collect()
    }

    pub fn search_by_phone(&self, phone: &str) -> Vec<UserView> {
        let fragment = normalize_phone(phone);
        self.repository
            .users_by_phone_fragment(&fragment)
            .iter()
            .map(|record| self.view_of(record))
            .collect()
    }

    /// Returns false when no user carries the token.
    pub fn update_by_token(
        &self,
        token: &AuthToken,
        update: UserUpdate,
    ) -> Result<bool, IdentityError> {
        let Some(user) = self.repository.user_by_token(token) else {
            return Ok(false);
        };
        let changes = changes_from(update)?;
        Ok(self.repository.update_user(user.id, changes).is_some())
    }

    pub fn update_by_id(&self, id: UserId, update: UserUpdate) -> Result<bool, IdentityError> {
        let changes = changes_from(update)?;
        Ok(self.repository.update_user(id, changes).is_some())
    }

    pub fn delete_by_token(&self, token: &AuthToken) -> bool {
        match self.repository.user_by_token(token) {
            Some(user) => self.repository.delete_user(user.id),
            None => false,
        }
    }

    pub fn delete_by_id(&self, id: UserId) -> bool {
        self.repository.delete_user(id)
    }

    /// Admin tokens receive a domain refusal; unknown users and offices are
    /// transport-level not-found errors on this path.
    pub fn add_favorite(
        &self,
        token: &AuthToken,
        office: OfficeId,
    ) -> Result<FavoriteAddOutcome, FavoriteLookupError> {
        if self.gate.is_admin_token(token) {
            return Ok(FavoriteAddOutcome::AdminRefused);
        }
        let user = self
            .repository
            .user_by_token(token)
            .ok_or(FavoriteLookupError::UserNotFound)?;
        if !self.repository.office_exists(office) {
            return Err(FavoriteLookupError::OfficeNotFound);
        }

        match self.repository.add_favorite(user.id, office) {
            FavoriteChange::Inserted => Ok(FavoriteAddOutcome::Added),
            FavoriteChange::AlreadyPresent => Ok(FavoriteAddOutcome::AlreadyFavorite),
        }
    }

    /// Every outcome on the removal path answers 200, unknown user included.
    pub fn remove_favorite(&self, token: &AuthToken, office: OfficeId) -> FavoriteRemoveOutcome {
        let Some(user) = self.repository.user_by_token(token) else {
            return FavoriteRemoveOutcome::UserNotFound;
        };
        if self.repository.remove_favorite(user.id, office) {
            FavoriteRemoveOutcome::Removed
        } else {
            FavoriteRemoveOutcome::NotFavorite
        }
    }

    pub fn favorites(&self, token: &AuthToken) -> Result<Vec<OfficeId>, FavoriteLookupError> {
        let user = self
            .repository
            .user_by_token(token)
            .ok_or(FavoriteLookupError::UserNotFound)?;
        Ok(self.repository.favorites_of(user.id))
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    fn view_of(&self, record: &UserRecord) -> UserView {
        UserView::from_record(record, self.repository.favorites_of(record.id))
    }
}

fn changes_from(update: UserUpdate) -> Result<UserChanges, IdentityError> {
    let password_hash = update.password.as_deref().map(hash_password).transpose()?;
    Ok(UserChanges {
        last_name: update.last_name,
        first_name: update.first_name,
        tel: update.tel,
        age: update.age,
        email: update.email,
        password_hash,
        blocked: update.blocked,
    })
}

fn hash_password(raw: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::PasswordHash(err.to_string()))
}

fn verify_password(hash: &str, raw: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip_accepts_on_match() {
        let hash = hash_password("Pppp2005").expect("hashes");
        assert!(verify_password(&hash, "Pppp2005"));
        assert!(!verify_password(&hash, "pppp2005"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
