use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::offices::OfficeId;

/// Identifier wrapper for stored users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Opaque bearer credential issued at registration and never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Role reported back by the login operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UserRole {
    Admin,
    User,
}

/// Stored user row. The password hash stays internal; [`UserView`] is the
/// wire representation.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub last_name: String,
    pub first_name: String,
    pub tel: String,
    pub age: u32,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    pub blocked: bool,
    pub token: AuthToken,
}

/// Insertion payload handed to the repository; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub last_name: String,
    pub first_name: String,
    pub tel: String,
    pub age: u32,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    pub blocked: bool,
    pub token: AuthToken,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    pub last_name: String,
    pub first_name: String,
    pub tel: String,
    pub age: u32,
    pub email: String,
    pub password: String,
}

/// Partial profile update request. Only the fields present in the request
/// are applied; the token is never touched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub tel: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub blocked: Option<bool>,
}

/// Repository-level change set with the password already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub tel: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub blocked: Option<bool>,
}

/// Sanitized user representation returned by the API and the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub last_name: String,
    pub first_name: String,
    pub tel: String,
    pub age: u32,
    pub email: String,
    pub blocked: bool,
    pub token: AuthToken,
    pub favorites: Vec<OfficeId>,
}

impl UserView {
    pub fn from_record(record: &UserRecord, favorites: Vec<OfficeId>) -> Self {
        Self {
            id: record.id,
            last_name: record.last_name.clone(),
            first_name: record.first_name.clone(),
            tel: record.tel.clone(),
            age: record.age,
            email: record.email.clone(),
            blocked: record.blocked,
            token: record.token.clone(),
            favorites,
        }
    }
}

/// Strip separators so phone search tolerates the formatting the original
/// data carries ("111-222-3333" vs "111 222 3333").
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != ' ').collect()
}
