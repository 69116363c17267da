use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::offices::OfficeId;

/// Identifier wrapper for rental applications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApplicationId(pub i64);

/// Raw status code carried by an application. The lifecycle knows three
/// codes; the status-update operation stores whatever integer the caller
/// sends, so unknown codes survive round trips (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationStatus(pub i32);

impl ApplicationStatus {
    pub const CANCELLED: Self = Self(0);
    pub const PENDING: Self = Self(1);
    pub const APPROVED: Self = Self(2);

    pub fn is_cancelled(self) -> bool {
        self.0 == 0
    }

    /// Report label: pending and cancelled are exact matches, every other
    /// code reads as approved.
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "cancelled",
            1 => "pending",
            _ => "approved",
        }
    }
}

/// One user's request to rent one office. At most one record exists per
/// (user, office) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub office_id: OfficeId,
    pub status: ApplicationStatus,
}
