use chrono::{DateTime, Local};
use serde::Serialize;

use crate::applications::ApplicationRecord;
use crate::identity::UserView;
use crate::offices::OfficeRecord;

/// Point-in-time view over the stores for report rendering. Listings are
/// each one consistent read; the snapshot as a whole is not transactionally
/// serialized across them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub generated_at: DateTime<Local>,
    pub user_count: usize,
    pub office_count: usize,
    pub application_count: usize,
    pub users: Vec<UserView>,
    pub offices: Vec<OfficeRecord>,
    pub applications: Vec<ApplicationRecord>,
}

impl ReportSnapshot {
    pub fn new(
        users: Vec<UserView>,
        offices: Vec<OfficeRecord>,
        applications: Vec<ApplicationRecord>,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            user_count: users.len(),
            office_count: offices.len(),
            application_count: applications.len(),
            users,
            offices,
            applications,
        }
    }

    /// Timestamp in the report's filename format.
    pub fn stamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d-%H:%M:%S").to_string()
    }
}

/// A finished document ready to be streamed as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("report rendering failed: {0}")]
    Render(String),
}

/// Rendering collaborator. Document layout is outside the core; the service
/// only guarantees the snapshot it hands over is complete.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, snapshot: &ReportSnapshot) -> Result<RenderedReport, RenderError>;
}
