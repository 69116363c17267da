use std::sync::Arc;

use super::domain::{RenderError, RenderedReport, ReportRenderer, ReportSnapshot};
use crate::applications::ApplicationRepository;
use crate::auth::AdminGate;
use crate::identity::{FavoriteRepository, UserRepository, UserView};
use crate::offices::OfficeRepository;

/// Assembles the administrative snapshot and hands it to the renderer.
pub struct ReportService<R, W> {
    repository: Arc<R>,
    renderer: Arc<W>,
    gate: Arc<AdminGate>,
}

impl<R, W> ReportService<R, W>
where
    R: UserRepository + FavoriteRepository + OfficeRepository + ApplicationRepository,
    W: ReportRenderer,
{
    pub fn new(repository: Arc<R>, renderer: Arc<W>, gate: Arc<AdminGate>) -> Self {
        Self {
            repository,
            renderer,
            gate,
        }
    }

    /// Non-admin users, all offices, all applications, stamped now.
    pub fn snapshot(&self) -> ReportSnapshot {
        let users = self
            .repository
            .regular_users()
            .iter()
            .map(|record| UserView::from_record(record, self.repository.favorites_of(record.id)))
            .collect();
        ReportSnapshot::new(users, self.repository.offices(), self.repository.applications())
    }

    pub fn export(&self) -> Result<RenderedReport, RenderError> {
        self.renderer.render(&self.snapshot())
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }
}
