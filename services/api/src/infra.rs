use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use officehub::offices::{OfficeId, PhotoPayload, PhotoStore, PhotoStoreError};
use officehub::reporting::{RenderError, RenderedReport, ReportRenderer, ReportSnapshot};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) photos_dir: PathBuf,
}

/// Photo storage under one directory per office; stored paths double as the
/// public `/photos/...` URL paths.
pub(crate) struct FilesystemPhotoStore {
    root: PathBuf,
}

impl FilesystemPhotoStore {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn office_dir(&self, office: OfficeId) -> PathBuf {
        self.root.join(office.0.to_string())
    }
}

impl PhotoStore for FilesystemPhotoStore {
    fn replace(
        &self,
        office: OfficeId,
        photos: &[PhotoPayload],
    ) -> Result<Vec<String>, PhotoStoreError> {
        self.remove_all(office)?;

        let dir = self.office_dir(office);
        std::fs::create_dir_all(&dir).map_err(|err| PhotoStoreError::Io(err.to_string()))?;

        let mut paths = Vec::with_capacity(photos.len());
        for photo in photos {
            let file_name = format!("{}.{}", Uuid::new_v4(), photo.extension);
            std::fs::write(dir.join(&file_name), &photo.bytes)
                .map_err(|err| PhotoStoreError::Io(err.to_string()))?;
            paths.push(format!("photos/{}/{}", office.0, file_name));
        }
        Ok(paths)
    }

    fn remove_all(&self, office: OfficeId) -> Result<(), PhotoStoreError> {
        match std::fs::remove_dir_all(self.office_dir(office)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PhotoStoreError::Io(err.to_string())),
        }
    }
}

/// Plain-text stand-in for the document renderer; a PDF engine would plug in
/// behind the same trait.
pub(crate) struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn render(&self, snapshot: &ReportSnapshot) -> Result<RenderedReport, RenderError> {
        let stamp = snapshot.stamp();
        let mut doc = String::new();

        doc.push_str(&format!("System report {stamp}\n\n"));
        doc.push_str("Overview\n");
        doc.push_str(&format!("Registered users: {}\n", snapshot.user_count));
        doc.push_str(&format!("Offices: {}\n", snapshot.office_count));
        doc.push_str(&format!("Applications: {}\n\n", snapshot.application_count));

        doc.push_str("Users\n");
        for user in &snapshot.users {
            doc.push_str(&format!(
                "ID: {}, Name: {} {}, Tel: +{}, Email: {}, Status: {}\n",
                user.id.0,
                user.first_name,
                user.last_name,
                user.tel.replace('-', ""),
                user.email,
                if user.blocked { "blocked" } else { "active" },
            ));
        }

        doc.push_str("\nOffices\n");
        for office in &snapshot.offices {
            doc.push_str(&format!(
                "ID: {}, Name: {}, Address: {}, Price: {} BYN, Area: {} m2, Status: {}\n",
                office.id.0,
                office.name,
                office.address,
                office.price,
                office.area,
                if office.active { "active" } else { "inactive" },
            ));
        }

        doc.push_str("\nApplications\n");
        for application in &snapshot.applications {
            doc.push_str(&format!(
                "ID: {}, User ID: {}, Office ID: {}, Status: {}\n",
                application.id.0,
                application.user_id.0,
                application.office_id.0,
                application.status.label(),
            ));
        }

        Ok(RenderedReport {
            file_name: format!("report_{stamp}.txt"),
            content_type: "text/plain; charset=utf-8",
            bytes: doc.into_bytes(),
        })
    }
}
