use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{normalize_name, OfficeChanges, OfficeDraft, OfficeId, OfficeRecord, OfficeSearch};
use super::photos::{PhotoDecodeError, PhotoPayload, PhotoStore, PhotoStoreError};
use super::repository::{NewOfficeRecord, OfficeRepository};
use crate::auth::AdminGate;

/// Service owning office CRUD and search. Photo storage mechanics live
/// behind the [`PhotoStore`] collaborator.
pub struct OfficeService<R, P> {
    repository: Arc<R>,
    photos: Arc<P>,
    gate: Arc<AdminGate>,
}

#[derive(Debug, thiserror::Error)]
pub enum OfficeServiceError {
    #[error("office not found")]
    NotFound,
    #[error(transparent)]
    PhotoDecode(#[from] PhotoDecodeError),
    #[error(transparent)]
    PhotoStore(#[from] PhotoStoreError),
}

impl<R, P> OfficeService<R, P>
where
    R: OfficeRepository,
    P: PhotoStore,
{
    pub fn new(repository: Arc<R>, photos: Arc<P>, gate: Arc<AdminGate>) -> Self {
        Self {
            repository,
            photos,
            gate,
        }
    }

    /// All payloads are decoded before the record exists; a storage failure
    /// afterwards deletes the just-created office again.
    pub fn create(&self, draft: OfficeDraft) -> Result<OfficeRecord, OfficeServiceError> {
        let payloads = PhotoPayload::decode_all(&draft.photos)?;

        let record = self.repository.insert_office(NewOfficeRecord {
            name: draft.name,
            address: draft.address,
            options: draft.options,
            description: draft.description,
            area: draft.area,
            price: draft.price,
            active: true,
        });

        let paths = match self.photos.replace(record.id, &payloads) {
            Ok(paths) => paths,
            Err(err) => {
                warn!(office = record.id.0, "photo storage failed, rolling back office");
                self.repository.delete_office(record.id);
                return Err(err.into());
            }
        };

        info!(office = record.id.0, "office created");
        Ok(self
            .repository
            .set_photos(record.id, paths)
            .unwrap_or(record))
    }

    /// Replacement photos are decoded and validated before the stored set is
    /// touched, so a bad submission cannot destroy the existing photos.
    pub fn update(&self, id: OfficeId, draft: OfficeDraft) -> Result<(), OfficeServiceError> {
        if !self.repository.office_exists(id) {
            return Err(OfficeServiceError::NotFound);
        }

        let payloads = PhotoPayload::decode_all(&draft.photos)?;
        let paths = self.photos.replace(id, &payloads)?;

        self.repository
            .update_office(id, OfficeChanges::from(&draft))
            .and_then(|_| self.repository.set_photos(id, paths))
            .ok_or(OfficeServiceError::NotFound)?;
        Ok(())
    }

    /// Photo removal runs first: an I/O failure aborts with the office and
    /// its applications intact, and the record+cascade delete itself is one
    /// atomic store operation.
    pub fn delete(&self, id: OfficeId) -> Result<(), OfficeServiceError> {
        if !self.repository.office_exists(id) {
            return Err(OfficeServiceError::NotFound);
        }

        self.photos.remove_all(id)?;
        self.repository.delete_office(id);
        info!(office = id.0, "office deleted");
        Ok(())
    }

    pub fn get(&self, id: OfficeId) -> Option<OfficeRecord> {
        self.repository.office(id)
    }

    pub fn list(&self) -> Vec<OfficeRecord> {
        self.repository.offices()
    }

    pub fn search(&self, criteria: &OfficeSearch) -> Vec<OfficeRecord> {
        self.repository.offices_in_range(criteria)
    }

    pub fn search_by_name(&self, query: &str) -> Vec<OfficeRecord> {
        self.repository
            .offices_by_name_fragment(&normalize_name(query))
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }
}
