use super::domain::{OfficeChanges, OfficeId, OfficeRecord, OfficeSearch};

/// Insertion payload; the store assigns the id and the photo paths are set
/// once storage has succeeded.
#[derive(Debug, Clone)]
pub struct NewOfficeRecord {
    pub name: String,
    pub address: String,
    pub options: String,
    pub description: String,
    pub area: f64,
    pub price: f64,
    pub active: bool,
}

/// Storage abstraction for office listings.
pub trait OfficeRepository: Send + Sync {
    fn insert_office(&self, office: NewOfficeRecord) -> OfficeRecord;
    fn office(&self, id: OfficeId) -> Option<OfficeRecord>;
    fn office_exists(&self, id: OfficeId) -> bool;
    /// All offices ordered by id.
    fn offices(&self) -> Vec<OfficeRecord>;
    /// Applies only the populated fields; returns the updated row.
    fn update_office(&self, id: OfficeId, changes: OfficeChanges) -> Option<OfficeRecord>;
    /// Deletes the office together with its applications and favorite links.
    /// Returns false when no such office exists.
    fn delete_office(&self, id: OfficeId) -> bool;
    fn set_photos(&self, id: OfficeId, photos: Vec<String>) -> Option<OfficeRecord>;
    fn offices_in_range(&self, criteria: &OfficeSearch) -> Vec<OfficeRecord>;
    /// Offices whose normalized name contains the fragment.
    fn offices_by_name_fragment(&self, fragment: &str) -> Vec<OfficeRecord>;
}
