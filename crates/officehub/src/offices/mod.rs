//! Office listings, search, and the photo-storage collaborator seam.

pub mod domain;
pub mod photos;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{OfficeChanges, OfficeDraft, OfficeId, OfficeRecord, OfficeSearch};
pub use photos::{PhotoDecodeError, PhotoPayload, PhotoStore, PhotoStoreError};
pub use repository::{NewOfficeRecord, OfficeRepository};
pub use router::office_router;
pub use service::{OfficeService, OfficeServiceError};
