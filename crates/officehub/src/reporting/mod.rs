//! Administrative report snapshot and the document-rendering seam.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{RenderError, RenderedReport, ReportRenderer, ReportSnapshot};
pub use router::report_router;
pub use service::ReportService;
