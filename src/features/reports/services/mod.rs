mod media_intake;
mod report_service;

pub use media_intake::{AcceptedMedia, IncomingMedia, MediaIntakeFilter};
pub use report_service::ReportService;
