mod hazard_report;
mod media_attachment;
mod policy;

pub use hazard_report::{
    HazardReport, NewHazardReport, ReportStatus, ReportWithMedia, SubmitterProfile,
};
pub use media_attachment::{MediaAttachment, MediaType, NewMediaAttachment};
pub use policy::{RevalidationPolicy, UnknownMediaPolicy};
