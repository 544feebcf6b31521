use crate::core::config::MediaConfig;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{MediaType, UnknownMediaPolicy};

const NOT_IMAGE_OR_VIDEO: &str =
    "Not an image or video! Please upload only images or videos.";

/// Attachment as read off the wire, before classification
#[derive(Debug, Clone)]
pub struct IncomingMedia {
    pub original_filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Attachment that passed the intake filter
#[derive(Debug, Clone)]
pub struct AcceptedMedia {
    pub original_filename: String,
    pub content_type: String,
    pub media_type: MediaType,
    pub data: Vec<u8>,
}

/// Boundary check for report evidence: content type, size and count.
///
/// Runs before any business logic, never persists anything.
#[derive(Debug, Clone)]
pub struct MediaIntakeFilter {
    max_file_size: usize,
    max_files: usize,
    unknown_type_policy: UnknownMediaPolicy,
}

impl MediaIntakeFilter {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            unknown_type_policy: config.unknown_type_policy,
        }
    }

    /// Only declared `image*` or `video*` types get through
    pub fn check_content_type(&self, content_type: &str) -> Result<()> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image") || content_type.starts_with("video") {
            Ok(())
        } else {
            Err(AppError::Validation(NOT_IMAGE_OR_VIDEO.to_string()))
        }
    }

    /// `size` may be a running total of a still-streaming upload
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                self.max_file_size,
                self.max_file_size / 1024 / 1024
            )));
        }
        Ok(())
    }

    /// Called before reading another attachment; `accepted` is how many came before it
    pub fn check_count(&self, accepted: usize) -> Result<()> {
        if accepted >= self.max_files {
            return Err(AppError::Validation(format!(
                "Too many attachments. At most {} files are allowed per report",
                self.max_files
            )));
        }
        Ok(())
    }

    /// Derive the media type from the declared content type
    pub fn classify(&self, content_type: &str) -> Result<MediaType> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image") {
            return Ok(MediaType::Image);
        }

        match self.unknown_type_policy {
            UnknownMediaPolicy::TreatAsVideo => Ok(MediaType::Video),
            UnknownMediaPolicy::Reject => {
                let top_level = content_type.split('/').next().unwrap_or_default();
                if top_level == "video" && content_type.contains('/') {
                    Ok(MediaType::Video)
                } else {
                    Err(AppError::Validation(format!(
                        "Unsupported media type '{}'",
                        content_type
                    )))
                }
            }
        }
    }

    pub fn accept(&self, incoming: IncomingMedia) -> Result<AcceptedMedia> {
        self.check_content_type(&incoming.content_type)?;
        self.check_size(incoming.data.len())?;
        let media_type = self.classify(&incoming.content_type)?;

        Ok(AcceptedMedia {
            original_filename: incoming.original_filename,
            content_type: incoming.content_type,
            media_type,
            data: incoming.data,
        })
    }
}
