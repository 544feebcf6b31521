/// Multipart field carrying report evidence; may repeat
pub const MEDIA_FIELD: &str = "media";

/// Storage path segment all report evidence is grouped under
pub const MEDIA_PURPOSE: &str = "hazard-reports";

/// Content type assumed when a multipart part declares none
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
