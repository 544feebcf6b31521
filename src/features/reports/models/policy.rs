use std::str::FromStr;

/// How intake classifies a content type that is neither `image*` nor a proper
/// `video/*` type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownMediaPolicy {
    /// Anything that is not `image*` is recorded as `Video`
    #[default]
    TreatAsVideo,
    /// Only `image/*` and `video/*` are classified; anything else is rejected
    Reject,
}

impl FromStr for UnknownMediaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" | "treat_as_video" => Ok(Self::TreatAsVideo),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "MEDIA_UNKNOWN_TYPE_POLICY must be 'video' or 'reject', got '{}'",
                other
            )),
        }
    }
}

/// What validating an already `Validated` report does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevalidationPolicy {
    /// Restamp `validated_by`/`validated_time` with the latest reviewer
    #[default]
    Overwrite,
    /// Answer with a conflict and leave the first stamp untouched
    Reject,
    /// Return the report unchanged
    Keep,
}

impl RevalidationPolicy {
    /// Whether the store may only transition rows still in `Pending`
    pub fn requires_pending(&self) -> bool {
        !matches!(self, Self::Overwrite)
    }
}

impl FromStr for RevalidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            "keep" | "noop" => Ok(Self::Keep),
            other => Err(format!(
                "REVALIDATION_POLICY must be 'overwrite', 'reject' or 'keep', got '{}'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies_parse_from_env_values() {
        assert_eq!(
            "video".parse::<UnknownMediaPolicy>().unwrap(),
            UnknownMediaPolicy::TreatAsVideo
        );
        assert_eq!(
            "REJECT".parse::<UnknownMediaPolicy>().unwrap(),
            UnknownMediaPolicy::Reject
        );
        assert_eq!(
            "keep".parse::<RevalidationPolicy>().unwrap(),
            RevalidationPolicy::Keep
        );
        assert!("sometimes".parse::<RevalidationPolicy>().is_err());
    }

    #[test]
    fn test_defaults_preserve_existing_behavior() {
        assert_eq!(UnknownMediaPolicy::default(), UnknownMediaPolicy::TreatAsVideo);
        assert_eq!(RevalidationPolicy::default(), RevalidationPolicy::Overwrite);
        assert!(!RevalidationPolicy::Overwrite.requires_pending());
        assert!(RevalidationPolicy::Reject.requires_pending());
    }
}
