use super::{ErrorEvent, ReplyEvent, RequestEvent, ResourceRecord};
use chrono::{DateTime, Utc};
use std::fmt;

const INLINE_IMAGE_PREFIX: &str = "data:image/";

/// An event paired with its timestamp converted to a comparable time value
#[derive(Debug, Clone)]
pub struct Timed<'a, T> {
    pub event: &'a T,
    pub time: DateTime<Utc>,
}

/// A resource that belongs in the archive, with every present phase timed
#[derive(Debug, Clone)]
pub struct NormalizedResource<'a> {
    pub request: Timed<'a, RequestEvent>,
    pub start_reply: Option<Timed<'a, ReplyEvent>>,
    pub end_reply: Option<Timed<'a, ReplyEvent>>,
    pub error: Option<&'a ErrorEvent>,
}

/// Why a resource was left out of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// No request phase was captured
    MissingRequest,
    /// `data:image/...` URIs fall outside the HAR format
    InlineImage,
    /// The request timestamp is missing or does not map to a calendar date
    InvalidTimestamp,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::MissingRequest => write!(f, "no request phase"),
            Exclusion::InlineImage => write!(f, "inline image data URI"),
            Exclusion::InvalidTimestamp => write!(f, "missing or unrepresentable request timestamp"),
        }
    }
}

/// Convert an epoch timestamp in milliseconds into a time value.
///
/// Fractional milliseconds are truncated. Returns `None` for values that
/// are not finite or fall outside the representable date range.
pub fn timestamp_to_time(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Case-insensitive check for an inline image data URI
pub fn is_inline_image(url: &str) -> bool {
    url.get(..INLINE_IMAGE_PREFIX.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(INLINE_IMAGE_PREFIX))
}

/// Time every phase of a resource, or report why it is excluded.
///
/// A reply phase whose timestamp is missing or cannot be converted is
/// treated as absent.
pub fn normalize(resource: &ResourceRecord) -> Result<NormalizedResource<'_>, Exclusion> {
    let request = resource.request.as_ref().ok_or(Exclusion::MissingRequest)?;

    if is_inline_image(&request.url) {
        return Err(Exclusion::InlineImage);
    }

    let time = request
        .timestamp
        .and_then(timestamp_to_time)
        .ok_or(Exclusion::InvalidTimestamp)?;

    Ok(NormalizedResource {
        request: Timed {
            event: request,
            time,
        },
        start_reply: resource.start_reply.as_ref().and_then(|reply| timed_reply(reply, "start")),
        end_reply: resource.end_reply.as_ref().and_then(|reply| timed_reply(reply, "end")),
        error: resource.error.as_ref(),
    })
}

fn timed_reply<'a>(reply: &'a ReplyEvent, stage: &str) -> Option<Timed<'a, ReplyEvent>> {
    match reply.timestamp.and_then(timestamp_to_time) {
        Some(time) => Some(Timed { event: reply, time }),
        None => {
            tracing::debug!(
                "Ignoring {} reply with unusable timestamp {:?}",
                stage,
                reply.timestamp
            );
            None
        }
    }
}
