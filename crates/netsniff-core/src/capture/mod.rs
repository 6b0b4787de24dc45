//! Raw events produced by the capturing environment.
//!
//! These records mirror what the instrumented browser reports for a single
//! page load: one page summary plus, per resource, an optional request, an
//! optional start and end of the reply, and an optional transport error.

mod normalize;
mod reader;

pub use normalize::{Exclusion, NormalizedResource, Timed, is_inline_image, normalize, timestamp_to_time};
pub use reader::CaptureReader;

use crate::har::Header;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// One page load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Request phase of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: HeaderList,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Start or end of a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEvent {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub headers: HeaderList,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub body_size: Option<i64>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Low-level transport failure reported for a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_string: String,
}

/// Everything observed for a single network fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    #[serde(default)]
    pub request: Option<RequestEvent>,
    #[serde(default)]
    pub start_reply: Option<ReplyEvent>,
    #[serde(default)]
    pub end_reply: Option<ReplyEvent>,
    #[serde(default)]
    pub error: Option<ErrorEvent>,
}

/// A capture file: the page and its resources in observation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSession {
    pub page: PageSummary,
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// Ordered header pairs.
///
/// Accepts either a JSON object of `name: value` or a HAR-style array of
/// `{name, value}` objects and always serializes as the array form. Both
/// forms keep the order in which headers appear; `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<Header>")]
pub struct HeaderList(Vec<Header>);

impl HeaderList {
    pub fn new(headers: Vec<Header>) -> Self {
        Self(headers)
    }

    pub fn as_slice(&self) -> &[Header] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Header> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HeaderList> for Vec<Header> {
    fn from(list: HeaderList) -> Self {
        list.0
    }
}

impl<'de> Deserialize<'de> for HeaderList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(HeaderListVisitor)
    }
}

struct HeaderListVisitor;

impl<'de> Visitor<'de> for HeaderListVisitor {
    type Value = HeaderList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a header object or an array of {name, value} pairs")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(HeaderList::default())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut headers = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(header) = seq.next_element::<Header>()? {
            headers.push(header);
        }
        Ok(HeaderList(headers))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut headers = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, value)) = map.next_entry::<String, String>()? {
            headers.push(Header { name, value });
        }
        Ok(HeaderList(headers))
    }
}
