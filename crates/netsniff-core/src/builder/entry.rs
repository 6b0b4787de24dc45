use super::classify::apply_transport_error;
use crate::capture::{NormalizedResource, ReplyEvent, RequestEvent};
use crate::har::{
    Cache, Content, Entry, EntryState, HTTP_VERSION, Request, Response, ResponseError,
    STATUS_NO_RESPONSE, Timings, format_timestamp,
};
use chrono::{DateTime, Utc};

/// Build the HAR entry for a resource that survived normalization.
///
/// The request time anchors every duration. When both reply phases are
/// present the start of the reply supplies the response fields.
pub fn build_entry(resource: &NormalizedResource<'_>, page_ref: &str) -> Entry {
    let requested_at = resource.request.time;

    let mut entry = Entry {
        started_date_time: format_timestamp(&requested_at),
        time: None,
        state: EntryState::Wait,
        request: request_block(resource.request.event),
        response: empty_response(),
        cache: Cache::default(),
        timings: Timings::default(),
        page_ref: page_ref.to_string(),
    };

    match (&resource.start_reply, &resource.end_reply) {
        (Some(start), end) => {
            entry.state = EntryState::Receive;
            entry.timings.wait = elapsed_millis(requested_at, start.time);
            fill_response(&mut entry.response, start.event);

            if let Some(end) = end {
                entry.time = Some(elapsed_millis(requested_at, end.time));
                entry.timings.receive = elapsed_millis(start.time, end.time);
            }
        }
        // Redirects and synchronous requests can finish without a start reply.
        (None, Some(end)) => {
            entry.time = Some(elapsed_millis(requested_at, end.time));
            fill_response(&mut entry.response, end.event);
        }
        (None, None) => {}
    }

    if let Some(error) = resource.error {
        apply_transport_error(&mut entry, error);
    }

    tracing::trace!(
        "Built entry {} {} (state={}, status={})",
        entry.request.method,
        entry.request.url,
        entry.state.as_str(),
        entry.response.status
    );

    entry
}

fn elapsed_millis(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64
}

fn request_block(request: &RequestEvent) -> Request {
    Request {
        method: request.method.clone(),
        url: request.url.clone(),
        http_version: HTTP_VERSION.to_string(),
        cookies: vec![],
        headers: request.headers.to_vec(),
        query_string: vec![],
        headers_size: -1,
        body_size: -1,
    }
}

fn empty_response() -> Response {
    Response {
        status: STATUS_NO_RESPONSE,
        status_text: None,
        http_version: HTTP_VERSION.to_string(),
        cookies: vec![],
        headers: vec![],
        redirect_url: String::new(),
        headers_size: -1,
        body_size: None,
        content: Content {
            size: None,
            mime_type: None,
        },
        error: ResponseError::default(),
    }
}

fn fill_response(response: &mut Response, reply: &ReplyEvent) {
    if let Some(status) = reply.status {
        response.status = status;
    }
    response.status_text = reply.status_text.clone();
    response.headers = reply.headers.to_vec();
    response.content.mime_type = reply.content_type.clone();
    response.body_size = reply.body_size;
    response.content.size = reply.body_size;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransportError;
    use crate::capture::{ErrorEvent, HeaderList, ResourceRecord, normalize};
    use crate::har::{Header, STATUS_TRANSPORT_ERROR};

    const T0: f64 = 1_704_067_200_000.0; // 2024-01-01T00:00:00Z
    const PAGE: &str = "https://example.com/";

    fn request(url: &str) -> RequestEvent {
        RequestEvent {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: HeaderList::new(vec![Header::new("Accept", "*/*")]),
            timestamp: Some(T0),
        }
    }

    fn reply(status: Option<i64>, offset: f64, content_type: &str) -> ReplyEvent {
        ReplyEvent {
            status,
            status_text: Some(format!("status {:?}", status)),
            headers: HeaderList::new(vec![Header::new("Content-Type", content_type)]),
            content_type: Some(content_type.to_string()),
            body_size: Some(512),
            timestamp: Some(T0 + offset),
        }
    }

    fn build(record: &ResourceRecord) -> Entry {
        let normalized = normalize(record).unwrap();
        build_entry(&normalized, PAGE)
    }

    #[test]
    fn test_request_only_waits() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/app.js")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.started_date_time, "2024-01-01T00:00:00.000Z");
        assert_eq!(entry.state, EntryState::Wait);
        assert_eq!(entry.response.status, STATUS_NO_RESPONSE);
        assert_eq!(entry.time, None);
        assert_eq!(entry.timings.wait, -1.0);
        assert_eq!(entry.timings.receive, -1.0);
        assert_eq!(entry.page_ref, PAGE);
        assert!(entry.response.status_text.is_none());
        assert!(entry.response.body_size.is_none());
    }

    #[test]
    fn test_request_block_is_copied() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/search?q=rust")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.request.url, "https://example.com/search?q=rust");
        assert_eq!(entry.request.http_version, "HTTP/1.1");
        assert_eq!(entry.request.headers, vec![Header::new("Accept", "*/*")]);
        assert!(entry.request.query_string.is_empty());
        assert!(entry.request.cookies.is_empty());
        assert_eq!(entry.request.headers_size, -1);
        assert_eq!(entry.request.body_size, -1);
    }

    #[test]
    fn test_start_reply_receives() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            start_reply: Some(reply(Some(200), 120.0, "text/html")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.state, EntryState::Receive);
        assert_eq!(entry.timings.wait, 120.0);
        assert_eq!(entry.timings.receive, -1.0);
        assert_eq!(entry.response.status, 200);
        assert_eq!(entry.response.content.mime_type.as_deref(), Some("text/html"));
        assert_eq!(entry.response.body_size, Some(512));
        assert_eq!(entry.response.content.size, Some(512));
        assert_eq!(entry.time, None);
    }

    #[test]
    fn test_complete_reply_prefers_start_fields() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            start_reply: Some(reply(Some(200), 100.0, "text/html")),
            end_reply: Some(reply(Some(301), 350.0, "text/plain")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.time, Some(350.0));
        assert_eq!(entry.timings.wait, 100.0);
        assert_eq!(entry.timings.receive, 250.0);
        assert_eq!(entry.response.status, 200);
        assert_eq!(entry.response.content.mime_type.as_deref(), Some("text/html"));
        assert_eq!(
            entry.response.headers,
            vec![Header::new("Content-Type", "text/html")]
        );
        // Stays in receive after completion.
        assert_eq!(entry.state, EntryState::Receive);
    }

    #[test]
    fn test_end_reply_only() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/missing")),
            end_reply: Some(reply(Some(404), 80.0, "text/plain")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.time, Some(80.0));
        assert_eq!(entry.timings.wait, -1.0);
        assert_eq!(entry.timings.receive, -1.0);
        assert_eq!(entry.response.status, 404);
        assert_eq!(entry.response.content.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(entry.state, EntryState::Wait);
    }

    #[test]
    fn test_null_status_keeps_sentinel() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            start_reply: Some(reply(None, 10.0, "text/html")),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.response.status, STATUS_NO_RESPONSE);
        assert_eq!(entry.response.status_text.as_deref(), Some("status None"));
    }

    #[test]
    fn test_status_zero_is_recorded() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            start_reply: Some(reply(Some(0), 10.0, "text/html")),
            error: Some(ErrorEvent {
                error_code: Some(5),
                error_string: "Operation canceled".to_string(),
            }),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.response.status, 0);
        assert!(entry.response.error.is_empty());
    }

    #[test]
    fn test_transport_error_without_reply() {
        let record = ResourceRecord {
            request: Some(request("https://unreachable.invalid/")),
            error: Some(ErrorEvent {
                error_code: Some(4),
                error_string: "Connection timed out".to_string(),
            }),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.response.status, STATUS_TRANSPORT_ERROR);
        assert_eq!(
            entry.response.status_text.as_deref(),
            Some("Connection timed out")
        );
        assert_eq!(
            entry.response.error.code,
            Some(TransportError::ConnectionTimedOut)
        );
        assert_eq!(entry.state, EntryState::Wait);
    }

    #[test]
    fn test_http_error_is_not_reclassified() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/broken")),
            start_reply: Some(reply(Some(500), 40.0, "text/html")),
            error: Some(ErrorEvent {
                error_code: Some(299),
                error_string: "Internal Server Error".to_string(),
            }),
            ..Default::default()
        };

        let entry = build(&record);

        assert_eq!(entry.response.status, 500);
        assert!(entry.response.error.is_empty());
    }

    #[test]
    fn test_constant_timings() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            start_reply: Some(reply(Some(200), 5.0, "text/html")),
            end_reply: Some(reply(Some(200), 9.0, "text/html")),
            ..Default::default()
        };

        let timings = build(&record).timings;

        assert_eq!(timings.blocked, 0.0);
        assert_eq!(timings.send, 0.0);
        assert_eq!(timings.dns, -1.0);
        assert_eq!(timings.connect, -1.0);
        assert_eq!(timings.ssl, -1.0);
    }

    #[test]
    fn test_entry_serializes_har_shape() {
        let record = ResourceRecord {
            request: Some(request("https://example.com/")),
            ..Default::default()
        };

        let json = serde_json::to_value(build(&record)).unwrap();

        assert_eq!(json["time"], serde_json::Value::Null);
        assert_eq!(json["state"], "wait");
        assert_eq!(json["response"]["status"], -999);
        assert_eq!(json["response"]["statusText"], serde_json::Value::Null);
        assert_eq!(json["response"]["error"], serde_json::json!({}));
        assert_eq!(json["response"]["content"]["size"], serde_json::Value::Null);
        assert_eq!(json["cache"], serde_json::json!({}));
        assert_eq!(json["pageref"], PAGE);
        assert_eq!(json["request"]["headers"][0]["name"], "Accept");
    }
}
