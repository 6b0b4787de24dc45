use crate::capture::PageSummary;
use crate::har::{Creator, Entry, HAR_VERSION, Har, Log, Page, PageTimings, format_timestamp};

/// Summarize the page load as the archive's single page record
pub fn build_page(page: &PageSummary) -> Page {
    let on_load = match (page.start_time, page.end_time) {
        (Some(start), Some(end)) => Some((end.timestamp_millis() - start.timestamp_millis()) as f64),
        _ => None,
    };

    Page {
        started_date_time: page.start_time.as_ref().map(format_timestamp),
        id: page.url.clone(),
        title: page.title.clone(),
        page_timings: PageTimings {
            on_content_load: None,
            on_load,
        },
    }
}

/// Wrap assembled entries into a HAR document
pub fn build_log(page: &PageSummary, entries: Vec<Entry>, creator: Creator) -> Har {
    Har {
        log: Log {
            version: HAR_VERSION.to_string(),
            creator,
            pages: vec![build_page(page)],
            entries,
        },
    }
}
