//! Turns a captured page load into a HAR document.
//!
//! Resources flow through three stages in order: normalization (timing and
//! exclusion), entry assembly with transport error classification, and
//! finally log assembly around the single page record.

mod classify;
mod entry;
mod log;

pub use classify::{TransportError, apply_transport_error};
pub use entry::build_entry;
pub use log::{build_log, build_page};

use crate::capture::{Exclusion, PageSummary, ResourceRecord, normalize};
use crate::har::{Creator, Har};

/// Identity of the tool that captured the traffic, written to `log.creator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorInfo {
    pub name: String,
    pub version: String,
}

impl CreatorInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl From<CreatorInfo> for Creator {
    fn from(info: CreatorInfo) -> Self {
        Creator {
            name: info.name,
            version: info.version,
            comment: None,
        }
    }
}

/// Builds HAR documents for a fixed creator identity
#[derive(Debug, Clone)]
pub struct HarBuilder {
    creator: CreatorInfo,
}

impl HarBuilder {
    pub fn new(creator: CreatorInfo) -> Self {
        Self { creator }
    }

    /// Assemble the archive for one page load.
    ///
    /// Entries keep the order of `resources`; excluded resources are skipped.
    pub fn build(&self, page: &PageSummary, resources: &[ResourceRecord]) -> Har {
        tracing::debug!(
            "Building HAR for {} from {} resources",
            page.url,
            resources.len()
        );

        let mut entries = Vec::with_capacity(resources.len());
        let mut excluded = 0usize;

        for (idx, resource) in resources.iter().enumerate() {
            match normalize(resource) {
                Ok(normalized) => entries.push(build_entry(&normalized, &page.url)),
                Err(reason) => {
                    excluded += 1;
                    log_exclusion(idx, resource, reason);
                }
            }
        }

        tracing::info!(
            "Assembled {} entries ({} resources excluded)",
            entries.len(),
            excluded
        );

        build_log(page, entries, self.creator.clone().into())
    }
}

fn log_exclusion(idx: usize, resource: &ResourceRecord, reason: Exclusion) {
    match &resource.request {
        Some(request) => tracing::debug!(
            "Skipping resource {} ({}): {}",
            idx,
            request.url,
            reason
        ),
        None => tracing::debug!("Skipping resource {}: {}", idx, reason),
    }
}

/// Build a HAR document in one call
pub fn create_har(page: &PageSummary, resources: &[ResourceRecord], creator: CreatorInfo) -> Har {
    HarBuilder::new(creator).build(page, resources)
}
