use super::CaptureSession;
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct CaptureReader;

impl CaptureReader {
    /// Read and parse a capture session from the given path
    pub fn from_file(path: &Path) -> Result<CaptureSession> {
        tracing::debug!("Reading capture file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let session: CaptureSession = serde_json::from_reader(reader)?;

        tracing::debug!(
            "Parsed capture of {} with {} resources",
            session.page.url,
            session.resources.len()
        );

        Ok(session)
    }

    /// Parse a capture session from a JSON string
    pub fn from_str(content: &str) -> Result<CaptureSession> {
        let session: CaptureSession = serde_json::from_str(content)?;
        Ok(session)
    }
}
