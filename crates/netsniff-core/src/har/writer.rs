use super::types::Har;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct HarWriter;

impl HarWriter {
    /// Write a HAR structure to a file as pretty-printed JSON
    pub fn to_file(har: &Har, path: &Path) -> Result<()> {
        tracing::debug!("Writing HAR file to: {}", path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, har)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote HAR file with {} entries to {}",
            har.log.entries.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert a HAR structure to a JSON string
    pub fn to_string(har: &Har) -> Result<String> {
        let json = serde_json::to_string_pretty(har)?;
        Ok(json)
    }

    /// Convert a HAR structure to a compact JSON string
    pub fn to_string_compact(har: &Har) -> Result<String> {
        let json = serde_json::to_string(har)?;
        Ok(json)
    }
}
