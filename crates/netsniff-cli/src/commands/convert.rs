use anyhow::{Context, Result};
use netsniff_core::capture::CaptureReader;
use netsniff_core::har::{Har, HarWriter};
use netsniff_core::{CreatorInfo, HarBuilder};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read a capture file and build its HAR document
pub fn build_har(file: &Path, creator: CreatorInfo) -> Result<Har> {
    let session = CaptureReader::from_file(file)
        .with_context(|| format!("Failed to load capture file {}", file.display()))?;

    Ok(HarBuilder::new(creator).build(&session.page, &session.resources))
}

pub fn execute(
    file: &Path,
    output: Option<PathBuf>,
    compact: bool,
    creator: CreatorInfo,
) -> Result<()> {
    tracing::debug!("Converting capture file: {}", file.display());

    let har = build_har(file, creator)?;

    if let Some(output_path) = output {
        if compact {
            let json = HarWriter::to_string_compact(&har)?;
            std::fs::write(&output_path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
        } else {
            HarWriter::to_file(&har, &output_path)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
        }
    } else {
        tracing::debug!("Writing HAR to stdout");
        let json = if compact {
            HarWriter::to_string_compact(&har)?
        } else {
            HarWriter::to_string(&har)?
        };
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
