//! Decoder for ATC electrocardiogram recordings.
//!
//! ```no_run
//! let bytes = std::fs::read("recording.atc")?;
//! let ecg = atc2json::parse(&bytes)?;
//! println!("{} Hz, {} leads", ecg.frequency, ecg.samples.leads().len());
//! println!("{}", atc2json::convert(&bytes)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod block;
pub mod checksum;
pub mod document;
pub mod error;
pub mod header;
pub mod reader;

use std::path::Path;

pub use batch::parse_batch;
pub use block::{BlockHeader, BlockKind, FormatBlock, InfoBlock, Lead};
pub use checksum::{calc_checksum, verify_checksum};
pub use document::{calc_millivolts, EcgData, EcgSamples, RecordingInfo};
pub use error::{AtcError, ErrorKind, Result};
pub use header::FileHeader;
pub use reader::{parse, scan_blocks, AtcReader, BlockSummary};

/// Output settings for [`convert_with`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Indent the JSON output.
    pub pretty: bool,
}

/// Decode `data` and serialize it as compact JSON.
pub fn convert(data: &[u8]) -> Result<String> {
    convert_with(data, &ConvertOptions::default())
}

pub fn convert_with(data: &[u8], opts: &ConvertOptions) -> Result<String> {
    let ecg = parse(data)?;
    Ok(ecg.to_json(opts.pretty)?)
}

/// Read and decode the ATC file at `path`.
pub fn parse_file(path: &Path) -> Result<EcgData> {
    let data = std::fs::read(path)?;
    parse(&data)
}
