//! Container reader.
//!
//! [`AtcReader`] borrows the complete input buffer and walks it with a cursor:
//!
//! 1. the 12-byte file header is signature-checked;
//! 2. block headers are read until the cursor sits exactly at end of input;
//! 3. each known block is decoded and its trailing checksum verified against
//!    the original bytes, recomputed from the remembered block start;
//! 4. unknown blocks are skipped (`length + 4` bytes) without inspection.
//!
//! Any structural or checksum error aborts the decode.  When a known tag
//! occurs more than once the later block replaces the earlier one.

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, trace, warn};
use std::io::Cursor;

use crate::block::{
    display_tag, BlockHeader, BlockKind, FormatBlock, InfoBlock, Lead, CHECKSUM_SIZE,
    FORMAT_BLOCK_SIZE, INFO_BLOCK_SIZE,
};
use crate::checksum::{expected_checksum, stored_checksum, verify_checksum};
use crate::document::{EcgData, EcgSamples};
use crate::error::{AtcError, Result};
use crate::header::FileHeader;

/// Decode a complete ATC buffer.
pub fn parse(data: &[u8]) -> Result<EcgData> {
    AtcReader::new(data)?.parse()
}

/// Working record set filled while walking the blocks.
#[derive(Debug, Default)]
struct Blocks {
    format: Option<FormatBlock>,
    info: Option<InfoBlock>,
    samples: EcgSamples,
}

pub struct AtcReader<'a> {
    cursor: Cursor<&'a [u8]>,
    pub header: FileHeader,
}

impl<'a> AtcReader<'a> {
    /// Read and validate the file header.  The cursor is left on the first
    /// block.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let header = FileHeader::read(&mut cursor)?;
        debug!("ATC file version {}, {} bytes", header.version, data.len());
        Ok(Self { cursor, header })
    }

    fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn remaining(&self) -> usize {
        self.data().len().saturating_sub(self.position())
    }

    fn advance(&mut self, n: usize) {
        let pos = self.cursor.position() + n as u64;
        self.cursor.set_position(pos);
    }

    /// Read the next block header.  `Ok(None)` when the cursor is exactly at
    /// end of input; a partial header is an error.
    pub fn next_block(&mut self) -> Result<Option<(usize, BlockHeader)>> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        let block_start = self.position();
        let header = BlockHeader::read(&mut self.cursor)
            .map_err(AtcError::truncated("block header", block_start as u64))?;
        Ok(Some((block_start, header)))
    }

    /// Payload bytes the reader consumes for a block before its checksum.
    ///
    /// Fixed records use their natural size regardless of the declared
    /// length.  Sample arrays must have an even length that fits in the
    /// remaining input.
    fn payload_size(&self, header: &BlockHeader) -> Result<usize> {
        match header.kind() {
            BlockKind::Format => Ok(FORMAT_BLOCK_SIZE),
            BlockKind::Info => Ok(INFO_BLOCK_SIZE),
            BlockKind::Samples(lead) => {
                if header.length % 2 != 0 {
                    return Err(AtcError::OddSampleLength { lead, length: header.length });
                }
                self.check_fits(header, header.length as usize)?;
                Ok(header.length as usize)
            }
            BlockKind::Unknown(_) => Ok(header.length as usize),
        }
    }

    fn check_fits(&self, header: &BlockHeader, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(AtcError::PayloadOverrun {
                tag: display_tag(&header.tag),
                length: header.length,
                remaining,
            });
        }
        Ok(())
    }

    fn read_samples(&mut self, lead: Lead, length: u32) -> Result<Vec<i16>> {
        let offset = self.position() as u64;
        let mut samples = vec![0i16; length as usize / 2];
        self.cursor
            .read_i16_into::<LittleEndian>(&mut samples)
            .map_err(AtcError::truncated("sample data", offset))?;
        trace!("{lead}: {} samples", samples.len());
        Ok(samples)
    }

    fn verify(&mut self, block_start: usize, length: u32) -> Result<()> {
        verify_checksum(self.data(), block_start, length, self.position())?;
        self.advance(CHECKSUM_SIZE);
        Ok(())
    }

    fn skip(&mut self, header: &BlockHeader) -> Result<()> {
        let span = (header.length as usize)
            .checked_add(CHECKSUM_SIZE)
            .ok_or_else(|| AtcError::PayloadOverrun {
                tag: display_tag(&header.tag),
                length: header.length,
                remaining: self.remaining(),
            })?;
        self.check_fits(header, span)?;
        trace!("skipping unknown block '{}' ({span} bytes)", display_tag(&header.tag));
        self.advance(span);
        Ok(())
    }

    /// Walk every block and assemble the document.
    pub fn parse(mut self) -> Result<EcgData> {
        let mut blocks = Blocks::default();

        while let Some((block_start, header)) = self.next_block()? {
            let kind = header.kind();
            debug!(
                "block '{}' at {block_start}, {} payload bytes",
                display_tag(&header.tag),
                header.length
            );
            let offset = self.position() as u64;

            match kind {
                BlockKind::Format => {
                    let fmt = FormatBlock::read(&mut self.cursor)
                        .map_err(AtcError::truncated("format block", offset))?;
                    self.verify(block_start, header.length)?;
                    if blocks.format.replace(fmt).is_some() {
                        warn!("duplicate 'fmt ' block at {block_start} replaces the earlier one");
                    }
                }
                BlockKind::Info => {
                    let info = InfoBlock::read(&mut self.cursor)
                        .map_err(AtcError::truncated("info block", offset))?;
                    self.verify(block_start, header.length)?;
                    if blocks.info.replace(info).is_some() {
                        warn!("duplicate 'info' block at {block_start} replaces the earlier one");
                    }
                }
                BlockKind::Samples(lead) => {
                    self.payload_size(&header)?;
                    let samples = self.read_samples(lead, header.length)?;
                    self.verify(block_start, header.length)?;
                    if blocks.samples.get(lead).is_some() {
                        warn!("duplicate {lead} block at {block_start} replaces the earlier one");
                    }
                    blocks.samples.set(lead, samples);
                }
                BlockKind::Unknown(_) => self.skip(&header)?,
            }
        }

        let fmt = blocks.format.ok_or(AtcError::MissingFormatBlock)?;
        if fmt.resolution == 0 {
            return Err(AtcError::ZeroResolution);
        }
        if blocks.samples.get(Lead::I).is_none() {
            warn!("recording has no Lead I samples");
        }

        Ok(EcgData::new(&fmt, blocks.samples, blocks.info.as_ref()))
    }

    /// Walk the block structure without decoding payloads.
    pub fn scan(mut self) -> Result<Vec<BlockSummary>> {
        let mut out = Vec::new();

        while let Some((offset, header)) = self.next_block()? {
            let kind = header.kind();
            let size = self.payload_size(&header)?;

            let (stored, expected) = if kind.is_known() {
                self.check_fits(&header, size)?;
                self.advance(size);
                let stored = stored_checksum(self.data(), self.position())?;
                let expected = expected_checksum(self.data(), offset, header.length)?;
                self.advance(CHECKSUM_SIZE);
                (Some(stored), Some(expected))
            } else {
                self.skip(&header)?;
                (None, None)
            };

            out.push(BlockSummary {
                offset,
                tag: header.tag,
                kind,
                length: header.length,
                stored,
                expected,
            });
        }
        Ok(out)
    }
}

/// One row of [`scan_blocks`] output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    /// Offset of the block header in the file.
    pub offset: usize,
    pub tag: [u8; 4],
    pub kind: BlockKind,
    pub length: u32,
    /// `None` for unknown blocks, which are never verified.
    pub stored: Option<u32>,
    pub expected: Option<u32>,
}

impl BlockSummary {
    pub fn checksum_ok(&self) -> Option<bool> {
        Some(self.stored? == self.expected?)
    }
}

/// List the blocks of an ATC buffer.  Checksum mismatches are reported per
/// block; structural errors still fail.
pub fn scan_blocks(data: &[u8]) -> Result<Vec<BlockSummary>> {
    AtcReader::new(data)?.scan()
}
