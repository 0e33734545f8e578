//! Block checksum.
//!
//! Every block is followed by a u32 LE value equal to the wrapping sum of the
//! block's header and payload bytes, each byte taken as a *signed* `i8`.
//! Bytes `>= 0x80` therefore subtract from the running total.

use byteorder::{ByteOrder, LittleEndian};

use crate::block::{BLOCK_HEADER_SIZE, CHECKSUM_SIZE};
use crate::error::{AtcError, Result};

pub fn calc_checksum(data: &[u8]) -> u32 {
    data.iter()
        .fold(0i32, |sum, &b| sum.wrapping_add(b as i8 as i32)) as u32
}

/// Checksum computed over `data[block_start .. block_start + 8 + length]`.
pub fn expected_checksum(data: &[u8], block_start: usize, length: u32) -> Result<u32> {
    let end = block_start
        .checked_add(BLOCK_HEADER_SIZE)
        .and_then(|e| e.checked_add(length as usize))
        .filter(|&e| e <= data.len())
        .ok_or(AtcError::Truncated { what: "checksummed span", offset: block_start })?;
    Ok(calc_checksum(&data[block_start..end]))
}

/// Stored checksum found at `cursor`.
pub fn stored_checksum(data: &[u8], cursor: usize) -> Result<u32> {
    data.get(cursor..cursor + CHECKSUM_SIZE)
        .map(LittleEndian::read_u32)
        .ok_or(AtcError::Truncated { what: "block checksum", offset: cursor })
}

/// Compare the checksum stored right after a block's payload with the value
/// recomputed from the original buffer.
///
/// `cursor` is the offset just past the decoded payload.  On success the
/// caller advances its cursor by [`CHECKSUM_SIZE`].
pub fn verify_checksum(data: &[u8], block_start: usize, length: u32, cursor: usize) -> Result<()> {
    let stored = stored_checksum(data, cursor)?;
    let expected = expected_checksum(data, block_start, length)?;
    if stored != expected {
        return Err(AtcError::ChecksumMismatch { expected, stored });
    }
    Ok(())
}
