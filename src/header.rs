use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::error::{AtcError, Result};

pub const SIGNATURE: &[u8; 8] = b"ALIVE\0\0\0";
pub const FILE_HEADER_SIZE: usize = 12;

/// Fixed 12-byte record at the start of every ATC file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: [u8; 8],
    pub version: u32,
}

impl FileHeader {
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut signature = [0u8; 8];
        reader
            .read_exact(&mut signature)
            .map_err(|_| AtcError::InvalidSignature)?;
        if &signature != SIGNATURE {
            return Err(AtcError::InvalidSignature);
        }
        let version = reader
            .read_u32::<LittleEndian>()
            .map_err(AtcError::truncated("file header", 8))?;
        Ok(Self { signature, version })
    }
}
