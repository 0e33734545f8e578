//! Block-level records of the ATC container.
//!
//! # Layout
//!
//! After the 12-byte file header the stream is a sequence of blocks:
//!
//! ```text
//! [ tag (4 B) | length (u32 LE) | payload (length B) | checksum (u32 LE) ]
//! ```
//!
//! The tag is compared as raw bytes.  `"fmt "` and `"ecg "` carry a literal
//! trailing space.  Tags outside the known set are skipped, which lets newer
//! writers add blocks without breaking older readers.

use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Read};

pub const BLOCK_HEADER_SIZE: usize = 8;
pub const CHECKSUM_SIZE: usize = 4;
pub const FORMAT_BLOCK_SIZE: usize = 8;
pub const INFO_BLOCK_SIZE: usize = 264;

/// Bit in [`FormatBlock::flags`] selecting 60 Hz mains.
pub const FLAG_MAINS_60HZ: u8 = 0x02;

// ── Tags ─────────────────────────────────────────────────────────────────────

pub const TAG_FORMAT: [u8; 4] = *b"fmt ";
pub const TAG_INFO: [u8; 4] = *b"info";
pub const TAG_ECG: [u8; 4] = *b"ecg ";
pub const TAG_ECG2: [u8; 4] = *b"ecg2";
pub const TAG_ECG3: [u8; 4] = *b"ecg3";
pub const TAG_ECG4: [u8; 4] = *b"ecg4";
pub const TAG_ECG5: [u8; 4] = *b"ecg5";
pub const TAG_ECG6: [u8; 4] = *b"ecg6";

/// One ECG sensing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lead {
    I,
    II,
    III,
    AVR,
    AVL,
    AVF,
}

impl Lead {
    pub const ALL: [Lead; 6] = [Lead::I, Lead::II, Lead::III, Lead::AVR, Lead::AVL, Lead::AVF];

    pub fn tag(self) -> [u8; 4] {
        match self {
            Lead::I => TAG_ECG,
            Lead::II => TAG_ECG2,
            Lead::III => TAG_ECG3,
            Lead::AVR => TAG_ECG4,
            Lead::AVL => TAG_ECG5,
            Lead::AVF => TAG_ECG6,
        }
    }

    /// Key used for this lead in the JSON `samples` object.
    pub fn key(self) -> &'static str {
        match self {
            Lead::I => "leadI",
            Lead::II => "leadII",
            Lead::III => "leadIII",
            Lead::AVR => "aVR",
            Lead::AVL => "aVL",
            Lead::AVF => "aVF",
        }
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lead::I => "Lead I",
            Lead::II => "Lead II",
            Lead::III => "Lead III",
            Lead::AVR => "aVR",
            Lead::AVL => "aVL",
            Lead::AVF => "aVF",
        };
        f.write_str(name)
    }
}

/// What a block tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Format,
    Info,
    Samples(Lead),
    Unknown([u8; 4]),
}

impl BlockKind {
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match tag {
            TAG_FORMAT => BlockKind::Format,
            TAG_INFO => BlockKind::Info,
            TAG_ECG => BlockKind::Samples(Lead::I),
            TAG_ECG2 => BlockKind::Samples(Lead::II),
            TAG_ECG3 => BlockKind::Samples(Lead::III),
            TAG_ECG4 => BlockKind::Samples(Lead::AVR),
            TAG_ECG5 => BlockKind::Samples(Lead::AVL),
            TAG_ECG6 => BlockKind::Samples(Lead::AVF),
            _ => BlockKind::Unknown(tag),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlockKind::Unknown(_))
    }
}

/// Printable form of a tag: ASCII when every byte is graphic or a space,
/// hex otherwise.
pub fn display_tag(tag: &[u8; 4]) -> String {
    if tag.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        tag.iter().map(|&b| b as char).collect()
    } else {
        format!("0x{}", hex::encode(tag))
    }
}

// ── Block header ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub tag: [u8; 4],
    /// Payload bytes, excluding the trailing checksum.
    pub length: u32,
}

impl BlockHeader {
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        Ok(Self {
            tag,
            length: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn kind(&self) -> BlockKind {
        BlockKind::from_tag(self.tag)
    }
}

// ── Format block ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatBlock {
    pub format: u8,
    /// Sampling frequency in Hz.
    pub frequency: u16,
    pub resolution: u16,
    pub flags: u8,
    pub reserved: u16,
}

impl FormatBlock {
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        Ok(Self {
            format: reader.read_u8()?,
            frequency: reader.read_u16::<LittleEndian>()?,
            resolution: reader.read_u16::<LittleEndian>()?,
            flags: reader.read_u8()?,
            reserved: reader.read_u16::<LittleEndian>()?,
        })
    }

    pub fn mains_frequency(&self) -> u32 {
        if self.flags & FLAG_MAINS_60HZ != 0 { 60 } else { 50 }
    }

    /// Raw units per millivolt.  Infinite when `resolution` is zero; the
    /// reader rejects that case before a document is built.
    pub fn gain(&self) -> f32 {
        1e6 / self.resolution as f32
    }
}

// ── Info block ───────────────────────────────────────────────────────────────

/// Device and session metadata, kept as the raw fixed-width slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBlock {
    pub date_recorded: [u8; 32],
    pub recording_uuid: [u8; 40],
    pub phone_udid: [u8; 44],
    pub phone_model: [u8; 32],
    pub recorder_software: [u8; 32],
    pub recorder_hardware: [u8; 32],
    pub location: [u8; 52],
}

impl InfoBlock {
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut info = Self {
            date_recorded: [0; 32],
            recording_uuid: [0; 40],
            phone_udid: [0; 44],
            phone_model: [0; 32],
            recorder_software: [0; 32],
            recorder_hardware: [0; 32],
            location: [0; 52],
        };
        reader.read_exact(&mut info.date_recorded)?;
        reader.read_exact(&mut info.recording_uuid)?;
        reader.read_exact(&mut info.phone_udid)?;
        reader.read_exact(&mut info.phone_model)?;
        reader.read_exact(&mut info.recorder_software)?;
        reader.read_exact(&mut info.recorder_hardware)?;
        reader.read_exact(&mut info.location)?;
        Ok(info)
    }
}
