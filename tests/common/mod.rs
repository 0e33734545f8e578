//! Fixture builder for ATC files.  Test-only: the crate itself never writes
//! the format.

#![allow(dead_code)]

use atc2json::calc_checksum;
use byteorder::{LittleEndian, WriteBytesExt};

pub const INFO_SLOTS: [usize; 7] = [32, 40, 44, 32, 32, 32, 52];

pub struct AtcBuilder {
    buf: Vec<u8>,
}

impl AtcBuilder {
    pub fn new() -> Self {
        let mut buf = b"ALIVE\0\0\0".to_vec();
        buf.write_u32::<LittleEndian>(1).unwrap();
        Self { buf }
    }

    /// Append a block with a correct trailing checksum.
    pub fn block(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        let start = self.buf.len();
        self.raw_header(tag, payload.len() as u32);
        self.buf.extend_from_slice(payload);
        let sum = calc_checksum(&self.buf[start..]);
        self.buf.write_u32::<LittleEndian>(sum).unwrap();
        self
    }

    /// Append a block whose trailing checksum is `checksum` verbatim.
    pub fn block_with_checksum(mut self, tag: &[u8; 4], payload: &[u8], checksum: u32) -> Self {
        self.raw_header(tag, payload.len() as u32);
        self.buf.extend_from_slice(payload);
        self.buf.write_u32::<LittleEndian>(checksum).unwrap();
        self
    }

    pub fn fmt(self, frequency: u16, resolution: u16, flags: u8) -> Self {
        self.block(b"fmt ", &fmt_payload(frequency, resolution, flags))
    }

    pub fn ecg(self, tag: &[u8; 4], samples: &[i16]) -> Self {
        let mut payload = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            payload.write_i16::<LittleEndian>(*s).unwrap();
        }
        self.block(tag, &payload)
    }

    pub fn info(self, fields: [&str; 7]) -> Self {
        let mut payload = Vec::new();
        for (text, width) in fields.iter().zip(INFO_SLOTS) {
            let mut slot = vec![0u8; width];
            slot[..text.len()].copy_from_slice(text.as_bytes());
            payload.extend_from_slice(&slot);
        }
        self.block(b"info", &payload)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    fn raw_header(&mut self, tag: &[u8; 4], length: u32) {
        self.buf.extend_from_slice(tag);
        self.buf.write_u32::<LittleEndian>(length).unwrap();
    }
}

pub fn fmt_payload(frequency: u16, resolution: u16, flags: u8) -> Vec<u8> {
    let mut p = Vec::with_capacity(8);
    p.write_u8(1).unwrap();
    p.write_u16::<LittleEndian>(frequency).unwrap();
    p.write_u16::<LittleEndian>(resolution).unwrap();
    p.write_u8(flags).unwrap();
    p.write_u16::<LittleEndian>(0).unwrap();
    p
}
