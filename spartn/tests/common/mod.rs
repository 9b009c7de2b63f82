//! Shared fixtures and a frame builder for the integration tests.
//!
//! The fixture frames are complete SPARTN frames, preamble through CRC.
//! Encrypted fixtures use [`KEY`].
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use spartn::{parser::checksum::compute_crc, CrcType};

pub const KEY: &str = "6b30302427df05b4d98911ebff3a4d95";

/// SPARTN-1X-GAD, encrypted, 16-bit time tag 32580, eight areas, CRC-24
pub const GAD_FRAME: &str = "7304196203fa205b1fc8310b03d3a4b1db7921cb5c2712a7a8c252fd4afb1a963b642a4ecd86bb317c61def5db3da32c65d5059f1cd996173981a0de78ede7";

/// SPARTN-1X-OCB-GPS, unencrypted, 32-bit time tag 425595000, CRC-16
pub const OCB_FRAME: &str = "73000f1308caf083c05b3250250000003a2d7ffe0087fd0a319434b10040bfff5000107ff221fffebaa4";

/// SPARTN-1X-HPAC-GPS, encrypted, 32-bit time tag 425595800, 8 bytes of
/// embedded authentication, CRC-32
pub const HPAC_FRAME: &str = "73020ff108caf09cc05b131000202bb30a38b29658410bb2032feda9b1d68ab54b92e42744570405a643f1a0a1a2a3a4a5a6a7c6222456";

/// SPARTN-1X-BPAC, unencrypted, 16-bit time tag 1000, CRC-8
pub const BPAC_FRAME: &str = "73060684001f405b961282640933ffd868cb89807e87";

/// SPARTN-1X-EAS-DYN, unencrypted, 16-bit time tag 2000, CRC-24
pub const EAS_FRAME: &str = "73080aa5003e805b1e24013044004488cd115599de2266aaef3377bbfca1a028";

pub fn bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

/// Basedate the GAD fixture was encrypted against
pub fn gad_basedate() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 27, 22, 3, 0).unwrap()
}

/// MSB-first bit packer
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    pub fn put(&mut self, value: u64, width: usize) -> &mut Self {
        for i in (0..width).rev() {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 0x80 >> (self.len % 8);
            }
            self.len += 1;
        }
        self
    }

    pub fn bit_len(&self) -> usize {
        self.len
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encryption descriptor fields: `(encryptionId, encryptionSeq, authInd, embAuthLenCode)`
pub type Encryption = (u8, u8, u8, u8);

/// Transport fields of a frame to build around an already encoded payload
#[derive(Debug, Clone)]
pub struct FrameSpec {
    pub msg_type: u8,
    pub msg_subtype: u8,
    pub full_tag: bool,
    pub tag: u32,
    pub crc_type: u8,
    pub frame_crc: u8,
    pub solution_id: u8,
    pub solution_proc_id: u8,
    pub encryption: Option<Encryption>,
    pub payload: Vec<u8>,
    pub embedded_auth: Vec<u8>,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            msg_type: 0,
            msg_subtype: 0,
            full_tag: false,
            tag: 0,
            crc_type: 2,
            frame_crc: 0,
            solution_id: 5,
            solution_proc_id: 11,
            encryption: None,
            payload: Vec::new(),
            embedded_auth: Vec::new(),
        }
    }
}

impl FrameSpec {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = BitWriter::default();
        header
            .put(u64::from(self.msg_type), 7)
            .put(self.payload.len() as u64, 10)
            .put(u64::from(self.encryption.is_some()), 1)
            .put(u64::from(self.crc_type), 2)
            .put(u64::from(self.frame_crc), 4)
            .put(u64::from(self.msg_subtype), 4)
            .put(u64::from(self.full_tag), 1)
            .put(u64::from(self.tag), if self.full_tag { 32 } else { 16 })
            .put(u64::from(self.solution_id), 7)
            .put(u64::from(self.solution_proc_id), 4);
        if let Some((id, seq, auth_ind, auth_len)) = self.encryption {
            header
                .put(u64::from(id), 4)
                .put(u64::from(seq), 6)
                .put(u64::from(auth_ind), 3)
                .put(u64::from(auth_len), 3);
        }

        let mut frame = vec![0x73];
        frame.extend(header.into_bytes());
        frame.extend_from_slice(&self.payload);
        frame.extend_from_slice(&self.embedded_auth);

        let crc_type = CrcType::try_from(self.crc_type).unwrap();
        let crc = compute_crc(&frame[1..], crc_type);
        let crc_len = usize::from(self.crc_type) + 1;
        frame.extend_from_slice(&crc.to_be_bytes()[4 - crc_len..]);
        frame
    }
}
