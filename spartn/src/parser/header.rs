use crate::{
    bits::extract_bits,
    constants::{
        EMBEDDED_AUTH_LEN, SPARTN_ENCRYPTION_DESC_LEN, SPARTN_FRAME_START_LEN,
        SPARTN_PAYLOAD_DESC_LEN, SPARTN_PREAMBLE_LEN, SPARTN_TIMETAG_EXT_LEN,
    },
    parser::checksum::CrcType,
    Error,
};

/// Width of the GNSS time tag carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TimeTagType {
    /// 16-bit seconds within the current half day
    Short,
    /// 32-bit seconds since 2010-01-01T00:00:00Z
    Full,
}

impl TimeTagType {
    pub const fn bits(self) -> usize {
        match self {
            TimeTagType::Short => 16,
            TimeTagType::Full => 32,
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            TimeTagType::Short => 0,
            TimeTagType::Full => 1,
        }
    }
}

/// Encryption and authentication descriptor of an encrypted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EncryptionDescriptor {
    pub encryption_id: u8,
    pub encryption_seq: u8,
    pub auth_ind: u8,
    pub emb_auth_len: u8,
}

/// Transport fields of a SPARTN frame, everything between preamble and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameHeader {
    pub msg_type: u8,
    pub n_data: u16,
    pub crc_type: CrcType,
    pub frame_crc: u8,
    pub msg_subtype: u8,
    pub time_tag_type: TimeTagType,
    pub gnss_time_tag: u32,
    pub solution_id: u8,
    pub solution_proc_id: u8,
    /// Present when the encryption and authentication flag is set
    pub encryption: Option<EncryptionDescriptor>,
}

/// Fields of the 3-byte frame start needed to size the rest of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameStart {
    pub n_data: u16,
    pub eaf: bool,
    pub crc_type: CrcType,
}

impl FrameStart {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            n_data: extract_bits(bytes, 7, 10)? as u16,
            eaf: extract_bits(bytes, 17, 1)? == 1,
            crc_type: CrcType::try_from(extract_bits(bytes, 18, 2)? as u8)?,
        })
    }
}

/// Length of the payload descriptor that follows the frame start
pub(crate) fn payload_descriptor_len(time_tag_type: TimeTagType, eaf: bool) -> usize {
    let mut len = SPARTN_PAYLOAD_DESC_LEN;
    if time_tag_type == TimeTagType::Full {
        len += SPARTN_TIMETAG_EXT_LEN;
    }
    if eaf {
        len += SPARTN_ENCRYPTION_DESC_LEN;
    }
    len
}

/// Time tag type from the first byte of the payload descriptor
pub(crate) fn time_tag_type(descriptor: &[u8]) -> Result<TimeTagType, Error> {
    Ok(match extract_bits(descriptor, 4, 1)? {
        0 => TimeTagType::Short,
        _ => TimeTagType::Full,
    })
}

/// Embedded authentication length in bytes for a raw `embAuthLenCode`
pub(crate) fn embedded_auth_len(code: u8) -> usize {
    EMBEDDED_AUTH_LEN.get(usize::from(code)).copied().unwrap_or(0)
}

impl FrameHeader {
    /// Parse the header from the frame bytes following the preamble
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let start = FrameStart::parse(bytes)?;
        let msg_type = extract_bits(bytes, 0, 7)? as u8;
        let frame_crc = extract_bits(bytes, 20, 4)? as u8;

        let desc = bytes.get(SPARTN_FRAME_START_LEN..).unwrap_or_default();
        let msg_subtype = extract_bits(desc, 0, 4)? as u8;
        let time_tag_type = time_tag_type(desc)?;
        let mut pos = 5;
        let gnss_time_tag = extract_bits(desc, pos, time_tag_type.bits())? as u32;
        pos += time_tag_type.bits();
        let solution_id = extract_bits(desc, pos, 7)? as u8;
        let solution_proc_id = extract_bits(desc, pos + 7, 4)? as u8;
        pos += 11;

        let encryption = if start.eaf {
            Some(EncryptionDescriptor {
                encryption_id: extract_bits(desc, pos, 4)? as u8,
                encryption_seq: extract_bits(desc, pos + 4, 6)? as u8,
                auth_ind: extract_bits(desc, pos + 10, 3)? as u8,
                emb_auth_len: extract_bits(desc, pos + 13, 3)? as u8,
            })
        } else {
            None
        };

        Ok(Self {
            msg_type,
            n_data: start.n_data,
            crc_type: start.crc_type,
            frame_crc,
            msg_subtype,
            time_tag_type,
            gnss_time_tag,
            solution_id,
            solution_proc_id,
            encryption,
        })
    }

    /// Encryption and authentication flag
    pub fn eaf(&self) -> bool {
        self.encryption.is_some()
    }

    /// Bytes from the end of the preamble to the start of the payload
    pub fn header_len(&self) -> usize {
        SPARTN_FRAME_START_LEN + payload_descriptor_len(self.time_tag_type, self.eaf())
    }

    /// Bytes of embedded authentication data following the payload
    pub fn embedded_auth_len(&self) -> usize {
        match self.encryption {
            Some(enc) if enc.auth_ind > 1 => embedded_auth_len(enc.emb_auth_len),
            _ => 0,
        }
    }

    pub fn crc_len(&self) -> usize {
        self.crc_type.byte_len()
    }

    /// Offset of the payload within the frame, preamble included
    pub fn payload_offset(&self) -> usize {
        SPARTN_PREAMBLE_LEN + self.header_len()
    }

    /// Total frame length, preamble through CRC
    pub fn frame_len(&self) -> usize {
        self.payload_offset() + usize::from(self.n_data) + self.embedded_auth_len() + self.crc_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // encrypted OCB-GPS frame with a 16-bit time tag and CRC-24
    const FRAME: [u8; 50] = [
        0x73, 0x00, 0x12, 0xe2, 0x00, 0x7c, 0x10, 0x5b, 0x12, 0x48, 0xf5, 0x09, 0xa0, 0xb4, 0x2b,
        0x99, 0x02, 0x15, 0xe2, 0x05, 0x85, 0xb7, 0x83, 0xc5, 0xfd, 0x0f, 0xfe, 0xdf, 0x18, 0xbe,
        0x7f, 0x76, 0x20, 0xc3, 0x60, 0x82, 0x98, 0x10, 0x07, 0xdc, 0xeb, 0x82, 0x7f, 0xcf, 0xf8,
        0x9e, 0xa3, 0x74, 0x61, 0xad,
    ];

    #[test]
    fn test_parse_header() {
        let header = FrameHeader::parse(&FRAME[1..]).unwrap();
        assert_eq!(header.msg_type, 0);
        assert_eq!(header.n_data, 37);
        assert!(header.eaf());
        assert_eq!(header.crc_type, CrcType::Crc24);
        assert_eq!(header.frame_crc, 2);
        assert_eq!(header.msg_subtype, 0);
        assert_eq!(header.time_tag_type, TimeTagType::Short);
        assert_eq!(header.gnss_time_tag, 3970);
        assert_eq!(header.solution_id, 5);
        assert_eq!(header.solution_proc_id, 11);
        assert_eq!(
            header.encryption,
            Some(EncryptionDescriptor {
                encryption_id: 1,
                encryption_seq: 9,
                auth_ind: 1,
                emb_auth_len: 0,
            })
        );
        assert_eq!(header.embedded_auth_len(), 0);
        assert_eq!(header.header_len(), 9);
        assert_eq!(header.payload_offset(), 10);
        assert_eq!(header.frame_len(), FRAME.len());
    }

    #[test]
    fn test_parse_truncated_header() {
        assert!(matches!(
            FrameHeader::parse(&FRAME[1..5]),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_embedded_auth_len() {
        assert_eq!(embedded_auth_len(0), 8);
        assert_eq!(embedded_auth_len(4), 64);
        assert_eq!(embedded_auth_len(5), 0);
        assert_eq!(payload_descriptor_len(TimeTagType::Full, true), 8);
        assert_eq!(payload_descriptor_len(TimeTagType::Short, false), 4);
    }
}
