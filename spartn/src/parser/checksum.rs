use crate::Error;

/// Frame CRC selected by the 2-bit `crcType` header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrcType {
    /// CRC-8, polynomial 0x07
    Crc8,
    /// CRC-16/CCITT, polynomial 0x1021
    Crc16,
    /// CRC-24Q, polynomial 0x864CFB
    Crc24,
    /// CRC-32, polynomial 0x04C11DB7, init and xor-out 0xFFFFFFFF
    Crc32,
}

impl CrcType {
    /// Width of the CRC in bits
    pub const fn width(self) -> u32 {
        match self {
            CrcType::Crc8 => 8,
            CrcType::Crc16 => 16,
            CrcType::Crc24 => 24,
            CrcType::Crc32 => 32,
        }
    }

    /// Number of CRC bytes trailing the frame
    pub const fn byte_len(self) -> usize {
        (self.width() / 8) as usize
    }

    /// `(polynomial, initial, xor_out)`
    const fn params(self) -> (u32, u32, u32) {
        match self {
            CrcType::Crc8 => (0x07, 0, 0),
            CrcType::Crc16 => (0x1021, 0, 0),
            CrcType::Crc24 => (0x86_4CFB, 0, 0),
            CrcType::Crc32 => (0x04C1_1DB7, 0xFFFF_FFFF, 0xFFFF_FFFF),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            CrcType::Crc8 => 0,
            CrcType::Crc16 => 1,
            CrcType::Crc24 => 2,
            CrcType::Crc32 => 3,
        }
    }
}

impl TryFrom<u8> for CrcType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CrcType::Crc8),
            1 => Ok(CrcType::Crc16),
            2 => Ok(CrcType::Crc24),
            3 => Ok(CrcType::Crc32),
            other => Err(Error::InvalidCrcType(other)),
        }
    }
}

/// Bit-serial CRC calculator supporting both streaming and single-shot use
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpartnCrcCalc {
    width: u32,
    generator: u64,
    xor_out: u32,
    crc: u64,
}

impl SpartnCrcCalc {
    pub(crate) const fn new(crc_type: CrcType) -> Self {
        let (poly, init, xor_out) = crc_type.params();
        Self::with_params(crc_type.width(), poly, init, xor_out)
    }

    pub(crate) const fn with_params(width: u32, poly: u32, init: u32, xor_out: u32) -> Self {
        Self {
            width,
            generator: (1u64 << width) | poly as u64,
            xor_out,
            crc: init as u64,
        }
    }

    /// Update checksum with new bytes
    pub(crate) const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub(crate) const fn update_byte(&mut self, byte: u8) {
        self.crc ^= (byte as u64) << (self.width - 8);
        let mut bit = 0;
        while bit < 8 {
            self.crc <<= 1;
            if self.crc & (1u64 << self.width) != 0 {
                self.crc ^= self.generator;
            }
            bit += 1;
        }
    }

    /// Get the current checksum result
    pub(crate) const fn result(self) -> u32 {
        (self.crc as u32) ^ self.xor_out
    }

    const fn is_valid(&self, expected: u32) -> bool {
        self.result() == expected
    }

    /// Validate checksum against the trailer of `frame`
    pub(crate) fn validate_result(self, expected: u32, frame: &[u8]) -> Result<(), Error> {
        if self.is_valid(expected) {
            Ok(())
        } else {
            Err(Error::InvalidCrc {
                expected,
                computed: self.result(),
                raw: frame.to_vec(),
            })
        }
    }
}

/// Bit-serial CRC of `data` with a configurable width (8 to 32 bits) and polynomial
pub fn crc(data: &[u8], width: u32, poly: u32, initial: u32, xor_out: u32) -> u32 {
    let mut calc = SpartnCrcCalc::with_params(width, poly, initial, xor_out);
    calc.update(data);
    calc.result()
}

/// CRC of `data` for the given frame CRC type
pub fn compute_crc(data: &[u8], crc_type: CrcType) -> u32 {
    let mut calc = SpartnCrcCalc::new(crc_type);
    calc.update(data);
    calc.result()
}

/// Check `data` against `expected` using the CRC selected by the raw `crcType` value
pub fn valid_crc(data: &[u8], expected: u32, crc_type: u8) -> Result<bool, Error> {
    let crc_type = CrcType::try_from(crc_type)?;
    Ok(compute_crc(data, crc_type) == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &[u8] = b"Hi!";
    const BAD: &[u8] = b"Ho!";
    const EXPECTED: [(u8, u32); 4] = [(0, 0x78), (1, 0x31FD), (2, 0x33_220F), (3, 0x9523_B4B4)];

    #[test]
    fn test_valid_crc_all_types() {
        for (crc_type, expected) in EXPECTED {
            assert!(valid_crc(GOOD, expected, crc_type).unwrap());
            assert!(!valid_crc(BAD, expected, crc_type).unwrap());
        }
    }

    #[test]
    fn test_invalid_crc_type() {
        let err = valid_crc(GOOD, 0x78, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidCrcType(4)));
        assert!(CrcType::try_from(7).is_err());
    }

    #[test]
    fn test_generic_crc_matches_frame_crc() {
        assert_eq!(crc(GOOD, 24, 0x86_4CFB, 0, 0), 0x33_220F);
        assert_eq!(crc(GOOD, 32, 0x04C1_1DB7, 0xFFFF_FFFF, 0xFFFF_FFFF), 0x9523_B4B4);
    }

    #[test]
    fn test_streaming_crc_chunks() {
        let mut calc = SpartnCrcCalc::new(CrcType::Crc24);
        calc.update(&GOOD[..1]);
        calc.update(&GOOD[1..]);
        assert!(calc.validate_result(0x33_220F, GOOD).is_ok());

        let mut calc = SpartnCrcCalc::new(CrcType::Crc24);
        for byte in BAD {
            calc.update_byte(*byte);
        }
        match calc.validate_result(0x33_220F, BAD) {
            Err(Error::InvalidCrc {
                expected,
                computed,
                raw,
            }) => {
                assert_eq!(expected, 0x33_220F);
                assert_ne!(computed, expected);
                assert_eq!(raw, BAD);
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_crc_lengths() {
        assert_eq!(CrcType::Crc8.byte_len(), 1);
        assert_eq!(CrcType::Crc32.byte_len(), 4);
        for raw in 0..4u8 {
            assert_eq!(CrcType::try_from(raw).unwrap().as_u8(), raw);
        }
    }

    // Compute checksum at compile time
    #[allow(dead_code, reason = "constant time evaluated")]
    const fn is_crc_valid(bytes: &[u8], crc_type: CrcType, expected: u32) -> bool {
        let mut calc = SpartnCrcCalc::new(crc_type);
        calc.update(bytes);
        calc.is_valid(expected)
    }

    #[test]
    fn test_const_crc_computation() {
        const _: () = {
            assert!(is_crc_valid(b"Hi!", CrcType::Crc16, 0x31FD));
        };
    }
}
