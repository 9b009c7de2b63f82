use std::{fmt, io};

use thiserror::Error;

use crate::schema::FieldId;

/// Stage of the frame reader at which the stream ran dry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    FrameStart,
    PayloadDescriptor,
    Payload,
    EmbeddedAuth,
    Crc,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameStage::FrameStart => "frame start",
            FrameStage::PayloadDescriptor => "payload descriptor",
            FrameStage::Payload => "payload",
            FrameStage::EmbeddedAuth => "embedded authentication",
            FrameStage::Crc => "crc",
        })
    }
}

/// Bit range requested past the end of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{length} bits at bit {position} out of range, buffer holds {available} bits")]
pub struct OutOfRange {
    pub position: usize,
    pub length: usize,
    pub available: usize,
}

/// Error raised while walking a payload schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    #[error("field {field} referenced before it was decoded")]
    UnresolvedField { field: FieldId },
    #[error("field {field} value {value} selects no width")]
    InvalidSelector { field: FieldId, value: u64 },
    #[error("group count {count} from field {field} out of range")]
    InvalidCount { field: FieldId, count: u64 },
    #[error("field {field} outside a group over a matching bitmask")]
    MissingExpansion { field: FieldId },
    #[error("repeating groups nested too deeply")]
    NestingTooDeep,
    #[error("invalid payload padding {padding} bits, key or basedate may be wrong")]
    InvalidPadding { padding: i64 },
}

/// Errors reported while reading and decoding SPARTN frames
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown message preamble {0:#04x}")]
    UnknownPreamble(u8),
    #[error("stream terminated unexpectedly in {stage}: {requested} bytes requested, {returned} bytes returned")]
    Truncated {
        stage: FrameStage,
        requested: usize,
        returned: usize,
    },
    #[error("invalid CRC {expected}, computed {computed}")]
    InvalidCrc {
        expected: u32,
        computed: u32,
        /// Every byte of the offending frame, preamble included
        raw: Vec<u8>,
    },
    #[error("invalid crcType {0}, must be 0-3")]
    InvalidCrcType(u8),
    #[error("unknown message identity, msgType {msg_type} msgSubtype {msg_subtype}")]
    UnknownIdentity { msg_type: u8, msg_subtype: u8 },
    #[error("payload decryption unavailable, built without the `crypto` feature")]
    CryptoUnavailable,
    #[error("key must be provided if decoding is enabled")]
    MissingKey,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("ciphertext length {0} is not a whole number of blocks")]
    CipherLength(usize),
    #[error("no basedate available to resolve 16-bit timetag {timetag} for msgSubtype {msg_subtype}")]
    AmbiguousTimetagUnresolved { msg_subtype: u8, timetag: u16 },
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    #[error("error decoding payload of {identity}: {source}")]
    PayloadDecode {
        identity: &'static str,
        #[source]
        source: DecodeError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Transport level errors are subject to the reader's error policy,
    /// everything else is reported against the frame it belongs to.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::UnknownPreamble(_)
                | Error::Truncated { .. }
                | Error::InvalidCrc { .. }
                | Error::InvalidCrcType(_)
                | Error::UnknownIdentity { .. }
                | Error::Io(_)
        )
    }
}
