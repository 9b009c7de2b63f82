pub const SPARTN_PREAMBLE: u8 = 0x73; // 's'

pub(crate) const SPARTN_PREAMBLE_LEN: usize = 1;
pub(crate) const SPARTN_FRAME_START_LEN: usize = 3; // msgType(7) nData(10) eaf(1) crcType(2) frameCrc(4)
pub(crate) const SPARTN_PAYLOAD_DESC_LEN: usize = 4; // with a 16-bit time tag
pub(crate) const SPARTN_TIMETAG_EXT_LEN: usize = 2; // extra bytes for a 32-bit time tag
pub(crate) const SPARTN_ENCRYPTION_DESC_LEN: usize = 2; // encryptionId(4) encryptionSeq(6) authInd(3) embAuthLen(3)

/// Largest payload a frame can carry (`nData` is 10 bits)
pub const SPARTN_MAX_PAYLOAD_LEN: usize = 1023;

/// Seconds in half a day, the period of a 16-bit time tag
pub const HALF_DAY_SECS: u32 = 43_200;

/// Embedded authentication length in bytes, indexed by `embAuthLenCode`
pub(crate) const EMBEDDED_AUTH_LEN: [usize; 5] = [8, 12, 16, 32, 64];

/// Environment variable consulted for the decryption key when none is configured
pub const KEY_ENV_VAR: &str = "MQTTKEY";

/// Maximum depth of nested repeating groups in a payload schema
pub(crate) const MAX_GROUP_DEPTH: usize = 4;
