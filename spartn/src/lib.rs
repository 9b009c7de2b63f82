//! # spartn
//!
//! A pure-rust decoder for SPARTN GNSS correction messages: orbit, clock and
//! bias corrections (OCB), high precision atmosphere corrections (HPAC),
//! geographic area definitions (GAD), basic precision atmosphere corrections
//! (BPAC) and encryption and authentication support (EAS).
//!
//! A command line dump tool built on this library lives in the `demos/spartn-dump`
//! subfolder of this project.
//!
//! Reading Frames
//! ==============
//!
//! A [`SpartnReader`] wraps anything implementing [`std::io::Read`] and yields one
//! [`SpartnMessage`] per frame. Bytes preceding a preamble are skipped, and frame
//! errors are handled according to the reader's [`ErrorPolicy`]:
//! ```
//! use spartn::{Identity, SpartnReader};
//!
//! let log: &[u8] = &[
//!     0x73, 0x00, 0x12, 0xe2, 0x00, 0x7c, 0x10, 0x5b, 0x12, 0x48, 0xf5, 0x09, 0xa0, 0xb4,
//!     0x2b, 0x99, 0x02, 0x15, 0xe2, 0x05, 0x85, 0xb7, 0x83, 0xc5, 0xfd, 0x0f, 0xfe, 0xdf,
//!     0x18, 0xbe, 0x7f, 0x76, 0x20, 0xc3, 0x60, 0x82, 0x98, 0x10, 0x07, 0xdc, 0xeb, 0x82,
//!     0x7f, 0xcf, 0xf8, 0x9e, 0xa3, 0x74, 0x61, 0xad,
//! ];
//! for message in SpartnReader::new(log) {
//!     let message = message.unwrap();
//!     assert_eq!(message.identity(), Identity::OcbGps);
//!     assert_eq!(message.header().n_data, 37);
//! }
//! ```
//!
//! Decoding Payloads
//! =================
//!
//! Payloads are usually AES encrypted. Decoding needs the 128-bit key and, for
//! frames carrying a 16-bit time tag, a basedate to recover the full time tag
//! that goes into the IV:
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use spartn::{FieldId, SpartnReader};
//!
//! let file = std::fs::File::open("corrections.log")?;
//! let reader = SpartnReader::builder()
//!     .decode(true)
//!     .key_hex("6b30302427df05b4d98911ebff3a4d95")
//!     .basedate(Utc.with_ymd_and_hms(2023, 6, 27, 22, 3, 0).unwrap())
//!     .build(std::io::BufReader::new(file))?;
//! for message in reader {
//!     let message = message?;
//!     if let Some(lat) = message.get(FieldId::Sf032, &[1]) {
//!         println!("{}: first area latitude {:?}", message.identity(), lat.as_f64());
//!     }
//! }
//! # Ok::<(), spartn::Error>(())
//! ```
//!
//! Decoded fields are addressed by [`FieldId`] and the 1-based ordinals of the
//! repeating groups that contain them. [`SpartnMessage`]'s `Display` lists them
//! all in decode order.
//!
//! Features
//! ========
//!
//! - `crypto` (default): AES-128 decryption through the `aes`, `ctr` and `cbc` crates
//! - `serde`: `Serialize` for messages, headers and decoded values

pub mod attributes;
pub mod bits;
mod constants;
pub mod crypto;
pub mod decoder;
mod error;
mod identity;
mod message;
pub mod parser;
pub mod schema;
pub mod timetag;

pub use crate::{
    attributes::{Attribute, Attributes, FieldValue, OrdinalPath},
    constants::{HALF_DAY_SECS, KEY_ENV_VAR, SPARTN_MAX_PAYLOAD_LEN, SPARTN_PREAMBLE},
    crypto::{CipherMode, Key},
    error::{DecodeError, Error, FrameStage, OutOfRange},
    identity::Identity,
    message::{DecodeOptions, MessageBuilder, SpartnMessage},
    parser::{
        checksum::CrcType,
        header::{EncryptionDescriptor, FrameHeader, TimeTagType},
        ErrorPolicy, ReaderBuilder, SpartnReader, Validate,
    },
    schema::FieldId,
    timetag::{Basedate, Timetags},
};
