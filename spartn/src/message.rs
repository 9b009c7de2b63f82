use std::fmt;

use log::debug;

use crate::{
    attributes::{Attributes, FieldValue},
    constants::SPARTN_PREAMBLE,
    crypto::{build_iv, decrypt, CipherMode, Key},
    decoder::decode_payload,
    error::{Error, FrameStage},
    identity::Identity,
    parser::{checksum::SpartnCrcCalc, header::FrameHeader, Validate},
    schema::FieldId,
    timetag::{resolve_timetag, Basedate, Timetags},
};

/// Settings controlling how a frame's payload is decrypted and decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decrypt and decode payloads, otherwise only the transport is parsed
    pub decode: bool,
    pub key: Option<Key>,
    /// Reference date for 16-bit time tags
    pub basedate: Basedate,
    pub cipher_mode: CipherMode,
    pub validate: Validate,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            decode: false,
            key: None,
            basedate: Basedate::Now,
            cipher_mode: CipherMode::Ctr,
            validate: Validate::CRC,
        }
    }
}

/// A complete SPARTN frame and, when requested, its decoded payload
#[derive(Debug, Clone, PartialEq)]
pub struct SpartnMessage {
    raw: Vec<u8>,
    header: FrameHeader,
    identity: Identity,
    payload: Vec<u8>,
    embedded_auth: Vec<u8>,
    crc: u32,
    timetag: Option<u32>,
    decoded: Option<Decoded>,
}

#[derive(Debug, Clone, PartialEq)]
struct Decoded {
    attributes: Attributes,
    padding: u8,
}

impl SpartnMessage {
    /// Parse a single frame held entirely in `raw`, preamble through CRC.
    ///
    /// `timetags` supplies the basedate when [`Basedate::Stream`] is selected.
    pub fn parse(raw: &[u8], options: &DecodeOptions, timetags: &Timetags) -> Result<Self, Error> {
        let builder = MessageBuilder::from_frame(raw.to_vec(), options.validate)?;
        if options.decode {
            builder.decode(options, timetags)
        } else {
            Ok(builder.build())
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn msg_type(&self) -> u8 {
        self.header.msg_type
    }

    pub fn msg_subtype(&self) -> u8 {
        self.header.msg_subtype
    }

    /// Payload bytes, decrypted when the message was decoded
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn embedded_auth(&self) -> &[u8] {
        &self.embedded_auth
    }

    /// Frame CRC as carried in the trailer
    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Full 32-bit time tag used to build the decryption IV
    pub fn resolved_timetag(&self) -> Option<u32> {
        self.timetag
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }

    /// Trailing bits left over after decoding
    pub fn padding(&self) -> Option<u8> {
        self.decoded.as_ref().map(|d| d.padding)
    }

    /// Decoded payload fields, empty unless the message was decoded
    pub fn attributes(&self) -> &Attributes {
        static EMPTY: std::sync::OnceLock<Attributes> = std::sync::OnceLock::new();
        match &self.decoded {
            Some(decoded) => &decoded.attributes,
            None => EMPTY.get_or_init(Attributes::default),
        }
    }

    /// Value of `field` at the given group ordinals, e.g.
    /// `get(FieldId::Sf032, &[1])` for the first area's latitude
    pub fn get(&self, field: FieldId, ordinals: &[u16]) -> Option<&FieldValue> {
        self.attributes().get(field, ordinals)
    }

    /// The frame exactly as read, preamble through CRC
    pub fn serialize(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }
}

impl fmt::Display for SpartnMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        write!(
            f,
            "<SPARTN({}, msgType={}, nData={}, eaf={}, crcType={}, frameCrc={}, msgSubtype={}, timeTagtype={}, gnssTimeTag={}, solutionId={}, solutionProcId={}",
            self.identity,
            h.msg_type,
            h.n_data,
            u8::from(h.eaf()),
            h.crc_type.as_u8(),
            h.frame_crc,
            h.msg_subtype,
            h.time_tag_type.as_u8(),
            h.gnss_time_tag,
            h.solution_id,
            h.solution_proc_id,
        )?;
        if let Some(enc) = h.encryption {
            write!(
                f,
                ", encryptionId={}, encryptionSeq={}, authInd={}, embAuthLen={}",
                enc.encryption_id, enc.encryption_seq, enc.auth_ind, enc.emb_auth_len
            )?;
        }
        if !self.embedded_auth.is_empty() {
            f.write_str(", embAuth=0x")?;
            self.embedded_auth
                .iter()
                .try_for_each(|b| write!(f, "{b:02x}"))?;
        }
        write!(f, ", crc={}", self.crc)?;
        for attr in self.attributes() {
            write!(f, ", {}={}", attr.name(), attr.value)?;
        }
        if self.identity.is_unknown() {
            f.write_str(", Not_Yet_Implemented")?;
        }
        f.write_str(")>")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SpartnMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SpartnMessage", 5)?;
        state.serialize_field("identity", &self.identity)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("crc", &self.crc)?;
        state.serialize_field("padding", &self.padding())?;
        state.serialize_field("attributes", self.attributes())?;
        state.end()
    }
}

/// Accumulates a message from a validated frame; decoding happens once in
/// [`MessageBuilder::decode`] and the result is read-only from then on.
#[derive(Debug)]
pub struct MessageBuilder {
    raw: Vec<u8>,
    header: FrameHeader,
    identity: Identity,
    crc: u32,
}

impl MessageBuilder {
    /// Split a complete frame into its transport parts, checking the CRC
    /// and identity as `validate` requests
    pub fn from_frame(raw: Vec<u8>, validate: Validate) -> Result<Self, Error> {
        match raw.first() {
            Some(&SPARTN_PREAMBLE) => {},
            Some(other) => return Err(Error::UnknownPreamble(*other)),
            None => {
                return Err(Error::Truncated {
                    stage: FrameStage::FrameStart,
                    requested: 1,
                    returned: 0,
                })
            },
        }
        let header = FrameHeader::parse(&raw[1..])?;
        let frame_len = header.frame_len();
        if raw.len() < frame_len {
            return Err(Error::Truncated {
                stage: truncated_stage(&header, raw.len()),
                requested: frame_len,
                returned: raw.len(),
            });
        }

        let crc_start = frame_len - header.crc_len();
        let crc = raw[crc_start..frame_len]
            .iter()
            .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
        if validate.contains(Validate::CRC) {
            let mut calc = SpartnCrcCalc::new(header.crc_type);
            calc.update(&raw[1..crc_start]);
            calc.validate_result(crc, &raw[..frame_len])?;
        }

        let identity = Identity::from_ids(header.msg_type, header.msg_subtype);
        if validate.contains(Validate::MSGID) && identity.is_unknown() {
            return Err(Error::UnknownIdentity {
                msg_type: header.msg_type,
                msg_subtype: header.msg_subtype,
            });
        }

        let mut raw = raw;
        raw.truncate(frame_len);
        Ok(Self {
            raw,
            header,
            identity,
            crc,
        })
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    fn payload(&self) -> &[u8] {
        let start = self.header.payload_offset();
        &self.raw[start..start + usize::from(self.header.n_data)]
    }

    fn embedded_auth(&self) -> &[u8] {
        let start = self.header.payload_offset() + usize::from(self.header.n_data);
        &self.raw[start..start + self.header.embedded_auth_len()]
    }

    /// Full 32-bit time tag of the frame, resolving a 16-bit tag against `basedate`
    fn timetag(&self, basedate: &Basedate, timetags: &Timetags) -> Result<u32, Error> {
        let h = &self.header;
        if h.time_tag_type.bits() == 32 {
            return Ok(h.gnss_time_tag);
        }
        let tag = h.gnss_time_tag as u16;
        let base = basedate
            .seconds(h.msg_subtype, timetags)
            .ok_or(Error::AmbiguousTimetagUnresolved {
                msg_subtype: h.msg_subtype,
                timetag: tag,
            })?;
        Ok(resolve_timetag(tag, base))
    }

    /// Finish without decoding the payload
    pub fn build(self) -> SpartnMessage {
        let payload = self.payload().to_vec();
        self.finish(payload, None, None)
    }

    /// Decrypt if needed, then decode the payload against the identity's schema.
    /// Identities without a schema are returned undecoded.
    pub fn decode(self, options: &DecodeOptions, timetags: &Timetags) -> Result<SpartnMessage, Error> {
        let Some(schema) = self.identity.schema() else {
            debug!("{} payload left undecoded", self.identity);
            return Ok(self.build());
        };

        let mut timetag = None;
        let payload = if self.header.eaf() {
            let key = options.key.as_ref().ok_or(Error::MissingKey)?;
            let tag = self.timetag(&options.basedate, timetags)?;
            timetag = Some(tag);
            let iv = build_iv(&self.header, tag);
            decrypt(self.payload(), key, &iv, options.cipher_mode)?
        } else {
            self.payload().to_vec()
        };

        let decoded = decode_payload(&payload, schema).map_err(|source| Error::PayloadDecode {
            identity: self.identity.as_str(),
            source,
        })?;
        let decoded = Decoded {
            attributes: decoded.attributes,
            padding: decoded.padding,
        };
        Ok(self.finish(payload, timetag, Some(decoded)))
    }

    fn finish(self, payload: Vec<u8>, timetag: Option<u32>, decoded: Option<Decoded>) -> SpartnMessage {
        let embedded_auth = self.embedded_auth().to_vec();
        let timetag = timetag.or_else(|| (self.header.time_tag_type.bits() == 32).then_some(self.header.gnss_time_tag));
        SpartnMessage {
            raw: self.raw,
            header: self.header,
            identity: self.identity,
            payload,
            embedded_auth,
            crc: self.crc,
            timetag,
            decoded,
        }
    }
}

fn truncated_stage(header: &FrameHeader, available: usize) -> FrameStage {
    let payload_end = header.payload_offset() + usize::from(header.n_data);
    if available < header.payload_offset() {
        FrameStage::PayloadDescriptor
    } else if available < payload_end {
        FrameStage::Payload
    } else if available < payload_end + header.embedded_auth_len() {
        FrameStage::EmbeddedAuth
    } else {
        FrameStage::Crc
    }
}
