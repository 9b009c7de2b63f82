use std::{
    fmt,
    io::{ErrorKind, Read},
};

use bitflags::bitflags;
use log::{debug, error, trace, warn};

use crate::{
    constants::{SPARTN_FRAME_START_LEN, SPARTN_PAYLOAD_DESC_LEN, SPARTN_PREAMBLE},
    crypto::{CipherMode, Key},
    error::{Error, FrameStage},
    message::{DecodeOptions, MessageBuilder, SpartnMessage},
    timetag::{Basedate, Timetags},
};

pub mod checksum;
pub mod header;

use header::{payload_descriptor_len, time_tag_type, FrameHeader, FrameStart, TimeTagType};

bitflags! {
    /// Checks applied to every frame before it is emitted
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Validate: u8 {
        /// Reject frames whose CRC does not match
        const CRC = 0x01;
        /// Reject frames with an unmapped `(msgType, msgSubtype)`
        const MSGID = 0x02;
    }
}

impl Default for Validate {
    fn default() -> Self {
        Validate::CRC
    }
}

/// What the reader does with a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorPolicy {
    /// Skip the offending bytes silently
    Ignore,
    /// Report the error and carry on with the next frame
    #[default]
    Log,
    /// Return the error and stop iterating
    Raise,
}

type ErrorHandler = Box<dyn FnMut(&Error) + Send>;

/// Configures a [`SpartnReader`]
pub struct ReaderBuilder {
    options: DecodeOptions,
    key_hex: Option<String>,
    policy: ErrorPolicy,
    handler: Option<ErrorHandler>,
    timetags: Timetags,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self {
            options: DecodeOptions::default(),
            key_hex: None,
            policy: ErrorPolicy::default(),
            handler: None,
            timetags: Timetags::new(),
        }
    }
}

impl fmt::Debug for ReaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderBuilder")
            .field("options", &self.options)
            .field("policy", &self.policy)
            .field("handler", &self.handler.is_some())
            .field("timetags", &self.timetags)
            .finish_non_exhaustive()
    }
}

impl ReaderBuilder {
    pub fn validate(mut self, validate: Validate) -> Self {
        self.options.validate = validate;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Called for every transport error under [`ErrorPolicy::Log`] in place of `log::error!`
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&Error) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Decrypt and decode payloads. Requires a key.
    pub fn decode(mut self, decode: bool) -> Self {
        self.options.decode = decode;
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.options.key = Some(key);
        self.key_hex = None;
        self
    }

    /// Key as 32 hex digits, validated by [`ReaderBuilder::build`]
    pub fn key_hex(mut self, key: impl Into<String>) -> Self {
        self.key_hex = Some(key.into());
        self.options.key = None;
        self
    }

    pub fn basedate(mut self, basedate: impl Into<Basedate>) -> Self {
        self.options.basedate = basedate.into();
        self
    }

    /// Seed the observed 32-bit time tags, keyed by `msgSubtype`
    pub fn timetags(mut self, timetags: Timetags) -> Self {
        self.timetags = timetags;
        self
    }

    pub fn cipher_mode(mut self, mode: CipherMode) -> Self {
        self.options.cipher_mode = mode;
        self
    }

    /// Wrap `inner`. Fails when decoding is requested and no usable key was
    /// given, either directly or through the `MQTTKEY` environment variable.
    pub fn build<R: Read>(self, inner: R) -> Result<SpartnReader<R>, Error> {
        let mut options = self.options;
        if let Some(hex) = self.key_hex {
            options.key = Some(hex.parse()?);
        }
        if options.key.is_none() {
            options.key = Key::from_env().transpose()?;
        }
        if options.decode && options.key.is_none() {
            return Err(Error::MissingKey);
        }
        Ok(SpartnReader {
            inner,
            options,
            policy: self.policy,
            handler: self.handler,
            timetags: self.timetags,
            halted: false,
        })
    }
}

/// Reads SPARTN frames from a byte stream.
///
/// Bytes before a preamble are discarded. Every call to [`SpartnReader::read`]
/// consumes exactly one frame, so the stream is never read ahead.
pub struct SpartnReader<R> {
    inner: R,
    options: DecodeOptions,
    policy: ErrorPolicy,
    handler: Option<ErrorHandler>,
    timetags: Timetags,
    halted: bool,
}

impl<R> fmt::Debug for SpartnReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpartnReader")
            .field("options", &self.options)
            .field("policy", &self.policy)
            .field("timetags", &self.timetags)
            .finish_non_exhaustive()
    }
}

impl SpartnReader<()> {
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::default()
    }
}

impl<R: Read> SpartnReader<R> {
    /// Reader with default settings: CRC validation, no decoding, [`ErrorPolicy::Log`]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            options: DecodeOptions::default(),
            policy: ErrorPolicy::default(),
            handler: None,
            timetags: Timetags::new(),
            halted: false,
        }
    }

    /// Next frame from the stream, `Ok(None)` once the stream is exhausted.
    ///
    /// Transport errors are handled according to the [`ErrorPolicy`];
    /// truncated frames, I/O failures and payload errors are always returned.
    pub fn read(&mut self) -> Result<Option<SpartnMessage>, Error> {
        loop {
            match self.read_message() {
                Ok(message) => return Ok(message),
                Err(err) if is_recoverable(&err) => match self.policy {
                    ErrorPolicy::Raise => return Err(err),
                    ErrorPolicy::Log => self.report(&err),
                    ErrorPolicy::Ignore => trace!("ignored: {err}"),
                },
                Err(err) => return Err(err),
            }
        }
    }

    /// The 32-bit time tags seen so far, keyed by `msgSubtype`
    pub fn timetags(&self) -> &Timetags {
        &self.timetags
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn report(&mut self, err: &Error) {
        match self.handler.as_mut() {
            Some(handler) => handler(err),
            None => error!("{err}"),
        }
    }

    fn read_message(&mut self) -> Result<Option<SpartnMessage>, Error> {
        let Some(raw) = self.read_frame()? else {
            return Ok(None);
        };
        let builder = MessageBuilder::from_frame(raw, self.options.validate)?;
        let header = *builder.header();
        if header.time_tag_type == TimeTagType::Full {
            self.timetags
                .observe(header.msg_subtype, header.gnss_time_tag);
        }
        debug!(
            "{} frame, nData {}, {} bytes",
            builder.identity(),
            header.n_data,
            header.frame_len()
        );

        let message = if self.options.decode {
            builder.decode(&self.options, &self.timetags)?
        } else {
            builder.build()
        };
        Ok(Some(message))
    }

    /// Raw bytes of the next frame, preamble through CRC
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if !self.seek_preamble()? {
            return Ok(None);
        }
        let mut raw = vec![SPARTN_PREAMBLE];

        self.read_stage(&mut raw, SPARTN_FRAME_START_LEN, FrameStage::FrameStart)?;
        let start = FrameStart::parse(&raw[1..])?;

        let desc_start = raw.len();
        self.read_stage(&mut raw, SPARTN_PAYLOAD_DESC_LEN, FrameStage::PayloadDescriptor)?;
        let desc_len = payload_descriptor_len(time_tag_type(&raw[desc_start..])?, start.eaf);
        self.read_stage(
            &mut raw,
            desc_len - SPARTN_PAYLOAD_DESC_LEN,
            FrameStage::PayloadDescriptor,
        )?;

        let header = FrameHeader::parse(&raw[1..])?;
        self.read_stage(&mut raw, usize::from(header.n_data), FrameStage::Payload)?;
        self.read_stage(&mut raw, header.embedded_auth_len(), FrameStage::EmbeddedAuth)?;
        self.read_stage(&mut raw, header.crc_len(), FrameStage::Crc)?;
        Ok(Some(raw))
    }

    /// Discard bytes up to and including the next preamble. `false` at end of stream.
    fn seek_preamble(&mut self) -> Result<bool, Error> {
        let mut discarded = 0usize;
        let found = loop {
            let mut byte = [0u8; 1];
            if self.fill(&mut byte)? == 0 {
                break false;
            }
            if byte[0] == SPARTN_PREAMBLE {
                break true;
            }
            if self.policy == ErrorPolicy::Raise {
                return Err(Error::UnknownPreamble(byte[0]));
            }
            discarded += 1;
        };
        if discarded > 0 {
            match self.policy {
                ErrorPolicy::Log => warn!("discarded {discarded} bytes seeking preamble"),
                _ => trace!("discarded {discarded} bytes seeking preamble"),
            }
        }
        Ok(found)
    }

    fn read_stage(&mut self, raw: &mut Vec<u8>, len: usize, stage: FrameStage) -> Result<(), Error> {
        if len == 0 {
            return Ok(());
        }
        let start = raw.len();
        raw.resize(start + len, 0);
        let returned = self.fill(&mut raw[start..])?;
        if returned < len {
            return Err(Error::Truncated {
                stage,
                requested: len,
                returned,
            });
        }
        trace!("read {len} bytes of {stage}");
        Ok(())
    }

    /// Read until `buf` is full or the stream has nothing more to give
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {},
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    break
                },
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }
}

/// Errors confined to a single frame, after which the stream is still usable
fn is_recoverable(err: &Error) -> bool {
    err.is_transport() && !matches!(err, Error::Truncated { .. } | Error::Io(_))
}

impl<R: Read> Iterator for SpartnReader<R> {
    type Item = Result<SpartnMessage, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        match self.read() {
            Ok(message) => message.map(Ok),
            Err(err) => {
                self.halted = self.policy == ErrorPolicy::Raise
                    || matches!(err, Error::Truncated { .. } | Error::Io(_));
                Some(Err(err))
            },
        }
    }
}
