//! AES-128 payload encryption
//!
//! Encrypted SPARTN payloads use AES-128 in counter mode with an IV built from
//! the frame header. CBC is available for completeness. When the crate is
//! built without the `crypto` feature every operation returns
//! [`Error::CryptoUnavailable`].

use std::{fmt, str::FromStr};

use crate::{constants::KEY_ENV_VAR, parser::header::FrameHeader, Error};

pub const BLOCK_LEN: usize = 16;

/// Block cipher mode of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherMode {
    #[default]
    Ctr,
    Cbc,
}

/// 128-bit AES key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Key([u8; 16]);

impl Key {
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Key from the `MQTTKEY` environment variable, if set
    pub fn from_env() -> Option<Result<Self, Error>> {
        std::env::var(KEY_ENV_VAR).ok().map(|hex| hex.parse())
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse a key from 32 hexadecimal digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 32 {
            return Err(Error::InvalidKey(format!(
                "expected 32 hex digits, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let digits = s.get(2 * i..2 * i + 2).unwrap_or_default();
            *byte = u8::from_str_radix(digits, 16)
                .map_err(|_| Error::InvalidKey(format!("invalid hex digits {digits:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

// keep key material out of logs
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

/// Build the 128-bit initialisation vector of an encrypted frame.
///
/// `timetag` is the frame's full 32-bit time tag, resolved beforehand when the
/// frame only carries 16 bits.
pub fn build_iv(header: &FrameHeader, timetag: u32) -> [u8; 16] {
    let (encryption_id, encryption_seq) = header
        .encryption
        .map(|enc| (enc.encryption_id, enc.encryption_seq))
        .unwrap_or_default();
    let iv = (u128::from(header.msg_type) << 121)
        | (u128::from(header.n_data) << 111)
        | (u128::from(header.msg_subtype) << 107)
        | (u128::from(timetag) << 75)
        | (u128::from(header.solution_id) << 68)
        | (u128::from(header.solution_proc_id) << 64)
        | (u128::from(encryption_id) << 60)
        | (u128::from(encryption_seq) << 54)
        | 1;
    iv.to_be_bytes()
}

/// Pad to a whole number of blocks, each pad byte holding the pad length
fn pad(plaintext: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - plaintext.len() % BLOCK_LEN;
    let mut buf = Vec::with_capacity(plaintext.len() + pad);
    buf.extend_from_slice(plaintext);
    buf.resize(plaintext.len() + pad, pad as u8);
    buf
}

#[cfg(feature = "crypto")]
mod imp {
    use aes::{
        cipher::{
            block_padding::NoPadding, generic_array::GenericArray, BlockDecryptMut,
            BlockEncryptMut, KeyIvInit, StreamCipher,
        },
        Aes128,
    };

    use super::{CipherMode, Key, BLOCK_LEN};
    use crate::Error;

    type Aes128Ctr = ctr::Ctr128BE<Aes128>;
    type Aes128CbcEnc = cbc::Encryptor<Aes128>;
    type Aes128CbcDec = cbc::Decryptor<Aes128>;

    pub(super) fn apply(
        mut buf: Vec<u8>,
        key: &Key,
        iv: &[u8; 16],
        mode: CipherMode,
        encrypt: bool,
    ) -> Result<Vec<u8>, Error> {
        let key = GenericArray::from(*key.as_bytes());
        let iv = GenericArray::from(*iv);
        let len = buf.len();
        if mode == CipherMode::Cbc && len % BLOCK_LEN != 0 {
            return Err(Error::CipherLength(len));
        }
        match (mode, encrypt) {
            (CipherMode::Ctr, _) => Aes128Ctr::new(&key, &iv).apply_keystream(&mut buf),
            (CipherMode::Cbc, true) => {
                Aes128CbcEnc::new(&key, &iv)
                    .encrypt_padded_mut::<NoPadding>(&mut buf, len)
                    .map_err(|_| Error::CipherLength(len))?;
            },
            (CipherMode::Cbc, false) => {
                Aes128CbcDec::new(&key, &iv)
                    .decrypt_padded_mut::<NoPadding>(&mut buf)
                    .map_err(|_| Error::CipherLength(len))?;
            },
        }
        Ok(buf)
    }
}

#[cfg(not(feature = "crypto"))]
mod imp {
    use super::{CipherMode, Key};
    use crate::Error;

    pub(super) fn apply(
        _buf: Vec<u8>,
        _key: &Key,
        _iv: &[u8; 16],
        _mode: CipherMode,
        _encrypt: bool,
    ) -> Result<Vec<u8>, Error> {
        Err(Error::CryptoUnavailable)
    }
}

/// Whether the crate was built with payload decryption support
pub const fn crypto_available() -> bool {
    cfg!(feature = "crypto")
}

/// Decrypt `ciphertext`. In counter mode the output has the input length;
/// in CBC mode the input must be a whole number of blocks.
pub fn decrypt(
    ciphertext: &[u8],
    key: &Key,
    iv: &[u8; 16],
    mode: CipherMode,
) -> Result<Vec<u8>, Error> {
    imp::apply(ciphertext.to_vec(), key, iv, mode, false)
}

/// Encrypt `plaintext` after padding it to a whole number of blocks.
///
/// Returns the ciphertext and the number of pad bytes appended.
pub fn encrypt(
    plaintext: &[u8],
    key: &Key,
    iv: &[u8; 16],
    mode: CipherMode,
) -> Result<(Vec<u8>, usize), Error> {
    let padded = pad(plaintext);
    let pad_len = padded.len() - plaintext.len();
    Ok((imp::apply(padded, key, iv, mode, true)?, pad_len))
}
