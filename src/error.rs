use std::string::FromUtf8Error;

use crate::crypto::{PACKET_HEADER_LEN, WRAPPED_KEY_HEADER_LEN};

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], stable across variants that share a cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    KdfFailure,
    DecodeFailure,
    MalformedBlob,
    MalformedPacket,
    DecryptionFailure,
    KeyImportFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("plaintext is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("salt must be {expected} bytes, got {actual}")]
    InvalidSalt { expected: usize, actual: usize },

    #[error("invalid encoded argon2 hash: {0}")]
    InvalidEncodedHash(String),

    #[error("wrapped key blob is {len} bytes, need at least {}", WRAPPED_KEY_HEADER_LEN)]
    MalformedBlob { len: usize },

    #[error("packet is {len} bytes, need at least {}", PACKET_HEADER_LEN)]
    MalformedPacket { len: usize },

    /// Authentication failed. Wrong password and tampered data are reported alike.
    #[error("decryption failed")]
    Decryption,

    #[error("key import failed: {0}")]
    KeyImport(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Kdf(_) => ErrorKind::KdfFailure,
            Error::Base64(_)
            | Error::Utf8(_)
            | Error::InvalidSalt { .. }
            | Error::InvalidEncodedHash(_) => ErrorKind::DecodeFailure,
            Error::MalformedBlob { .. } => ErrorKind::MalformedBlob,
            Error::MalformedPacket { .. } => ErrorKind::MalformedPacket,
            Error::Decryption => ErrorKind::DecryptionFailure,
            Error::KeyImport(_) => ErrorKind::KeyImportFailure,
        }
    }

    /// Returns `true` for failures a user should only ever see as "could not unlock".
    pub fn is_unlock_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DecryptionFailure | ErrorKind::KeyImportFailure | ErrorKind::MalformedBlob
        )
    }
}
