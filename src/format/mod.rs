//! Wire formats.
//!
//! Both blobs travel as standard base64 text and decode to fixed-offset
//! layouts:
//!
//! ```text
//! wrapped key: SALT (16) | IV (12) | CIPHERTEXT
//! packet:      ENC_SESSION_KEY (384) | IV (12) | CIPHERTEXT
//! ```

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::Result;

pub mod packet;
pub mod pem;
pub mod wrapped_key;

pub use packet::Packet;
pub use wrapped_key::WrappedKeyBlob;

/// Standard alphabet; accepts input with or without trailing `=` padding.
pub(crate) const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes transport base64, ignoring surrounding whitespace.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(encoded.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decode_ignores_trailing_newline() {
        assert_eq!(decode_base64("aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn decode_accepts_missing_padding() {
        assert_eq!(decode_base64("aGVsbG8").unwrap(), b"hello");
    }

    #[test]
    fn url_safe_alphabet_is_rejected() {
        let err = decode_base64("-_-_").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }
}
