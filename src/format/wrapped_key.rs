use crate::crypto::{IV_LEN, SALT_LEN, Salt, WRAPPED_KEY_HEADER_LEN};
use crate::error::{Error, Result};

/// A password-wrapped private key: `SALT (16) | IV (12) | CIPHERTEXT`.
///
/// The ciphertext is AES-GCM over a PEM encoded PKCS#8 key, tag appended.
#[derive(Debug, Clone)]
pub struct WrappedKeyBlob {
    salt: Salt,
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl WrappedKeyBlob {
    /// Splits a decoded blob at its fixed offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBlob`] if `data` is shorter than 28 bytes.
    /// An empty ciphertext is accepted here and rejected by decryption.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < WRAPPED_KEY_HEADER_LEN {
            return Err(Error::MalformedBlob { len: data.len() });
        }

        let (salt, rest) = data.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        Ok(Self {
            salt: Salt::try_from(salt)?,
            iv: iv
                .try_into()
                .map_err(|_| Error::MalformedBlob { len: data.len() })?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}
