//! Unwrapped recipient key.

use std::fmt;
use std::sync::Arc;

use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::RSA_MODULUS_LEN;
use crate::error::{Error, Result};

/// An RSA private key usable only for RSA-OAEP (SHA-256) decryption.
///
/// There is no way to read the private key material back out. Cloning is
/// cheap and shares the same key.
#[derive(Clone)]
pub struct PrivateKeyHandle {
    key: Arc<RsaPrivateKey>,
}

impl PrivateKeyHandle {
    /// Import a PKCS#8 DER encoded RSA key with a 3072-bit modulus.
    pub(crate) fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| Error::KeyImport(format!("not a PKCS#8 RSA private key: {e}")))?;

        if key.size() != RSA_MODULUS_LEN {
            return Err(Error::KeyImport(format!(
                "expected a {}-bit modulus, got {} bits",
                RSA_MODULUS_LEN * 8,
                key.n().bits()
            )));
        }

        key.validate()
            .map_err(|e| Error::KeyImport(format!("inconsistent RSA key: {e}")))?;

        Ok(Self { key: Arc::new(key) })
    }

    pub(crate) fn decrypt_oaep(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.key
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| Error::Decryption)
    }

    /// The matching public key, for sealing data to this recipient.
    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("bits", &(self.key.size() * 8))
            .finish_non_exhaustive()
    }
}
