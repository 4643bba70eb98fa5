use zeroize::Zeroizing;

use super::kdf::{self, Argon2Output, KdfParams, Salt};
use super::{IV_LEN, aead};
use crate::error::Result;
use crate::key::PrivateKeyHandle;

/// The primitives the pipeline needs, passed in explicitly rather than
/// reached through global state.
///
/// Implementations are called from a blocking thread pool and may take as
/// long as the primitive needs.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Argon2id over `password` (already context-prefixed) and `salt`.
    fn argon2id(&self, params: &KdfParams, password: &[u8], salt: &Salt) -> Result<Argon2Output>;

    /// AES-GCM authenticated decryption with a raw key.
    fn aes_gcm_decrypt(
        &self,
        key: &[u8],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>>;

    /// RSA-OAEP (SHA-256) decryption.
    fn rsa_oaep_decrypt(
        &self,
        key: &PrivateKeyHandle,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>>;

    /// Imports PKCS#8 DER as a decrypt-only RSA-OAEP key.
    fn import_private_key(&self, pkcs8_der: &[u8]) -> Result<PrivateKeyHandle>;
}

/// [`CryptoProvider`] backed by the RustCrypto `argon2`, `aes-gcm` and `rsa` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl CryptoProvider for RustCryptoProvider {
    fn argon2id(&self, params: &KdfParams, password: &[u8], salt: &Salt) -> Result<Argon2Output> {
        kdf::argon2id(params, password, salt)
    }

    fn aes_gcm_decrypt(
        &self,
        key: &[u8],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        aead::decrypt(key, iv, ciphertext)
    }

    fn rsa_oaep_decrypt(
        &self,
        key: &PrivateKeyHandle,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        key.decrypt_oaep(ciphertext)
    }

    fn import_private_key(&self, pkcs8_der: &[u8]) -> Result<PrivateKeyHandle> {
        PrivateKeyHandle::from_pkcs8_der(pkcs8_der)
    }
}
