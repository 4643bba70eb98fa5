//! Client-side decryption for Find My Device.
//!
//! A recipient's RSA private key is stored wrapped under a password. This
//! crate turns the password back into that key and opens packets sealed to
//! it:
//!
//! 1. **Key derivation**: Argon2id over `context || password`, where the
//!    context literal keeps login digests and wrapping keys apart.
//! 2. **Unwrap**: AES-GCM decrypts a PEM encoded PKCS#8 key which is then
//!    imported as a decrypt-only [`PrivateKeyHandle`].
//! 3. **Packet decryption**: RSA-OAEP recovers a one-time AES-GCM session
//!    key which decrypts the payload.
//!
//! Every step reports a typed [`Error`]; nothing fails silently.

pub mod crypto;
pub mod error;
pub mod format;
mod key;

use std::sync::Arc;

use tracing::{debug, warn};

pub use crate::crypto::kdf::salt_from_encoded_hash;
pub use crate::crypto::{
    Argon2Output, Context, CryptoProvider, KdfParams, LoginHash, RustCryptoProvider, Salt,
    WrappingKey,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::key::PrivateKeyHandle;
use crate::format::{Packet, WrappedKeyBlob, pem};

/// Entry point to the derive → unwrap → decrypt pipeline.
///
/// Holds no state between calls; each operation is independent and may run
/// concurrently with any other.
pub struct FmdCrypto<P: CryptoProvider = RustCryptoProvider> {
    provider: Arc<P>,
    kdf: KdfParams,
}

impl FmdCrypto<RustCryptoProvider> {
    pub fn new() -> Self {
        Self::with_provider(RustCryptoProvider)
    }
}

impl Default for FmdCrypto<RustCryptoProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CryptoProvider> Clone for FmdCrypto<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            kdf: self.kdf,
        }
    }
}

impl<P: CryptoProvider> FmdCrypto<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            kdf: KdfParams::default(),
        }
    }

    /// Overrides the Argon2id cost parameters.
    ///
    /// Material derived with anything but [`KdfParams::default`] cannot be
    /// read by other implementations of the protocol.
    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Derives both output forms for `context || password` under `salt`.
    pub async fn derive(&self, context: Context, password: &str, salt: &Salt) -> Result<Argon2Output> {
        let provider = Arc::clone(&self.provider);
        let kdf = self.kdf;
        let input = context.prefix(password);
        let salt = *salt;

        debug!(%context, "deriving key material");
        let result = offload(
            move || provider.argon2id(&kdf, &input, &salt),
            || Error::Kdf("derivation task was cancelled".into()),
        )
        .await;

        if let Err(e) = &result {
            warn!(%context, kind = ?e.kind(), error = %e, "key derivation failed");
        }
        result
    }

    /// Encoded digest sent to the server to authenticate.
    pub async fn hash_password_for_login(&self, password: &str, salt: &Salt) -> Result<LoginHash> {
        self.derive(Context::Login, password, salt)
            .await
            .map(Argon2Output::into_login_hash)
    }

    /// Raw AES-256 key that unwraps the private key.
    pub async fn hash_password_for_key_wrap(
        &self,
        password: &str,
        salt: &Salt,
    ) -> Result<WrappingKey> {
        self.derive(Context::KeyWrap, password, salt)
            .await
            .map(Argon2Output::into_wrapping_key)
    }

    /// Unwraps a base64 encoded `SALT | IV | CIPHERTEXT` blob with `password`.
    ///
    /// A wrong password and a corrupted blob both yield [`Error::Decryption`].
    pub async fn unwrap_private_key(
        &self,
        password: &str,
        wrapped_key: &str,
    ) -> Result<PrivateKeyHandle> {
        let result = self.try_unwrap_private_key(password, wrapped_key).await;
        match &result {
            Ok(_) => debug!("private key unwrapped"),
            Err(e) => warn!(kind = ?e.kind(), "private key unwrap failed"),
        }
        result
    }

    async fn try_unwrap_private_key(
        &self,
        password: &str,
        wrapped_key: &str,
    ) -> Result<PrivateKeyHandle> {
        let blob = WrappedKeyBlob::parse(&format::decode_base64(wrapped_key)?)?;
        let key = self.hash_password_for_key_wrap(password, blob.salt()).await?;

        let provider = Arc::clone(&self.provider);
        offload(
            move || {
                let pem_bytes =
                    provider.aes_gcm_decrypt(key.as_bytes(), blob.iv(), blob.ciphertext())?;
                debug!("wrapped key authenticated");
                let der = pem::private_key_der(&pem_bytes)?;
                provider.import_private_key(&der)
            },
            || Error::Decryption,
        )
        .await
    }

    /// Decrypts a base64 encoded `ENC_SESSION_KEY | IV | CIPHERTEXT` packet
    /// and returns the UTF-8 plaintext.
    pub async fn decrypt_packet(&self, key: &PrivateKeyHandle, packet: &str) -> Result<String> {
        let result = self.try_decrypt_packet(key, packet).await;
        if let Err(e) = &result {
            warn!(kind = ?e.kind(), "packet decryption failed");
        }
        result
    }

    async fn try_decrypt_packet(&self, key: &PrivateKeyHandle, packet: &str) -> Result<String> {
        let packet = Packet::parse(&format::decode_base64(packet)?)?;
        debug!(
            ciphertext_len = packet.ciphertext().len(),
            "decrypting packet"
        );

        let provider = Arc::clone(&self.provider);
        let key = key.clone();
        let mut plaintext = offload(
            move || {
                let session_key = provider.rsa_oaep_decrypt(&key, packet.encrypted_session_key())?;
                provider.aes_gcm_decrypt(&session_key, packet.iv(), packet.ciphertext())
            },
            || Error::Decryption,
        )
        .await?;

        Ok(String::from_utf8(std::mem::take(&mut *plaintext))?)
    }
}

/// Runs CPU-bound primitive work on the blocking pool so async callers
/// suspend instead of stalling a worker thread.
async fn offload<T, F>(work: F, cancelled: impl FnOnce() -> Error) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(cancelled()),
    }
}
