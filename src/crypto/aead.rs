use aes_gcm::{
    Aes128Gcm, Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroizing;

use super::IV_LEN;
use crate::error::{Error, Result};

/// Decrypt an AES-GCM ciphertext (tag appended) under a raw 128- or 256-bit key.
///
/// Any authentication failure, including a ciphertext too short to carry a
/// tag, is [`Error::Decryption`].
pub fn decrypt(key: &[u8], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let nonce = Nonce::from_slice(iv);

    let plaintext = match key.len() {
        16 => Aes128Gcm::new_from_slice(key)
            .map_err(|e| Error::KeyImport(format!("invalid AES key: {e}")))?
            .decrypt(nonce, ciphertext),
        32 => Aes256Gcm::new_from_slice(key)
            .map_err(|e| Error::KeyImport(format!("invalid AES key: {e}")))?
            .decrypt(nonce, ciphertext),
        n => {
            return Err(Error::KeyImport(format!(
                "unsupported AES key length: {n} bytes"
            )));
        }
    }
    .map_err(|_| Error::Decryption)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seal(key: &[u8; 32], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
        Aes256Gcm::new_from_slice(key)
            .unwrap()
            .encrypt(Nonce::from_slice(iv), plaintext)
            .unwrap()
    }

    #[test]
    fn decrypt_roundtrip() {
        let key = [42u8; 32];
        let iv = [1u8; IV_LEN];
        let ct = seal(&key, &iv, b"secret data");

        let pt = decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(pt.as_slice(), b"secret data");
    }

    #[test]
    fn aes128_key_is_accepted() {
        let key = [3u8; 16];
        let iv = [4u8; IV_LEN];
        let ct = Aes128Gcm::new_from_slice(&key)
            .unwrap()
            .encrypt(Nonce::from_slice(&iv), b"short key".as_slice())
            .unwrap();

        assert_eq!(decrypt(&key, &iv, &ct).unwrap().as_slice(), b"short key");
    }

    #[test]
    fn wrong_key_fails() {
        let iv = [1u8; IV_LEN];
        let ct = seal(&[1u8; 32], &iv, b"secret data");

        assert!(matches!(
            decrypt(&[2u8; 32], &iv, &ct),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [9u8; 32];
        let iv = [1u8; IV_LEN];
        let mut ct = seal(&key, &iv, b"secret data");
        ct[0] ^= 0x01;

        assert!(matches!(decrypt(&key, &iv, &ct), Err(Error::Decryption)));
    }

    #[test]
    fn empty_ciphertext_fails_cleanly() {
        assert!(matches!(
            decrypt(&[0u8; 32], &[0u8; IV_LEN], &[]),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn odd_key_length_is_import_failure() {
        assert!(matches!(
            decrypt(&[0u8; 24], &[0u8; IV_LEN], &[0u8; 32]),
            Err(Error::KeyImport(_))
        ));
    }
}
