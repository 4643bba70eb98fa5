use crate::crypto::{IV_LEN, PACKET_HEADER_LEN, RSA_MODULUS_LEN};
use crate::error::{Error, Result};

/// A hybrid-encrypted packet: `ENC_SESSION_KEY (384) | IV (12) | CIPHERTEXT`.
#[derive(Debug, Clone)]
pub struct Packet {
    encrypted_session_key: Vec<u8>,
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl Packet {
    /// Splits a decoded packet at its fixed offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPacket`] if `data` is shorter than 396 bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PACKET_HEADER_LEN {
            return Err(Error::MalformedPacket { len: data.len() });
        }

        let (session_key, rest) = data.split_at(RSA_MODULUS_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        Ok(Self {
            encrypted_session_key: session_key.to_vec(),
            iv: iv
                .try_into()
                .map_err(|_| Error::MalformedPacket { len: data.len() })?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn encrypted_session_key(&self) -> &[u8] {
        &self.encrypted_session_key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}
