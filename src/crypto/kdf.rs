use std::fmt;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use base64::Engine;
use zeroize::Zeroizing;

use super::{ARGON2_M, ARGON2_P, ARGON2_T, KEY_LEN, SALT_LEN};
use crate::error::{Error, Result};
use crate::format::BASE64;

/// Domain separation label prepended to the password before hashing.
///
/// The literal set must stay prefix-free: no literal may be a prefix of
/// another, otherwise `ctx_a || pw1` could equal `ctx_b || pw2`. Adding a
/// context means checking that property again (see the unit tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Login,
    KeyWrap,
    Pin,
}

impl Context {
    pub const ALL: [Context; 3] = [Context::Login, Context::KeyWrap, Context::Pin];

    pub fn literal(self) -> &'static str {
        match self {
            Context::Login => "context:loginAuthentication",
            Context::KeyWrap => "context:asymmetricKeyWrap",
            Context::Pin => "context:fmdPin",
        }
    }

    pub(crate) fn prefix(self, password: &str) -> Zeroizing<Vec<u8>> {
        let literal = self.literal().as_bytes();
        let mut input = Zeroizing::new(Vec::with_capacity(literal.len() + password.len()));
        input.extend_from_slice(literal);
        input.extend_from_slice(password.as_bytes());
        input
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    /// The fixed protocol parameters. Anything else will not interoperate.
    fn default() -> Self {
        Self {
            mem_cost_kib: ARGON2_M,
            time_cost: ARGON2_T,
            parallelism: ARGON2_P,
        }
    }
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_cost < 1 {
            return Err(Error::Kdf("argon2 time cost must be >= 1".into()));
        }
        if self.parallelism < 1 {
            return Err(Error::Kdf("argon2 parallelism must be >= 1".into()));
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return Err(Error::Kdf(
                "argon2 memory cost must be at least 8 * parallelism".into(),
            ));
        }
        Ok(())
    }
}

/// A 16-byte Argon2id salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Decodes a standard-alphabet base64 salt; trailing padding is optional.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64.decode(encoded.trim())?;
        Self::try_from(bytes.as_slice())
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }
}

impl From<[u8; SALT_LEN]> for Salt {
    fn from(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Salt {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let salt: [u8; SALT_LEN] = bytes.try_into().map_err(|_| Error::InvalidSalt {
            expected: SALT_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(salt))
    }
}

/// Both output forms of one Argon2id run.
pub struct Argon2Output {
    encoded: String,
    hash: Zeroizing<[u8; KEY_LEN]>,
}

impl Argon2Output {
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn into_login_hash(self) -> LoginHash {
        LoginHash(self.encoded)
    }

    pub fn into_wrapping_key(self) -> WrappingKey {
        WrappingKey(self.hash)
    }
}

impl fmt::Debug for Argon2Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Output")
            .field("encoded", &self.encoded)
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

/// Encoded PHC digest used for login equality checks. Never a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginHash(String);

impl LoginHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw 32-byte AES key for unwrapping a private key. Zeroized on drop.
pub struct WrappingKey(Zeroizing<[u8; KEY_LEN]>);

impl WrappingKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for WrappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WrappingKey([REDACTED])")
    }
}

/// Runs Argon2id over an already context-prefixed password.
pub fn argon2id(params: &KdfParams, password: &[u8], salt: &Salt) -> Result<Argon2Output> {
    params.validate()?;

    let argon2_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| Error::Kdf(format!("failed to construct Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let salt_string = SaltString::encode_b64(salt.as_bytes())
        .map_err(|e| Error::Kdf(format!("invalid salt: {e}")))?;

    let hash = argon2
        .hash_password(password, &salt_string)
        .map_err(|e| Error::Kdf(format!("argon2 key derivation failed: {e}")))?;

    let output = hash
        .hash
        .as_ref()
        .ok_or_else(|| Error::Kdf("argon2 produced no output".into()))?;
    let raw: [u8; KEY_LEN] = output
        .as_bytes()
        .try_into()
        .map_err(|_| Error::Kdf("argon2 output has unexpected length".into()))?;

    Ok(Argon2Output {
        encoded: hash.to_string(),
        hash: Zeroizing::new(raw),
    })
}

/// Extracts the salt embedded in an encoded (PHC) Argon2 digest.
///
/// Login digests are stored server side in encoded form; the salt is handed
/// back to clients from there so they can derive the same digest again.
pub fn salt_from_encoded_hash(encoded: &str) -> Result<Salt> {
    let hash = PasswordHash::new(encoded.trim())
        .map_err(|e| Error::InvalidEncodedHash(e.to_string()))?;
    let salt = hash
        .salt
        .ok_or_else(|| Error::InvalidEncodedHash("no salt field".into()))?;

    Salt::from_base64(salt.as_str())
}
