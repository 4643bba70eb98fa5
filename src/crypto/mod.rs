//! Cryptographic primitives and protocol constants.
//!
//! Provides password-based key derivation, AES-GCM decryption and the
//! [`CryptoProvider`] seam the pipeline calls through.

pub mod aead;
pub mod kdf;
pub mod provider;

pub use kdf::{Argon2Output, Context, KdfParams, LoginHash, Salt, WrappingKey};
pub use provider::{CryptoProvider, RustCryptoProvider};

/// Length of the Argon2id salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the AES-GCM IV (12 bytes).
pub const IV_LEN: usize = 12;
/// Length of a derived key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// RSA modulus size in bytes (3072 bits), and so the size of an OAEP ciphertext.
pub const RSA_MODULUS_LEN: usize = 3072 / 8;

/// Smallest valid wrapped key blob: salt and IV with an empty ciphertext.
pub const WRAPPED_KEY_HEADER_LEN: usize = SALT_LEN + IV_LEN;
/// Smallest valid packet: encrypted session key and IV with an empty ciphertext.
pub const PACKET_HEADER_LEN: usize = RSA_MODULUS_LEN + IV_LEN;

/// Argon2id memory cost in KiB (128 MiB).
pub const ARGON2_M: u32 = 131_072;
/// Argon2id passes.
pub const ARGON2_T: u32 = 1;
/// Argon2id lanes.
pub const ARGON2_P: u32 = 4;
