//! Per-secret password encryption.
//!
//! Every secret is sealed on its own: a fresh salt feeds scrypt to derive an
//! AES-256 key, a fresh IV starts CBC mode, and the three pieces are written
//! out as `salt:iv:ciphertext` in lowercase hex.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{TryRngCore, rngs::OsRng};
use scrypt::Params;

use crate::error::{MemoryError, Result};
use crate::logging::timed;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

/// scrypt cost: N = 2^14, r = 8, p = 1.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

pub fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| MemoryError::Crypto(format!("invalid scrypt parameters: {}", e)))?;
    let mut key = [0u8; KEY_LEN];
    timed("scrypt key derivation", || {
        scrypt::scrypt(password.as_bytes(), salt, &params, &mut key)
    })
    .map_err(|e| MemoryError::Crypto(format!("failed to derive key: {}", e)))?;
    Ok(key)
}

pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_bytes()
}

pub fn generate_iv() -> Result<[u8; IV_LEN]> {
    random_bytes()
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| MemoryError::Crypto(format!("system RNG unavailable: {}", e)))?;
    Ok(bytes)
}

/// Encrypts `plaintext` under `password` and returns the hex blob.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    let salt = generate_salt()?;
    let iv = generate_iv()?;
    let key = derive_key(password, &salt)?;

    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(format!(
        "{}:{}:{}",
        hex::encode(salt),
        hex::encode(iv),
        hex::encode(ciphertext)
    ))
}

/// Decrypts a blob produced by [`encrypt`].
///
/// A bad blob shape is reported as [`MemoryError::MalformedVaultBlob`]. A
/// wrong password and a corrupted ciphertext both surface as
/// [`MemoryError::DecryptionFailed`]; CBC carries no tag to tell them apart.
pub fn decrypt(blob: &str, password: &str) -> Result<String> {
    let sealed = SealedBlob::parse(blob)?;
    let key = derive_key(password, &sealed.salt)?;

    let plaintext = Aes256CbcDec::new(&key.into(), &sealed.iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&sealed.ciphertext)
        .map_err(|_| MemoryError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| MemoryError::DecryptionFailed)
}

struct SealedBlob {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl SealedBlob {
    fn parse(blob: &str) -> Result<Self> {
        let fields: Vec<&str> = blob.trim().split(':').collect();
        if fields.len() != 3 {
            return Err(MemoryError::MalformedVaultBlob(format!(
                "expected 3 fields, found {}",
                fields.len()
            )));
        }

        let salt = decode_fixed::<SALT_LEN>(fields[0], "salt")?;
        let iv = decode_fixed::<IV_LEN>(fields[1], "iv")?;
        let ciphertext = decode_hex(fields[2], "ciphertext")?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(MemoryError::MalformedVaultBlob(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                BLOCK_LEN
            )));
        }

        Ok(Self {
            salt,
            iv,
            ciphertext,
        })
    }
}

fn decode_hex(field: &str, name: &str) -> Result<Vec<u8>> {
    hex::decode(field).map_err(|e| MemoryError::MalformedVaultBlob(format!("{}: {}", name, e)))
}

fn decode_fixed<const N: usize>(field: &str, name: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(field, name)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        MemoryError::MalformedVaultBlob(format!("{} must be {} bytes, found {}", name, N, len))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let blob = encrypt("ssh root@10.0.0.1 -p 2222", "hunter2").unwrap();
        assert_eq!(decrypt(&blob, "hunter2").unwrap(), "ssh root@10.0.0.1 -p 2222");
    }

    #[test]
    fn test_round_trip_unicode() {
        let blob = encrypt("pässwört 🔑\nline two", "κλειδί").unwrap();
        assert_eq!(decrypt(&blob, "κλειδί").unwrap(), "pässwört 🔑\nline two");
    }

    #[test]
    fn test_blob_format() {
        let blob = encrypt("hello", "pw").unwrap();
        let fields: Vec<&str> = blob.split(':').collect();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].len(), SALT_LEN * 2);
        assert_eq!(fields[1].len(), IV_LEN * 2);
        // "hello" pads to a single block
        assert_eq!(fields[2].len(), BLOCK_LEN * 2);
        assert!(blob.chars().all(|c| c == ':' || c.is_ascii_hexdigit()));
        assert_eq!(blob, blob.to_lowercase());
    }

    #[test]
    fn test_fresh_salt_and_iv_per_call() {
        let a = encrypt("same text", "same password").unwrap();
        let b = encrypt("same text", "same password").unwrap();
        assert_ne!(a, b);

        let fa: Vec<&str> = a.split(':').collect();
        let fb: Vec<&str> = b.split(':').collect();
        assert_ne!(fa[0], fb[0]);
        assert_ne!(fa[1], fb[1]);
    }

    #[test]
    fn test_wrong_password_fails() {
        let blob = encrypt("top secret value", "right").unwrap();
        assert!(matches!(
            decrypt(&blob, "wrong"),
            Err(MemoryError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_malformed_field_count() {
        assert!(matches!(
            decrypt("abcd:ef", "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));
        assert!(matches!(
            decrypt("a:b:c:d", "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));
        assert!(matches!(
            decrypt("", "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));
    }

    #[test]
    fn test_malformed_hex_and_lengths() {
        let salt = "00".repeat(SALT_LEN);
        let iv = "11".repeat(IV_LEN);

        let not_hex = format!("{}:{}:zz", salt, iv);
        assert!(matches!(
            decrypt(&not_hex, "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));

        let short_salt = format!("0011:{}:{}", iv, "22".repeat(16));
        assert!(matches!(
            decrypt(&short_salt, "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));

        let partial_block = format!("{}:{}:{}", salt, iv, "22".repeat(5));
        assert!(matches!(
            decrypt(&partial_block, "pw"),
            Err(MemoryError::MalformedVaultBlob(_))
        ));
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key("password", &salt).unwrap();
        let k2 = derive_key("password", &salt).unwrap();
        let k3 = derive_key("password", &[8u8; SALT_LEN]).unwrap();

        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }
}
