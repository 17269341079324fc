use std::fmt::{Display, Formatter};

/// The length of a compressed secp256k1 public key encoding.
pub const PUBLIC_KEY_BYTE_COUNT: usize = 33;

/// The identity that owns a transaction output, i.e. a compressed secp256k1
/// public key.
///
/// The bytes are carried opaquely: a corrupt or malformed key is representable
/// and simply fails signature verification, it never crashes the validator.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTE_COUNT]);

impl PublicKey {
    pub const fn from_raw(raw_bytes: [u8; PUBLIC_KEY_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        match hex::decode(&s) {
            Ok(bytes) => {
                if bytes.len() == PUBLIC_KEY_BYTE_COUNT {
                    let mut key = [0; PUBLIC_KEY_BYTE_COUNT];
                    key.copy_from_slice(&bytes);
                    Ok(PublicKey::from_raw(key))
                } else {
                    Err(format!(
                        "Invalid public key length. Expected: {} but got: {} in: {}",
                        PUBLIC_KEY_BYTE_COUNT,
                        bytes.len(),
                        s
                    ))
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(key: secp256k1::PublicKey) -> Self {
        Self(key.serialize())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
