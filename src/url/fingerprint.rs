use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// A 256-bit digest of a canonicalized URL, used as the seen-set key
///
/// Fingerprints are only ever computed from the output of
/// [`canonicalize_url`](crate::url::canonicalize_url), so two URLs that
/// differ by case, fragment, or tracking noise share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of a canonical URL
    pub fn of(url: &Url) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns the raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the hex-encoded digest
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a fingerprint from its hex encoding
    ///
    /// # Returns
    ///
    /// * `Some(Fingerprint)` - Valid 64-character hex string
    /// * `None` - Wrong length or invalid hex
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
