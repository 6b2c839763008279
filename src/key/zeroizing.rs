//! [`Key`] storage that zeroes the key on drop.

use zeroize::Zeroizing;

use super::InvalidKey;

/// Stores an API key. The key is zeroized on drop and is never written out by
/// [`Debug`].
///
/// [`Debug`]: std::fmt::Debug
pub struct Key {
    bytes: Zeroizing<Vec<u8>>,
}

impl Key {
    /// Read the key. The key is zeroized on drop.
    pub fn read(&self) -> Zeroizing<Vec<u8>> {
        self.bytes.clone()
    }
}

impl TryFrom<String> for Key {
    type Error = InvalidKey;

    /// Create a new key from a string. The string is zeroized after
    /// conversion, even if the key is rejected. Surrounding whitespace is
    /// trimmed.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let v = Zeroizing::new(s.into_bytes());
        let trimmed = v.trim_ascii();
        super::validate(trimmed)?;

        Ok(Self {
            bytes: Zeroizing::new(trimmed.to_vec()),
        })
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key").field("bytes", &"[REDACTED]").finish()
    }
}
