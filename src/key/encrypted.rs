//! Encrypted [`Key`] management for provider API keys.

use memsecurity::zeroize::Zeroizing;

use super::InvalidKey;

/// Stores an API key securely. The API key is encrypted in memory and is
/// never written out by [`Debug`].
///
/// [`Debug`]: std::fmt::Debug
pub struct Key {
    // FIXME: `memsecurity` does not build on wasm32.
    mem: memsecurity::EncryptedMem,
}

impl Key {
    /// Read the key. The key is zeroized on drop.
    pub fn read(&self) -> memsecurity::ZeroizeBytes {
        // Decryption can only fail if encryption is broken, which is a
        // catastrophic failure.
        self.mem.decrypt().unwrap()
    }
}

impl TryFrom<String> for Key {
    type Error = InvalidKey;

    /// Create a new key from a string securely. The string is zeroized after
    /// conversion. Surrounding whitespace is trimmed.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let v = Zeroizing::new(s.into_bytes());
        let trimmed = v.trim_ascii();
        super::validate(trimmed)?;

        let trimmed = Zeroizing::new(trimmed.to_vec());
        let mut mem = memsecurity::EncryptedMem::new();

        // Same as above.
        mem.encrypt(&trimmed).unwrap();

        Ok(Self { mem })
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key").field("mem", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "sk-test-0123456789abcdef";

    #[test]
    fn test_key() {
        let key = Key::try_from(API_KEY.to_string()).unwrap();
        let bytes = key.read();
        let bytes: &[u8] = bytes.as_ref();
        assert_eq!(bytes, API_KEY.as_bytes());
    }

    #[test]
    fn test_empty_key() {
        let err = Key::try_from("  ".to_string()).unwrap_err();
        assert_eq!(err, InvalidKey::Empty);
    }
}
