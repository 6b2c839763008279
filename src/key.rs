//! [`Key`] is a wrapper around a completion provider API key. [`KeyRing`]
//! rotates between one or more of them.

#[cfg(feature = "memsecurity")]
mod encrypted;
#[cfg(feature = "memsecurity")]
pub use encrypted::Key;
#[cfg(not(feature = "memsecurity"))]
mod zeroizing;
#[cfg(not(feature = "memsecurity"))]
pub use zeroizing::Key;

use reqwest::header::HeaderValue;
use zeroize::Zeroizing;

mod ring;
pub use ring::KeyRing;

/// Error for when a key cannot be used as a bearer credential.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InvalidKey {
    /// The key is empty or only whitespace.
    #[error("API key is empty")]
    Empty,
    /// The key has a byte that is not allowed in an HTTP header value.
    #[error("API key has an invalid character at byte {index}")]
    InvalidCharacter {
        /// Offset of the first offending byte.
        index: usize,
    },
}

impl Key {
    /// Build an `Authorization: Bearer` header value for this key. The value
    /// is marked sensitive so it is left out of `Debug` output.
    pub(crate) fn bearer(
        &self,
    ) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
        let key = self.read();
        let key: &[u8] = key.as_ref();

        let mut value = Zeroizing::new(Vec::with_capacity(key.len() + 7));
        value.extend_from_slice(b"Bearer ");
        value.extend_from_slice(key);

        let mut header = HeaderValue::from_bytes(&value)?;
        header.set_sensitive(true);
        Ok(header)
    }
}

/// Check that `key` is non-empty and only contains visible ASCII so it can be
/// sent in an `Authorization` header.
pub(crate) fn validate(key: &[u8]) -> Result<(), InvalidKey> {
    if key.iter().all(u8::is_ascii_whitespace) {
        return Err(InvalidKey::Empty);
    }

    match key.iter().position(|b| !b.is_ascii_graphic()) {
        Some(index) => Err(InvalidKey::InvalidCharacter { index }),
        None => Ok(()),
    }
}
