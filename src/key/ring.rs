use std::sync::atomic::{AtomicUsize, Ordering};

use super::{InvalidKey, Key};

/// Round-robin selector over one or more API [`Key`]s.
///
/// Share it behind an [`Arc`] and every call to [`KeyRing::next`] hands out
/// the next key. Any key is as good as any other, so concurrent callers only
/// need the index update to be atomic, not ordered.
///
/// [`Arc`]: std::sync::Arc
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<Key>,
    cursor: AtomicUsize,
}

impl KeyRing {
    /// Create a ring from `keys`. Returns [`None`] if there are no keys.
    pub fn new<Ks>(keys: Ks) -> Option<Self>
    where
        Ks: IntoIterator<Item = Key>,
    {
        let keys: Vec<Key> = keys.into_iter().collect();
        if keys.is_empty() {
            return None;
        }

        Some(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Parse a comma separated list of keys. Blank entries are skipped.
    /// Returns `Ok(None)` if there are no keys in the list. The input is
    /// zeroized.
    pub fn parse(list: String) -> Result<Option<Self>, InvalidKey> {
        let list = zeroize::Zeroizing::new(list);
        let keys = list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| Key::try_from(part.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(keys))
    }

    /// Atomically advance the cursor and return the key it pointed at.
    pub fn next(&self) -> &Key {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.keys[index % self.keys.len()]
    }

    /// Number of keys in the ring. Never zero.
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl From<Key> for KeyRing {
    fn from(key: Key) -> Self {
        Self {
            keys: vec![key],
            cursor: AtomicUsize::new(0),
        }
    }
}
