//! Single-entry memo cache for barcode encoding.
//!
//! The encoder is a pure function of `(value, symbology, bar_width, height,
//! max_width)`, so the last computed geometry can be replayed whenever the
//! same tuple comes back — the common case for a card that re-renders on
//! every resize tick with unchanged content. Eviction policy: replace on
//! key change, one entry only.

use super::{BarEncoding, EncodeOptions, Symbology, encode};
use crate::error::CardError;

/// Cache key: float fields compared by bit pattern so the key is `Eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EncodeKey {
    value: String,
    symbology: Symbology,
    bar_width: u64,
    height: u64,
    max_width: Option<u64>,
}

impl EncodeKey {
    fn new(value: &str, symbology: Symbology, opts: &EncodeOptions) -> Self {
        Self {
            value: value.to_string(),
            symbology,
            bar_width: opts.bar_width.to_bits(),
            height: opts.height.to_bits(),
            max_width: opts.max_width.map(f64::to_bits),
        }
    }
}

/// Last-computed encode cache.
#[derive(Debug, Default)]
pub struct EncodeCache {
    entry: Option<(EncodeKey, BarEncoding)>,
    hits: u64,
}

impl EncodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode through the cache. Failures are not cached: the degraded
    /// empty-bars result is cheap to recompute and an error should not
    /// shadow a later valid payload.
    pub fn encode(
        &mut self,
        value: &str,
        symbology: Symbology,
        opts: &EncodeOptions,
    ) -> Result<BarEncoding, CardError> {
        let key = EncodeKey::new(value, symbology, opts);
        if let Some((cached_key, encoding)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                return Ok(encoding.clone());
            }
        }
        let encoding = encode(value, symbology, opts)?;
        self.entry = Some((key, encoding.clone()));
        Ok(encoding)
    }

    /// Number of times the cached entry was replayed.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_identical_tuple() {
        let mut cache = EncodeCache::new();
        let opts = EncodeOptions::default();
        let a = cache.encode("12345", Symbology::Code128, &opts).unwrap();
        let b = cache.encode("12345", Symbology::Code128, &opts).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_key_change_evicts() {
        let mut cache = EncodeCache::new();
        let opts = EncodeOptions::default();
        cache.encode("12345", Symbology::Code128, &opts).unwrap();
        cache.encode("54321", Symbology::Code128, &opts).unwrap();
        assert_eq!(cache.hits(), 0);
        // The new entry is now the cached one
        cache.encode("54321", Symbology::Code128, &opts).unwrap();
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_option_change_misses() {
        let mut cache = EncodeCache::new();
        let a = EncodeOptions::default();
        let b = EncodeOptions {
            max_width: Some(100.0),
            ..a
        };
        cache.encode("12345", Symbology::Code128, &a).unwrap();
        cache.encode("12345", Symbology::Code128, &b).unwrap();
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = EncodeCache::new();
        let opts = EncodeOptions::default();
        cache.encode("12345", Symbology::Code128, &opts).unwrap();
        assert!(cache.encode("", Symbology::Code128, &opts).is_err());
        // Prior good entry survives the failed encode
        cache.encode("12345", Symbology::Code128, &opts).unwrap();
        assert_eq!(cache.hits(), 1);
    }
}
