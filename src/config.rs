//! Indexing configuration: N-gram width and posting-list compression mode.
//!
//! Both knobs are process-lifetime: the `compress` flag must be the same at
//! encode time and decode time, so it is not something callers are expected
//! to flip mid-run.

use serde::{Deserialize, Serialize};

/// On-disk posting-list codec.
///
/// - `None`: flat, uncompressed `i32` fields. Cheapest to encode, largest on
///   disk.
/// - `Golomb`: gap-coded doc ids and positions. Smaller on disk, costs a bit
///   of CPU per posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressMode {
    None,
    Golomb,
}

impl Default for CompressMode {
    fn default() -> Self {
        CompressMode::Golomb
    }
}

/// Tuning knobs for one indexing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// N-gram width. Must be ≥ 1.
    pub ngram_n: usize,

    /// Posting-list codec used for every blob this pipeline writes or reads.
    pub compress: CompressMode,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            ngram_n: 2,
            compress: CompressMode::default(),
        }
    }
}

impl IndexConfig {
    pub fn new(ngram_n: usize, compress: CompressMode) -> Self {
        assert!(ngram_n >= 1, "ngram_n must be at least 1");
        Self { ngram_n, compress }
    }

    /// A small, uncompressed configuration convenient for unit tests: no
    /// Golomb parameter derivation to reason about when debugging a
    /// tokenization or accumulation bug.
    pub fn for_testing() -> Self {
        Self {
            ngram_n: 2,
            compress: CompressMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = IndexConfig::default();
        assert_eq!(cfg.ngram_n, 2);
        assert_eq!(cfg.compress, CompressMode::Golomb);
    }

    #[test]
    fn test_config_presets() {
        let cfg = IndexConfig::for_testing();
        assert_eq!(cfg.compress, CompressMode::None);

        let cfg = IndexConfig::new(3, CompressMode::Golomb);
        assert_eq!(cfg.ngram_n, 3);
    }

    #[test]
    #[should_panic(expected = "ngram_n must be at least 1")]
    fn test_zero_ngram_rejected() {
        IndexConfig::new(0, CompressMode::None);
    }
}
