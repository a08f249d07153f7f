//! Scalable Bloom filter for "definitely absent" pre-checks.
//!
//! # Purpose
//! Answers whether a string may have been inserted, with no false negatives
//! and a bounded false-positive rate, so bulk existence checks only send
//! plausible candidates to the store.
//!
//! # Structure
//! An append-only list of fixed-size layers. Inserts go to the newest layer;
//! once it holds its designed capacity a new layer is appended, never merged
//! or compacted. A lookup hits if any layer hits.
//!
//! # Concurrency
//! Bits live in `AtomicU64` words and are set with `fetch_or`, so concurrent
//! inserts need no lock and re-setting a bit is a no-op. The layer list sits
//! behind a `parking_lot::RwLock` that is only write-locked to append a layer.
//! Readers may miss an insert that is still in flight; callers verify positives
//! against the store anyway.
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_CAPACITY: u64 = 10_000;
pub const DEFAULT_ERROR_RATE: f64 = 0.01;

/// Sizing policy for the filter and its future layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Items the first layer is sized for.
    pub initial_capacity: u64,
    /// Target false-positive rate of the first layer.
    pub error_rate: f64,
    /// Capacity multiplier applied to each new layer.
    pub growth: u64,
    /// Error-rate multiplier applied to each new layer; `1.0` keeps ε constant.
    pub tightening_ratio: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            error_rate: DEFAULT_ERROR_RATE,
            growth: 2,
            tightening_ratio: 1.0,
        }
    }
}

impl FilterConfig {
    fn layer_params(&self, index: u32) -> (u64, f64) {
        let capacity = self
            .initial_capacity
            .max(1)
            .saturating_mul(self.growth.max(1).saturating_pow(index));
        let error_rate = (self.error_rate * self.tightening_ratio.powi(index as i32))
            .clamp(f64::MIN_POSITIVE, 0.5);
        (capacity, error_rate)
    }
}

#[derive(Debug)]
struct Layer {
    words: Box<[AtomicU64]>,
    bit_count: u64,
    hash_count: u32,
    capacity: u64,
    items: AtomicU64,
}

impl Layer {
    fn new(capacity: u64, error_rate: f64) -> Self {
        // m = -n ln(p) / ln(2)^2, k = (m / n) ln(2)
        let ln2 = std::f64::consts::LN_2;
        let n = capacity as f64;
        let bits = (-(n * error_rate.ln()) / (ln2 * ln2)).ceil().max(64.0) as u64;
        let hash_count = ((bits as f64 / n) * ln2).round().max(1.0) as u32;
        let word_count = bits.div_ceil(64) as usize;
        let words = (0..word_count).map(|_| AtomicU64::new(0)).collect();
        Self {
            words,
            bit_count: word_count as u64 * 64,
            hash_count,
            capacity,
            items: AtomicU64::new(0),
        }
    }

    fn positions(&self, hashes: ItemHashes) -> impl Iterator<Item = u64> + '_ {
        // Kirsch–Mitzenmacher double hashing.
        (0..u64::from(self.hash_count)).map(move |i| {
            hashes.h1.wrapping_add(i.wrapping_mul(hashes.h2)) % self.bit_count
        })
    }

    fn set(&self, hashes: ItemHashes) {
        for bit in self.positions(hashes) {
            self.words[(bit / 64) as usize].fetch_or(1 << (bit % 64), Ordering::Relaxed);
        }
    }

    fn contains(&self, hashes: ItemHashes) -> bool {
        self.positions(hashes).all(|bit| {
            self.words[(bit / 64) as usize].load(Ordering::Relaxed) & (1 << (bit % 64)) != 0
        })
    }

    /// Reserve a slot for one more item, failing once the layer is full.
    fn try_reserve(&self) -> bool {
        self.items
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < self.capacity).then_some(count + 1)
            })
            .is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
struct ItemHashes {
    h1: u64,
    h2: u64,
}

fn item_hashes(item: &str) -> ItemHashes {
    let digest = Sha256::digest(item.as_bytes());
    let mut h1 = [0u8; 8];
    let mut h2 = [0u8; 8];
    h1.copy_from_slice(&digest[..8]);
    h2.copy_from_slice(&digest[8..16]);
    ItemHashes {
        h1: u64::from_le_bytes(h1),
        // An odd stride never collapses every probe onto one bit.
        h2: u64::from_le_bytes(h2) | 1,
    }
}

#[derive(Debug)]
pub struct ScalableBloomFilter {
    config: FilterConfig,
    layers: RwLock<Vec<Arc<Layer>>>,
}

impl Default for ScalableBloomFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl ScalableBloomFilter {
    pub fn new(config: FilterConfig) -> Self {
        let (capacity, error_rate) = config.layer_params(0);
        Self {
            config,
            layers: RwLock::new(vec![Arc::new(Layer::new(capacity, error_rate))]),
        }
    }

    /// Record `item`. Items that already test positive are not re-added, so
    /// duplicates do not consume layer capacity.
    pub fn insert(&self, item: &str) {
        let hashes = item_hashes(item);
        if self.contains_hashes(hashes) {
            return;
        }
        loop {
            let current = match self.layers.read().last() {
                Some(layer) => Arc::clone(layer),
                None => return,
            };
            if current.try_reserve() {
                current.set(hashes);
                return;
            }
            self.grow_past(&current);
        }
    }

    pub fn extend<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.insert(item.as_ref());
        }
    }

    /// `false` means `item` was never inserted; `true` means it may have been.
    pub fn may_contain(&self, item: &str) -> bool {
        self.contains_hashes(item_hashes(item))
    }

    /// Number of distinct-looking items recorded across all layers.
    pub fn len(&self) -> u64 {
        self.layers
            .read()
            .iter()
            .map(|layer| layer.items.load(Ordering::Acquire))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layer_count(&self) -> usize {
        self.layers.read().len()
    }

    fn contains_hashes(&self, hashes: ItemHashes) -> bool {
        self.layers
            .read()
            .iter()
            .any(|layer| layer.contains(hashes))
    }

    fn grow_past(&self, full: &Arc<Layer>) {
        let mut layers = self.layers.write();
        // Another inserter may already have appended a layer.
        let is_newest = layers.last().is_some_and(|last| Arc::ptr_eq(last, full));
        if !is_newest {
            return;
        }
        let (capacity, error_rate) = self.config.layer_params(layers.len() as u32);
        layers.push(Arc::new(Layer::new(capacity, error_rate)));
        metrics::gauge!("compass_filter_layers").set(layers.len() as f64);
        tracing::debug!(layers = layers.len(), capacity, error_rate, "membership filter grew");
    }
}
