//! Windowed sine tones and their memoization.
//!
//! A tone is one image column's worth of samples for a single row: a sine
//! at the row frequency, shaped by a Hamming window and scaled by the pixel
//! amplitude. Sample values are floored, not rounded; the floor is part of
//! the output contract.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::Timing;

/// Hamming window coefficient for sample `i` of an `n`-sample block.
///
/// `n` must be at least 2.
pub fn hamming(i: usize, n: usize) -> f64 {
    0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos()
}

/// Generates a tone of `timing.samples_per_pixel` samples.
///
/// `cycles = samples_per_pixel * frequency / sample_rate` sine periods fit in
/// the block; each sample is `floor(amplitude * window * sine)`.
pub fn generate_tone(timing: &Timing, frequency: f64, amplitude: f64) -> Vec<i16> {
    let samples = timing.samples_per_pixel;
    let cycles = samples as f64 * frequency / timing.sample_rate as f64;

    (0..samples)
        .map(|i| {
            let phase = 2.0 * PI * cycles * i as f64 / samples as f64;
            let value = (amplitude * hamming(i, samples) * phase.sin()).floor();
            // Float to int casts saturate at the i16 bounds.
            value as i16
        })
        .collect()
}

/// Cache key: exact bit patterns of (frequency, amplitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ToneKey {
    frequency: u64,
    amplitude: u64,
}

impl ToneKey {
    fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency: frequency.to_bits(),
            amplitude: amplitude.to_bits(),
        }
    }
}

#[derive(Debug, Default)]
struct ToneStore {
    tones: HashMap<ToneKey, Arc<[i16]>>,
    order: VecDeque<ToneKey>,
}

/// Memoizing tone generator, safe to share between worker threads.
///
/// Scope a cache to one encoding run. When a capacity is set, the oldest
/// entry is evicted once the cache is full.
#[derive(Debug)]
pub struct ToneCache {
    timing: Timing,
    capacity: Option<usize>,
    store: RwLock<ToneStore>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ToneCache {
    /// Creates an unbounded cache.
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            capacity: None,
            store: RwLock::new(ToneStore::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a cache holding at most `capacity` tones.
    pub fn with_capacity(timing: Timing, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new(timing)
        }
    }

    /// Timing the tones are generated for.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Returns the tone for (frequency, amplitude), generating it on a miss.
    pub fn tone(&self, frequency: f64, amplitude: f64) -> Arc<[i16]> {
        let key = ToneKey::new(frequency, amplitude);

        if let Some(tone) = self.read_store().tones.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(tone);
        }

        let tone: Arc<[i16]> = generate_tone(&self.timing, frequency, amplitude).into();
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut store = self.write_store();
        // Another worker may have filled the slot while we generated.
        if let Some(existing) = store.tones.get(&key) {
            return Arc::clone(existing);
        }
        if let Some(capacity) = self.capacity {
            while store.tones.len() >= capacity {
                match store.order.pop_front() {
                    Some(oldest) => {
                        store.tones.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        store.tones.insert(key, Arc::clone(&tone));
        store.order.push_back(key);
        tone
    }

    /// Number of cached tones.
    pub fn len(&self) -> usize {
        self.read_store().tones.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that generated a new tone.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drops every cached tone.
    pub fn clear(&self) {
        let mut store = self.write_store();
        store.tones.clear();
        store.order.clear();
    }

    // Poisoning is ignored: every stored tone is complete.
    fn read_store(&self) -> std::sync::RwLockReadGuard<'_, ToneStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_store(&self) -> std::sync::RwLockWriteGuard<'_, ToneStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }
}
