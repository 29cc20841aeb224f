//! Decoded image cache with background decoding.
//!
//! The first request for a source schedules a decode on a worker thread and
//! returns `None`, so the frame renders without that image. Completions are
//! collected by [`ImageCache::poll`]; a non-zero count tells the host to
//! render once more. Failures are remembered so a bad source is decoded only
//! once.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tiny_skia::Pixmap;

use crate::image::load_image_source;

/// Configuration for the image cache.
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
    /// Maximum number of decoded images kept.
    pub max_entries: usize,
    /// Decode on a background thread. When false, decodes run inline on the
    /// first request.
    pub background_decode: bool,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 64,
            background_decode: true,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered with a decoded image.
    pub hits: u64,
    /// Requests that found nothing ready.
    pub misses: u64,
    /// Decodes that succeeded.
    pub decoded: u64,
    /// Decodes that failed.
    pub failed: u64,
    /// Entries dropped to stay under the entry limit.
    pub evictions: u64,
}

#[derive(Debug)]
enum Slot {
    Pending,
    Ready {
        pixmap: Arc<Pixmap>,
        last_accessed: Instant,
    },
    Failed,
}

type Completion = (String, Option<Pixmap>);

/// Image cache keyed by the element's `image_data` string.
#[derive(Debug)]
pub struct ImageCache {
    slots: HashMap<String, Slot>,
    config: ImageCacheConfig,
    stats: CacheStats,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    /// Create a cache with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ImageCacheConfig::default())
    }

    /// Create a cache with custom configuration.
    #[must_use]
    pub fn with_config(config: ImageCacheConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            slots: HashMap::new(),
            config,
            stats: CacheStats::default(),
            sender,
            receiver,
        }
    }

    /// Get the decoded image for `source`, scheduling a decode on first use.
    ///
    /// Returns `None` while the decode is pending or after it failed.
    pub fn request(&mut self, source: &str) -> Option<Arc<Pixmap>> {
        match self.slots.get_mut(source) {
            Some(Slot::Ready {
                pixmap,
                last_accessed,
            }) => {
                *last_accessed = Instant::now();
                self.stats.hits += 1;
                return Some(Arc::clone(pixmap));
            }
            Some(Slot::Pending | Slot::Failed) => {
                self.stats.misses += 1;
                return None;
            }
            None => {}
        }

        self.stats.misses += 1;
        if self.config.background_decode {
            self.spawn_decode(source);
            None
        } else {
            let decoded = decode(source);
            self.store(source.to_string(), decoded);
            self.ready(source)
        }
    }

    fn spawn_decode(&mut self, source: &str) {
        self.slots.insert(source.to_string(), Slot::Pending);
        let sender = self.sender.clone();
        let key = source.to_string();
        let spawned = std::thread::Builder::new()
            .name("image-decode".to_string())
            .spawn(move || {
                let decoded = decode(&key);
                // The cache may have been dropped; nothing to report then.
                let _ = sender.send((key, decoded));
            });
        if let Err(e) = spawned {
            tracing::warn!("Could not spawn image decoder, decoding inline: {e}");
            let decoded = decode(source);
            self.store(source.to_string(), decoded);
        }
    }

    /// Collect finished decodes without blocking.
    ///
    /// Returns how many images resolved (successfully or not) since the last
    /// call; non-zero means one more render pass is due.
    pub fn poll(&mut self) -> usize {
        let mut resolved = 0;
        while let Ok((key, decoded)) = self.receiver.try_recv() {
            self.store(key, decoded);
            resolved += 1;
        }
        resolved
    }

    /// Block until no decode is pending or `timeout` elapses.
    ///
    /// Returns how many images resolved while waiting.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut resolved = self.poll();
        while self.pending() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok((key, decoded)) => {
                    self.store(key, decoded);
                    resolved += 1;
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        resolved
    }

    fn store(&mut self, key: String, decoded: Option<Pixmap>) {
        // A source re-requested after eviction may resolve twice; keep the
        // first result.
        if matches!(self.slots.get(&key), Some(Slot::Ready { .. } | Slot::Failed)) {
            return;
        }
        let slot = match decoded {
            Some(pixmap) => {
                self.stats.decoded += 1;
                self.evict_if_needed();
                Slot::Ready {
                    pixmap: Arc::new(pixmap),
                    last_accessed: Instant::now(),
                }
            }
            None => {
                self.stats.failed += 1;
                Slot::Failed
            }
        };
        self.slots.insert(key, slot);
    }

    fn ready(&self, source: &str) -> Option<Arc<Pixmap>> {
        match self.slots.get(source) {
            Some(Slot::Ready { pixmap, .. }) => Some(Arc::clone(pixmap)),
            _ => None,
        }
    }

    /// Evict the least recently used decoded images to make room for one
    /// more.
    fn evict_if_needed(&mut self) {
        while self.len() >= self.config.max_entries.max(1) {
            let oldest = self
                .slots
                .iter()
                .filter_map(|(key, slot)| match slot {
                    Slot::Ready { last_accessed, .. } => Some((key, *last_accessed)),
                    _ => None,
                })
                .min_by_key(|(_, accessed)| *accessed)
                .map(|(key, _)| key.clone());

            let Some(key) = oldest else {
                break;
            };
            self.slots.remove(&key);
            self.stats.evictions += 1;
        }
    }

    /// Whether `source` decoded successfully and is cached.
    #[must_use]
    pub fn is_ready(&self, source: &str) -> bool {
        matches!(self.slots.get(source), Some(Slot::Ready { .. }))
    }

    /// Whether decoding `source` failed.
    #[must_use]
    pub fn is_failed(&self, source: &str) -> bool {
        matches!(self.slots.get(source), Some(Slot::Failed))
    }

    /// Number of decodes still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Pending))
            .count()
    }

    /// Number of decoded images held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }))
            .count()
    }

    /// Whether no decoded image is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything, including remembered failures. In-flight decodes
    /// still land on the next poll.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

fn decode(source: &str) -> Option<Pixmap> {
    match load_image_source(source) {
        Ok(pixmap) => {
            tracing::debug!("Decoded {}x{} image", pixmap.width(), pixmap.height());
            Some(pixmap)
        }
        Err(e) => {
            tracing::warn!("Image decode failed: {e}");
            None
        }
    }
}
