//! In-memory transport (for development/testing)

use reqlog_core::{Level, LogCallback, LogEntry, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// Configuration for [`MemoryTransport`]
#[derive(Debug, Clone)]
pub struct MemoryTransportConfig {
    /// Maximum number of entries to keep
    pub max_entries: usize,
    /// Whether to drop the oldest entry when full (ring buffer behavior)
    pub evict_oldest: bool,
}

impl Default for MemoryTransportConfig {
    fn default() -> Self {
        Self {
            max_entries: 10000,
            evict_oldest: true,
        }
    }
}

/// Keeps entries in memory
///
/// Clones share the same buffer, so a test can keep one handle and give
/// another to the logging layer.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    config: MemoryTransportConfig,
}

impl MemoryTransport {
    /// Create a transport with the default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryTransportConfig::default())
    }

    /// Create a transport with a custom configuration
    pub fn with_config(config: MemoryTransportConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(
                config.max_entries.min(1000),
            ))),
            config,
        }
    }

    /// Create a bounded transport that evicts the oldest entries
    pub fn bounded(max_entries: usize) -> Self {
        Self::with_config(MemoryTransportConfig {
            max_entries,
            evict_oldest: true,
        })
    }

    /// Snapshot of every stored entry, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Stored entries at `level`
    pub fn entries_at(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// The most recent entry
    pub fn last(&self) -> Option<LogEntry> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.back().cloned())
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    fn store(&self, entry: LogEntry) -> Result<(), TransportError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TransportError::Unavailable(format!("Failed to acquire lock: {}", e)))?;

        if entries.len() >= self.config.max_entries {
            if !self.config.evict_oldest || entries.is_empty() {
                return Err(TransportError::Unavailable("memory transport is full".into()));
            }
            entries.pop_front();
        }

        entries.push_back(entry);
        Ok(())
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        callback(self.store(entry));
    }
}
