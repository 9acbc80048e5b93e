#![forbid(unsafe_code)]

//! Bounded diff log for diagnostics.
//!
//! A [`TableLogBuffer`] records value transitions of selected graph outputs,
//! one row per change, tagged with a column name. It is a side channel: the
//! computation never reads it back, and recording can never fail or block.
//!
//! # Invariants
//!
//! 1. At most `capacity` rows are retained; the oldest are evicted first.
//! 2. Sequence numbers are assigned in append order and never reused.
//! 3. `record` never blocks. If the row store is busy the change is dropped
//!    and counted in [`TableLogBuffer::dropped`].
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Contention | Another thread holds the row store | Row dropped, counter bumped |
//! | Poisoned lock | A reader panicked mid-iteration | Row store recovered, append proceeds |
//! | Disabled | `TableLogConfig::enabled == false` | Nothing recorded |

use std::collections::VecDeque;
use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Configuration for a diff log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLogConfig {
    /// Whether changes are recorded at all.
    pub enabled: bool,
    /// Maximum number of retained rows.
    pub capacity: usize,
}

impl Default for TableLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 100,
        }
    }
}

impl TableLogConfig {
    /// A config that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the retained row count. Zero is raised to one.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}

/// One recorded transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub seq: u64,
    /// Wall clock, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub column: String,
    pub previous: String,
    pub current: String,
}

struct Rows {
    next_seq: u64,
    entries: VecDeque<TableChange>,
}

struct TableLogInner {
    name: String,
    capacity: usize,
    enabled: bool,
    rows: Mutex<Rows>,
    dropped: AtomicU64,
}

/// Named, bounded, shareable diff log.
///
/// Cloning yields another handle to the same rows.
#[derive(Clone)]
pub struct TableLogBuffer {
    inner: Arc<TableLogInner>,
}

impl Debug for TableLogBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableLogBuffer")
            .field("name", &self.inner.name)
            .field("capacity", &self.inner.capacity)
            .field("enabled", &self.inner.enabled)
            .field("dropped", &self.dropped())
            .finish()
    }
}

impl TableLogBuffer {
    #[must_use]
    pub fn new(name: impl Into<String>, config: &TableLogConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            inner: Arc::new(TableLogInner {
                name: name.into(),
                capacity,
                enabled: config.enabled,
                rows: Mutex::new(Rows {
                    next_seq: 0,
                    entries: VecDeque::with_capacity(capacity),
                }),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Record a transition of `column` from `previous` to `current`.
    pub fn record<T: Debug + ?Sized>(&self, column: &str, previous: &T, current: &T) {
        if !self.inner.enabled {
            return;
        }
        let previous = format!("{previous:?}");
        let current = format!("{current:?}");
        tracing::trace!(
            target: "cellbar::table_log",
            buffer = %self.inner.name,
            column,
            previous = %previous,
            current = %current,
            "value changed"
        );

        let mut rows = match self.inner.rows.try_lock() {
            Ok(rows) => rows,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        let seq = rows.next_seq;
        rows.next_seq += 1;
        if rows.entries.len() == self.inner.capacity {
            rows.entries.pop_front();
        }
        rows.entries.push_back(TableChange {
            seq,
            timestamp_ms: now_ms(),
            column: column.to_string(),
            previous,
            current,
        });
    }

    /// Snapshot of the retained rows, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<TableChange> {
        self.rows().entries.iter().cloned().collect()
    }

    /// Retained rows for one column, oldest first.
    #[must_use]
    pub fn column(&self, column: &str) -> Vec<TableChange> {
        self.rows()
            .entries
            .iter()
            .filter(|change| change.column == column)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Changes discarded because the row store was busy.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.rows().entries.clear();
    }

    /// Write every retained row as one JSON object per line.
    pub fn dump_jsonl<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for change in self.entries() {
            serde_json::to_writer(&mut writer, &change)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Rows> {
        self.inner
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
