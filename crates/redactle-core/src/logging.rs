//! Activity log: a `tracing` layer that keeps recent events in memory.
//!
//! The terminal host cannot print log lines while it owns the screen, so it
//! installs an [`ActivityLog`] and shows what the [`ActivityReader`] returns.
//! Each entry keeps the message and every structured field, so events like
//! `info!(word = %w, count, "word revealed")` read back as
//! `word revealed word=paris count=2`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// One captured event.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    /// Time since the log was created.
    pub elapsed: Duration,
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Structured fields other than `message`, in recording order.
    pub fields: Vec<(String, String)>,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Ring {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    started: Instant,
}

impl Ring {
    fn push(&mut self, mut entry: ActivityEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        entry.elapsed = self.started.elapsed();
        self.entries.push_back(entry);
    }
}

/// Layer that records events into a bounded ring buffer.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    ring: Arc<Mutex<Ring>>,
}

impl ActivityLog {
    /// Keep at most `capacity` entries, dropping the oldest first.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Mutex::new(Ring {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                started: Instant::now(),
            })),
        }
    }

    pub fn reader(&self) -> ActivityReader {
        ActivityReader {
            ring: Arc::clone(&self.ring),
        }
    }
}

impl<S: Subscriber> Layer<S> for ActivityLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let entry = ActivityEntry {
            elapsed: Duration::ZERO,
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        };
        if let Ok(mut ring) = self.ring.lock() {
            ring.push(entry);
        }
    }
}

/// Read handle for an [`ActivityLog`].
#[derive(Debug, Clone)]
pub struct ActivityReader {
    ring: Arc<Mutex<Ring>>,
}

impl ActivityReader {
    /// Copy of the buffered entries, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.ring
            .lock()
            .map(|ring| ring.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The newest `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<ActivityEntry> {
        self.ring
            .lock()
            .map(|ring| {
                let skip = ring.entries.len().saturating_sub(n);
                ring.entries.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.ring.lock().map(|ring| ring.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }
}
