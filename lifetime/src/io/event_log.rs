//! JSON-lines event log: one object per coordinator event.
//!
//! The log is a product artifact (unlike `tracing` output), written in emission
//! order so it can be replayed or diffed. A failed write never interrupts
//! stepping; it is reported through `tracing` and the event is dropped.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::notify::{Event, EventKind, Notifier};
use crate::run::RunSnapshot;

/// Serialized form of a single event line.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub seq: u64,
    pub event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated: Option<bool>,
}

impl EventRecord {
    pub fn from_event(seq: u64, event: &Event<'_>) -> Self {
        let terminated = match event {
            Event::LifetimeFinished { terminated, .. } => Some(*terminated),
            _ => None,
        };
        Self {
            seq,
            event: event.kind(),
            run: event.run().map(|run| run.snapshot()),
            terminated,
        }
    }
}

pub struct JsonLinesNotifier<W: Write> {
    writer: RefCell<W>,
    next_seq: Cell<u64>,
}

impl JsonLinesNotifier<BufWriter<File>> {
    /// Create (or truncate) a log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesNotifier<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
            next_seq: Cell::new(1),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.borrow_mut().flush().context("flush event log")
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_record(&self, record: &EventRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("serialize event record")?;
        line.push('\n');
        self.writer
            .borrow_mut()
            .write_all(line.as_bytes())
            .context("write event record")
    }
}

impl<W: Write> Notifier for JsonLinesNotifier<W> {
    fn emit(&self, event: &Event<'_>) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let record = EventRecord::from_event(seq, event);
        if let Err(err) = self.write_record(&record) {
            warn!(seq, event = %record.event, error = %format!("{err:#}"), "dropping event log record");
        }
    }
}
