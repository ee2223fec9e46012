//! Background snapshot writer.
//!
//! # Responsibility
//! - Take save requests off the mutating thread.
//! - Write them in submission order through one `PersistenceAdapter`.
//!
//! # Invariants
//! - A single FIFO channel feeds the worker, so an older snapshot is never
//!   written after a newer one.
//! - When several snapshots are queued only the newest is written.
//! - `flush` returns only after every earlier submission was handled.

use super::adapter::PersistenceAdapter;
use crate::model::item::Item;
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WRITER_THREAD_NAME: &str = "todos-snapshot-writer";

enum Command {
    Save(Vec<Item>),
    Flush(Sender<()>),
    Shutdown,
}

#[derive(Debug, Default)]
struct WriterStats {
    written: AtomicUsize,
    failed: AtomicUsize,
}

/// Cloneable fire-and-forget handle for submitting snapshots.
#[derive(Clone)]
pub struct SnapshotSink {
    sender: Sender<Command>,
}

impl SnapshotSink {
    /// Enqueues `items` for writing and returns immediately.
    ///
    /// Returns `false` when the writer has already shut down; the snapshot
    /// is dropped and the event is logged.
    pub fn submit(&self, items: Vec<Item>) -> bool {
        let count = items.len();
        match self.sender.send(Command::Save(items)) {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    "event=snapshot_submit module=persistence status=error error_code=writer_closed items={}",
                    count
                );
                false
            }
        }
    }
}

/// Owner of the writer thread.
///
/// Dropping the writer drains queued snapshots and joins the thread.
pub struct SnapshotWriter {
    sink: SnapshotSink,
    stats: Arc<WriterStats>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Starts the worker thread, moving `adapter` onto it.
    pub fn spawn<S>(adapter: PersistenceAdapter<S>) -> io::Result<Self>
    where
        S: KeyValueStore + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let stats = Arc::new(WriterStats::default());
        let worker_stats = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_worker(adapter, receiver, worker_stats))?;

        Ok(Self {
            sink: SnapshotSink { sender },
            stats,
            handle: Some(handle),
        })
    }

    /// Returns a handle that can submit snapshots from anywhere.
    pub fn sink(&self) -> SnapshotSink {
        self.sink.clone()
    }

    /// Blocks until every snapshot submitted before this call was handled.
    ///
    /// Returns `false` when the worker is no longer running.
    pub fn flush(&self) -> bool {
        let (ack_sender, ack_receiver) = mpsc::channel();
        if self.sink.sender.send(Command::Flush(ack_sender)).is_err() {
            return false;
        }
        ack_receiver.recv().is_ok()
    }

    /// Number of snapshots written successfully so far.
    pub fn written_snapshots(&self) -> usize {
        self.stats.written.load(Ordering::Relaxed)
    }

    /// Number of snapshots whose write failed even after the retry.
    pub fn failed_writes(&self) -> usize {
        self.stats.failed.load(Ordering::Relaxed)
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        let _ = self.sink.sender.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=snapshot_writer_stop module=persistence status=error error_code=worker_panicked");
            }
        }
    }
}

fn run_worker<S: KeyValueStore>(
    adapter: PersistenceAdapter<S>,
    receiver: Receiver<Command>,
    stats: Arc<WriterStats>,
) {
    info!("event=snapshot_writer_start module=persistence status=ok");

    let mut running = true;
    while running {
        let Ok(first) = receiver.recv() else {
            break;
        };

        let mut latest = None;
        let mut acks = Vec::new();
        let mut coalesced = 0usize;
        let mut next = Some(first);
        while let Some(command) = next.take() {
            match command {
                Command::Save(items) => {
                    if latest.replace(items).is_some() {
                        coalesced += 1;
                    }
                }
                Command::Flush(ack) => acks.push(ack),
                Command::Shutdown => {
                    running = false;
                    break;
                }
            }
            next = receiver.try_recv().ok();
        }

        if let Some(items) = latest {
            write_snapshot(&adapter, &items, coalesced, &stats);
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }

    info!(
        "event=snapshot_writer_stop module=persistence status=ok written={} failed={}",
        stats.written.load(Ordering::Relaxed),
        stats.failed.load(Ordering::Relaxed)
    );
}

fn write_snapshot<S: KeyValueStore>(
    adapter: &PersistenceAdapter<S>,
    items: &[Item],
    coalesced: usize,
    stats: &WriterStats,
) {
    let started_at = Instant::now();
    match adapter.save(items) {
        Ok(()) => {
            stats.written.fetch_add(1, Ordering::Relaxed);
            debug!(
                "event=snapshot_save module=persistence status=ok items={} coalesced={} duration_ms={}",
                items.len(),
                coalesced,
                started_at.elapsed().as_millis()
            );
        }
        Err(err) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            error!(
                "event=snapshot_save module=persistence status=error items={} duration_ms={} error_code=snapshot_write_failed error={}",
                items.len(),
                started_at.elapsed().as_millis(),
                err
            );
        }
    }
}
