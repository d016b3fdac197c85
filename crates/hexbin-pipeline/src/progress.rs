//! Progress reporting through a single-writer channel.
//!
//! Workers never touch the display. They send [`ProgressEvent`]s through a
//! cloned [`ProgressHandle`]; one reporter thread drains the channel and
//! forwards each event to a [`ProgressSink`]. Reporting never influences the
//! computed results, and a closed channel is silently ignored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hexbin_common::{HexbinError, HexbinResult};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info, trace, warn};

/// Coarse (per chunk) and fine (per hexagon) progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    ChunkStarted {
        chunk: usize,
        total_chunks: usize,
        len: usize,
    },
    /// Hexagon `position` (0-based) of a chunk has been aggregated.
    HexagonDone {
        chunk: usize,
        position: usize,
        chunk_len: usize,
    },
    /// `elapsed` is the time spent on this chunk.
    ChunkDone {
        chunk: usize,
        total_chunks: usize,
        elapsed: Duration,
    },
}

/// Consumer of progress events. Only ever called from the reporter thread.
pub trait ProgressSink: Send {
    /// `elapsed` is measured from the start of reporting.
    fn on_event(&mut self, event: &ProgressEvent, elapsed: Duration);

    /// Called once after the last event.
    fn finish(&mut self, _elapsed: Duration) {}
}

/// Sending side of the progress channel.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    tx: Option<Sender<ProgressEvent>>,
}

impl ProgressHandle {
    /// A handle that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // Reporter gone: progress is best effort
            let _ = tx.send(event);
        }
    }
}

/// Owns the reporter thread.
///
/// Every [`ProgressHandle`] clone must be dropped before [`finish`](Self::finish)
/// returns, since the thread exits when the channel closes.
pub struct ProgressReporter {
    handle: ProgressHandle,
    thread: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start the reporter thread draining into `sink`.
    pub fn spawn<S>(mut sink: S) -> HexbinResult<Self>
    where
        S: ProgressSink + 'static,
    {
        let (tx, rx) = mpsc::channel::<ProgressEvent>();

        let thread = thread::Builder::new()
            .name("hexbin-progress".to_string())
            .spawn(move || {
                let started = Instant::now();
                for event in rx {
                    sink.on_event(&event, started.elapsed());
                }
                sink.finish(started.elapsed());
            })
            .map_err(|e| {
                HexbinError::Internal(format!("failed to start progress reporter: {}", e))
            })?;

        Ok(Self {
            handle: ProgressHandle { tx: Some(tx) },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    /// Close the channel and wait for the sink to drain.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.handle.tx = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Progress reporter thread panicked");
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&mut self, _event: &ProgressEvent, _elapsed: Duration) {}
}

/// Writes progress to the tracing log: chunks at info, hexagons at trace.
#[derive(Debug, Default)]
pub struct LogSink {
    completed: usize,
}

impl ProgressSink for LogSink {
    fn on_event(&mut self, event: &ProgressEvent, elapsed: Duration) {
        match *event {
            ProgressEvent::ChunkStarted {
                chunk,
                total_chunks,
                len,
            } => {
                debug!(chunk = chunk + 1, total_chunks, hexagons = len, "Chunk started");
            }
            ProgressEvent::HexagonDone {
                chunk,
                position,
                chunk_len,
            } => {
                trace!(chunk = chunk + 1, hexagon = position + 1, chunk_len, "Hexagon done");
            }
            ProgressEvent::ChunkDone {
                chunk,
                total_chunks,
                elapsed: chunk_elapsed,
            } => {
                self.completed += 1;
                info!(
                    chunk = chunk + 1,
                    completed = self.completed,
                    total_chunks,
                    chunk_secs = chunk_elapsed.as_secs_f64(),
                    elapsed_secs = elapsed.as_secs_f64(),
                    "Chunk {} of {} complete",
                    self.completed,
                    total_chunks
                );
            }
        }
    }
}

/// Terminal progress bars: one for chunks, one per running chunk for its
/// hexagons.
pub struct BarSink {
    multi: MultiProgress,
    overall: Option<ProgressBar>,
    chunks: HashMap<usize, ProgressBar>,
}

impl BarSink {
    /// Bars drawn to stderr.
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Bars that are tracked but never drawn.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            overall: None,
            chunks: HashMap::new(),
        }
    }

    fn overall(&mut self, total_chunks: usize) -> &ProgressBar {
        let multi = &self.multi;
        self.overall.get_or_insert_with(|| {
            let bar = multi.add(ProgressBar::new(total_chunks as u64));
            bar.set_style(bar_style(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks {msg}",
            ));
            bar
        })
    }
}

impl Default for BarSink {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl ProgressSink for BarSink {
    fn on_event(&mut self, event: &ProgressEvent, _elapsed: Duration) {
        match *event {
            ProgressEvent::ChunkStarted {
                chunk,
                total_chunks,
                len,
            } => {
                self.overall(total_chunks);
                let bar = self.multi.add(ProgressBar::new(len as u64));
                bar.set_style(bar_style("  chunk {msg} {bar:30.green/white} {pos}/{len}"));
                bar.set_message(format!("{}/{}", chunk + 1, total_chunks));
                self.chunks.insert(chunk, bar);
            }
            ProgressEvent::HexagonDone { chunk, .. } => {
                if let Some(bar) = self.chunks.get(&chunk) {
                    bar.inc(1);
                }
            }
            ProgressEvent::ChunkDone {
                chunk,
                total_chunks,
                ..
            } => {
                if let Some(bar) = self.chunks.remove(&chunk) {
                    bar.finish_and_clear();
                    self.multi.remove(&bar);
                }
                self.overall(total_chunks).inc(1);
            }
        }
    }

    fn finish(&mut self, elapsed: Duration) {
        for (_, bar) in self.chunks.drain() {
            bar.finish_and_clear();
        }
        if let Some(bar) = &self.overall {
            bar.finish_with_message(format!("done in {:.1}s", elapsed.as_secs_f64()));
        }
    }
}

/// Shared event counters.
#[derive(Debug, Default)]
pub struct ProgressCounts {
    chunks_started: AtomicU64,
    hexagons_done: AtomicU64,
    chunks_done: AtomicU64,
}

impl ProgressCounts {
    pub fn chunks_started(&self) -> u64 {
        self.chunks_started.load(Ordering::Relaxed)
    }

    pub fn hexagons_done(&self) -> u64 {
        self.hexagons_done.load(Ordering::Relaxed)
    }

    pub fn chunks_done(&self) -> u64 {
        self.chunks_done.load(Ordering::Relaxed)
    }
}

/// Counts events; the counts stay readable after the sink moves into the
/// reporter thread.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    counts: Arc<ProgressCounts>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> Arc<ProgressCounts> {
        Arc::clone(&self.counts)
    }
}

impl ProgressSink for RecordingSink {
    fn on_event(&mut self, event: &ProgressEvent, _elapsed: Duration) {
        let counter = match event {
            ProgressEvent::ChunkStarted { .. } => &self.counts.chunks_started,
            ProgressEvent::HexagonDone { .. } => &self.counts.hexagons_done,
            ProgressEvent::ChunkDone { .. } => &self.counts.chunks_done,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
