use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::coord::{AdmissionGate, CompletionBarrier};
use crate::planner::{self, DEFAULT_CHUNK_SIZE};
use crate::worker::{self, PositionedRead};

/// Reads a whole file as fixed-size chunks on a bounded pool of workers.
///
/// The pool is built once in [`ParallelReader::new`], so timing a call to
/// [`ParallelReader::read`] does not include thread start-up.
pub struct ParallelReader {
    num_workers: usize,
    pool: ThreadPool,
    chunk_size: NonZeroUsize,
    progress: Option<ProgressBar>,
}

/// A chunk whose positioned read failed with something other than EOF.
#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,
    pub offset: u64,
    pub error: io::Error,
}

/// What happened during one [`ParallelReader::read`] call.
#[derive(Debug)]
pub struct ReadReport {
    pub file_size: u64,
    pub planned: usize,
    pub completed: usize,
    pub bytes_read: u64,
    pub peak_in_flight: usize,
    pub failures: Vec<ChunkFailure>,
}

impl ReadReport {
    fn empty(file_size: u64) -> Self {
        Self {
            file_size,
            planned: 0,
            completed: 0,
            bytes_read: 0,
            peak_in_flight: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.completed == self.planned
    }
}

struct ChunkOutcome {
    index: usize,
    offset: u64,
    result: io::Result<usize>,
}

impl ParallelReader {
    pub fn new(num_workers: Option<usize>) -> Result<Self> {
        let num_workers = num_workers.unwrap_or_else(num_cpus::get).max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|i| format!("parread-worker-{i}"))
            .build()
            .context("Failed to build worker pool")?;

        Ok(Self {
            num_workers,
            pool,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: None,
        })
    }

    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Ticks `progress` once per finished chunk. Its length is set when the
    /// plan is known.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<ReadReport> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;

        self.read(&file)
    }

    /// Reads every chunk of `source` and blocks until all of them finished.
    ///
    /// Only a failed size query is returned as an error. Per-chunk failures
    /// are logged, collected into the report, and never stop other chunks.
    pub fn read<R>(&self, source: &R) -> Result<ReadReport>
    where
        R: PositionedRead + ?Sized,
    {
        let file_size = source.size().context("Failed to query file size")?;
        let plan = planner::plan(file_size, self.chunk_size);

        let tail_len = plan
            .len()
            .checked_sub(1)
            .and_then(|last| plan.chunk_len(last))
            .unwrap_or(0);

        debug!(
            file_size,
            chunks = plan.len(),
            chunk_size = self.chunk_size.get(),
            tail_len,
            workers = self.num_workers,
            "Planned parallel read"
        );

        if plan.is_empty() {
            if let Some(ref pb) = self.progress {
                pb.set_length(0);
            }
            return Ok(ReadReport::empty(file_size));
        }

        if let Some(ref pb) = self.progress {
            pb.set_length(plan.len() as u64);
        }

        let gate = AdmissionGate::new(self.num_workers);
        let barrier = CompletionBarrier::new();
        let outcomes = Mutex::new(Vec::with_capacity(plan.len()));
        let chunk_len = self.chunk_size.get();

        // Dispatch runs on the calling thread so a full gate never parks a
        // pool thread.
        self.pool.in_place_scope(|scope| {
            for (index, &offset) in plan.offsets().iter().enumerate() {
                let permit = gate.acquire();
                let signal = barrier.register();
                let outcomes = &outcomes;
                let progress = self.progress.as_ref();

                scope.spawn(move |_| {
                    // Permit drops before the signal, so a drained barrier
                    // also means every slot is back.
                    let _signal = signal;
                    let _permit = permit;

                    let result = worker::read_chunk(source, offset, chunk_len);
                    if let Err(ref err) = result {
                        warn!(index, offset, error = %err, "Chunk read failed");
                    }

                    outcomes
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(ChunkOutcome {
                            index,
                            offset,
                            result,
                        });

                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                });
            }

            barrier.wait();
        });

        let mut outcomes = outcomes.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcomes.sort_by_key(|o| o.index);

        let mut report = ReadReport {
            file_size,
            planned: plan.len(),
            completed: outcomes.len(),
            bytes_read: 0,
            peak_in_flight: gate.peak(),
            failures: Vec::new(),
        };

        for outcome in outcomes {
            match outcome.result {
                Ok(n) => report.bytes_read += n as u64,
                Err(error) => report.failures.push(ChunkFailure {
                    index: outcome.index,
                    offset: outcome.offset,
                    error,
                }),
            }
        }

        info!(
            chunks = report.completed,
            bytes = report.bytes_read,
            failed = report.failures.len(),
            peak_in_flight = report.peak_in_flight,
            "Parallel read finished"
        );

        Ok(report)
    }
}
