//! Compares a single-threaded line scan against a bounded-concurrency
//! parallel chunk read of the same file.

pub mod coord;
pub mod io;
pub mod logging;
pub mod parallel;
pub mod planner;
pub mod scan;
pub mod worker;

pub use parallel::{ChunkFailure, ParallelReader, ReadReport};
pub use planner::{plan, ChunkPlan, DEFAULT_CHUNK_SIZE};
pub use scan::{LineScanner, ScanStats, DEFAULT_LINE_BUFFER};
pub use worker::{read_chunk, PositionedRead};
