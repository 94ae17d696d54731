use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{error, warn};

use parread::io::{create_progress_bar, open_input, MappedFile};
use parread::{logging, LineScanner, ParallelReader, DEFAULT_CHUNK_SIZE, DEFAULT_LINE_BUFFER};

#[derive(Parser, Debug)]
#[command(name = "parread")]
#[command(about = "Time a synchronous line scan against a parallel chunked read of a file", long_about = None)]
struct Args {
    /// File to read
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Number of concurrent chunk readers (defaults to number of CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Bytes read by each parallel worker
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: NonZeroUsize,

    /// Line buffer of the synchronous scanner, in bytes
    #[arg(short, long, default_value_t = DEFAULT_LINE_BUFFER)]
    buffer_size: usize,

    /// Also time a memory-mapped pass over the file
    #[arg(long)]
    mmap: bool,

    /// Skip the synchronous baseline
    #[arg(long)]
    skip_sync: bool,

    /// Disable progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Log plan details and worker thread names
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let file = open_input(&args.input)?;
    let file_size = file.metadata()?.len();

    println!(
        "Reading {} ({:.2} MB)",
        args.input.display(),
        file_size as f64 / (1024.0 * 1024.0)
    );

    if !args.skip_sync {
        let scanner = LineScanner::new(args.buffer_size);
        let start_time = Instant::now();
        match scanner.scan(&file) {
            Ok(stats) => {
                let elapsed = start_time.elapsed();
                println!(
                    "time taken for synchronous file reading: {:.2?} ({} lines, {:.2} MB/s)",
                    elapsed,
                    stats.lines,
                    mb_per_sec(stats.bytes, elapsed)
                );
            }
            Err(e) => error!("synchronous scan failed: {:#}", e),
        }
    }

    let mut reader = ParallelReader::new(args.threads)?.with_chunk_size(args.chunk_size);
    let progress = if !args.quiet {
        let pb = create_progress_bar(0);
        reader = reader.with_progress(pb.clone());
        Some(pb)
    } else {
        None
    };
    println!("Using {} worker threads", reader.num_workers());

    let start_time = Instant::now();
    let report = reader.read(&file)?;
    let elapsed = start_time.elapsed();

    if let Some(ref pb) = progress {
        pb.finish_and_clear();
    }

    println!(
        "time taken for asynchronous file reading: {:.2?} ({} chunks, {:.2} MB/s)",
        elapsed,
        report.completed,
        mb_per_sec(report.bytes_read, elapsed)
    );
    if !report.failures.is_empty() {
        warn!(
            "{} of {} chunks failed to read",
            report.failures.len(),
            report.planned
        );
    }

    if args.mmap {
        let start_time = Instant::now();
        let mapped = MappedFile::new(&file)?;
        let pages = mapped.touch_pages(args.chunk_size.get());
        let elapsed = start_time.elapsed();
        println!(
            "time taken for memory-mapped file reading: {:.2?} ({} pages, {:.2} MB/s)",
            elapsed,
            pages,
            mb_per_sec(mapped.len() as u64, elapsed)
        );
    }

    Ok(())
}

fn mb_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    bytes as f64 / (1024.0 * 1024.0) / secs
}
