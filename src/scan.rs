use std::io::{BufRead, BufReader, Read};

use anyhow::{bail, Context, Result};

/// Default line buffer of the synchronous scanner. Lines in the inputs this
/// tool was built for are far longer than 64 KiB.
pub const DEFAULT_LINE_BUFFER: usize = 512 * 1024;

/// Single-threaded, line-at-a-time baseline reader.
pub struct LineScanner {
    buffer_size: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: u64,
    pub bytes: u64,
}

impl LineScanner {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Reads `reader` to the end one line at a time, discarding every line.
    ///
    /// A line must fit in the buffer together with its `\n`; an unterminated
    /// last line must be shorter than the buffer. Anything longer is an error.
    pub fn scan<R: Read>(&self, reader: R) -> Result<ScanStats> {
        let mut reader = BufReader::with_capacity(self.buffer_size, reader);
        let mut line = Vec::with_capacity(self.buffer_size);
        let mut stats = ScanStats::default();

        loop {
            line.clear();
            let n = (&mut reader)
                .take(self.buffer_size as u64)
                .read_until(b'\n', &mut line)
                .with_context(|| format!("Failed to read line {}", stats.lines + 1))?;

            if n == 0 {
                break;
            }

            if !line.ends_with(b"\n") && line.len() >= self.buffer_size {
                bail!(
                    "line {} too long: exceeds buffer of {} bytes",
                    stats.lines + 1,
                    self.buffer_size
                );
            }

            stats.lines += 1;
            stats.bytes += n as u64;
        }

        Ok(stats)
    }
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_BUFFER)
    }
}
