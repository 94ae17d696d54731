use std::fs::File;
use std::hint::black_box;
use std::io;

/// A byte source that can be read at explicit offsets from many threads at
/// once, without a shared cursor.
pub trait PositionedRead: Sync {
    /// Reads into `buf` starting at `offset`, returning how many bytes were
    /// read. `Ok(0)` means end of file.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Total size of the source in bytes.
    fn size(&self) -> io::Result<u64>;
}

impl PositionedRead for File {
    #[cfg(unix)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// Reads up to `length` bytes at `offset` and throws them away.
///
/// Stopping short at end of file is a success; the returned count tells how
/// many bytes were actually read.
pub fn read_chunk<R>(source: &R, offset: u64, length: usize) -> io::Result<usize>
where
    R: PositionedRead + ?Sized,
{
    let mut buf = vec![0u8; length];
    let mut filled = 0;

    while filled < buf.len() {
        match source.read_at(&mut buf[filled..], offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    // Keep the read from being optimized away.
    black_box(&buf);
    Ok(filled)
}
