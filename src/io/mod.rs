use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::{Mmap, MmapOptions};
use rayon::prelude::*;
use std::fs::File;
use std::hint::black_box;
use std::path::Path;

pub const PAGE_SIZE: usize = 4096;

pub fn open_input<P: AsRef<Path>>(path: P) -> Result<File> {
    File::open(&path)
        .with_context(|| format!("Failed to open input file: {}", path.as_ref().display()))
}

/// Read-only mapping of a whole file. Empty files are never mapped.
pub struct MappedFile {
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn new(file: &File) -> Result<Self> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(Self { mmap: None });
        }

        let mmap = unsafe {
            MmapOptions::new()
                .map(file)
                .with_context(|| "Failed to memory-map input file")?
        };

        Ok(Self { mmap: Some(mmap) })
    }

    pub fn len(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Faults in every page by touching one byte per page. Work is split
    /// into slices of about `chunk_size` bytes, rounded up to whole pages,
    /// and spread over the rayon pool. Returns the pages touched.
    pub fn touch_pages(&self, chunk_size: usize) -> u64 {
        let Some(ref mmap) = self.mmap else {
            return 0;
        };

        let stride = chunk_size.div_ceil(PAGE_SIZE).max(1) * PAGE_SIZE;

        mmap[..]
            .par_chunks(stride)
            .map(|slice| {
                let folded = slice.iter().step_by(PAGE_SIZE).fold(0u8, |acc, &b| acc ^ b);
                black_box(folded);
                slice.len().div_ceil(PAGE_SIZE) as u64
            })
            .sum()
    }
}

pub fn create_progress_bar(total_chunks: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_chunks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
