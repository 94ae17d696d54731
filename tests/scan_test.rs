use std::fs::File;
use std::io::{Cursor, Write};

use parread::io::MappedFile;
use parread::{LineScanner, ScanStats, DEFAULT_LINE_BUFFER};
use tempfile::NamedTempFile;

#[test]
fn test_scanner_counts_lines_and_bytes() {
    let input = b"alpha\nbeta\n\ngamma";
    let stats = LineScanner::default().scan(Cursor::new(&input[..])).unwrap();

    assert_eq!(stats, ScanStats { lines: 4, bytes: input.len() as u64 });
}

#[test]
fn test_scanner_on_empty_input() {
    let stats = LineScanner::new(16).scan(Cursor::new(Vec::new())).unwrap();
    assert_eq!(stats, ScanStats::default());
}

#[test]
fn test_line_filling_buffer_with_newline_is_accepted() {
    let mut input = vec![b'x'; 15];
    input.push(b'\n');
    input.extend_from_slice(&[b'y'; 15]);

    let stats = LineScanner::new(16).scan(Cursor::new(input)).unwrap();
    assert_eq!(stats.lines, 2);
}

#[test]
fn test_line_leaving_no_room_for_newline_is_rejected() {
    let mut input = vec![b'x'; 16];
    input.push(b'\n');

    let err = LineScanner::new(16).scan(Cursor::new(input)).unwrap_err();
    assert!(err.to_string().contains("line 1 too long"), "{}", err);
}

#[test]
fn test_unterminated_line_filling_buffer_is_rejected() {
    let mut input = b"ok\n".to_vec();
    input.extend_from_slice(&[b'y'; 16]);

    let err = LineScanner::new(16).scan(Cursor::new(input)).unwrap_err();
    assert!(err.to_string().contains("line 2 too long"), "{}", err);
}

#[test]
fn test_line_longer_than_buffer_is_rejected() {
    let mut input = b"short\n".to_vec();
    input.extend_from_slice(&[b'z'; 17]);
    input.push(b'\n');

    let err = LineScanner::new(16).scan(Cursor::new(input)).unwrap_err();
    assert!(err.to_string().contains("line 2 too long"), "{}", err);
}

#[test]
fn test_default_buffer_is_512_kib() {
    assert_eq!(LineScanner::default().buffer_size(), 512 * 1024);
    assert_eq!(DEFAULT_LINE_BUFFER, 524_288);
}

#[test]
fn test_scanner_reads_file_handle() {
    let mut tmp = NamedTempFile::new().unwrap();
    for i in 0..1000 {
        writeln!(tmp, "record {}", i).unwrap();
    }
    tmp.flush().unwrap();

    let file = File::open(tmp.path()).unwrap();
    let stats = LineScanner::default().scan(&file).unwrap();
    assert_eq!(stats.lines, 1000);
}

#[test]
fn test_mapped_pass_touches_every_page() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&vec![3u8; 10_000]).unwrap();
    tmp.flush().unwrap();

    let file = File::open(tmp.path()).unwrap();
    let mapped = MappedFile::new(&file).unwrap();

    assert_eq!(mapped.len(), 10_000);
    assert_eq!(mapped.touch_pages(8192), 3);
}

#[test]
fn test_mapped_pass_counts_pages_for_unaligned_chunk_size() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&vec![9u8; 4096]).unwrap();
    tmp.flush().unwrap();

    let file = File::open(tmp.path()).unwrap();
    let mapped = MappedFile::new(&file).unwrap();
    assert_eq!(mapped.touch_pages(100), 1);

    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&vec![9u8; 10_000]).unwrap();
    tmp.flush().unwrap();

    let file = File::open(tmp.path()).unwrap();
    let mapped = MappedFile::new(&file).unwrap();
    assert_eq!(mapped.touch_pages(5000), 3);
    assert_eq!(mapped.touch_pages(1), 3);
}

#[test]
fn test_mapped_pass_on_empty_file() {
    let tmp = NamedTempFile::new().unwrap();
    let file = File::open(tmp.path()).unwrap();
    let mapped = MappedFile::new(&file).unwrap();

    assert!(mapped.is_empty());
    assert_eq!(mapped.touch_pages(4096), 0);
}
