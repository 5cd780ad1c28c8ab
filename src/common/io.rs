/// Record file loading and writing for the sort driver.
/// Input is one record per line. Reading uses zero-copy mmap above a size
/// threshold with an owned-Vec fallback; output goes through batched
/// vectored writes straight from the record buffers.
use std::fs::File;
use std::io::{self, BufWriter, IoSlice, Read, Write};
use std::ops::Deref;

use memmap2::Mmap;
use thiserror::Error;

/// I/O failure with the offending path attached.
#[derive(Debug, Error)]
pub enum RecordIoError {
    #[error("open failed: {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("read failed: {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("write failed: {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// Holds file data — either zero-copy mmap or an owned Vec.
/// Dereferences to `&[u8]` for transparent use.
pub enum FileData {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Deref for FileData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileData::Mmap(m) => m,
            FileData::Owned(v) => v,
        }
    }
}

/// Threshold below which we use read() instead of mmap; mmap setup and
/// teardown overhead exceeds the zero-copy benefit for small files.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// 4MB output buffer — reduces flush frequency for large record sets.
const OUTPUT_BUF_SIZE: usize = 4 * 1024 * 1024;

/// Maximum IoSlices per writev call (Linux IOV_MAX = 1024).
const IOV_BATCH: usize = 1024;

/// Read one input source fully; "-" means stdin.
fn read_source(path: &str) -> Result<FileData, RecordIoError> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|e| RecordIoError::Read {
                path: path.to_string(),
                source: e,
            })?;
        return Ok(FileData::Owned(data));
    }

    let mut file = File::open(path).map_err(|e| RecordIoError::Open {
        path: path.to_string(),
        source: e,
    })?;
    let len = file
        .metadata()
        .map_err(|e| RecordIoError::Read {
            path: path.to_string(),
            source: e,
        })?
        .len();

    if len >= MMAP_THRESHOLD {
        // SAFETY: read-only mapping; the file is not mutated while mapped.
        if let Ok(mmap) = unsafe { Mmap::map(&file) } {
            #[cfg(target_os = "linux")]
            {
                let _ = mmap.advise(memmap2::Advice::Sequential);
            }
            return Ok(FileData::Mmap(mmap));
        }
        // mmap failed — fall back to read
    }

    let mut data = Vec::with_capacity(len as usize);
    file.read_to_end(&mut data).map_err(|e| RecordIoError::Read {
        path: path.to_string(),
        source: e,
    })?;
    Ok(FileData::Owned(data))
}

/// Split a buffer into owned records, one per line.
/// Strips the newline and a CR before it; a trailing line without a
/// newline still counts as a record.
pub fn split_records(data: &[u8]) -> Vec<Vec<u8>> {
    let mut records = Vec::with_capacity(data.len() / 16 + 1);
    let mut start = 0usize;

    for pos in memchr::memchr_iter(b'\n', data) {
        let mut end = pos;
        if end > start && data[end - 1] == b'\r' {
            end -= 1;
        }
        records.push(data[start..end].to_vec());
        start = pos + 1;
    }

    if start < data.len() {
        let mut end = data.len();
        if data[end - 1] == b'\r' {
            end -= 1;
        }
        records.push(data[start..end].to_vec());
    }

    records
}

/// Read records from every input in order; "-" reads stdin.
pub fn read_records(inputs: &[String]) -> Result<Vec<Vec<u8>>, RecordIoError> {
    let mut records = Vec::new();
    for input in inputs {
        let data = read_source(input)?;
        if records.is_empty() {
            records = split_records(&data);
        } else {
            records.extend(split_records(&data));
        }
    }
    Ok(records)
}

/// Write all IoSlices, handling partial writes and batching.
fn write_all_slices(out: &mut impl Write, slices: &[IoSlice<'_>]) -> io::Result<()> {
    let mut offset = 0;
    while offset < slices.len() {
        let end = (offset + IOV_BATCH).min(slices.len());
        let n = out.write_vectored(&slices[offset..end])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "failed to write any data",
            ));
        }
        let mut remaining = n;
        while offset < end && remaining >= slices[offset].len() {
            remaining -= slices[offset].len();
            offset += 1;
        }
        if remaining > 0 && offset < end {
            out.write_all(&slices[offset][remaining..])?;
            offset += 1;
        }
    }
    Ok(())
}

/// Write records newline-terminated, vectored straight from the record
/// buffers.
fn write_to(records: &[Vec<u8>], out: &mut impl Write) -> io::Result<()> {
    let mut slices: Vec<IoSlice<'_>> = Vec::with_capacity(records.len().min(IOV_BATCH) * 2);
    for record in records {
        slices.push(IoSlice::new(record));
        slices.push(IoSlice::new(b"\n"));
        if slices.len() >= IOV_BATCH {
            write_all_slices(out, &slices)?;
            slices.clear();
        }
    }
    if !slices.is_empty() {
        write_all_slices(out, &slices)?;
    }
    out.flush()
}

/// Write sorted records to a file, or stdout when `output` is None.
pub fn write_records(records: &[Vec<u8>], output: Option<&str>) -> Result<(), RecordIoError> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| RecordIoError::Open {
                path: path.to_string(),
                source: e,
            })?;
            let mut writer = BufWriter::with_capacity(OUTPUT_BUF_SIZE, file);
            write_to(records, &mut writer).map_err(|e| RecordIoError::Write {
                path: path.to_string(),
                source: e,
            })
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::with_capacity(OUTPUT_BUF_SIZE, stdout.lock());
            write_to(records, &mut writer).map_err(|e| RecordIoError::Write {
                path: "-".to_string(),
                source: e,
            })
        }
    }
}
