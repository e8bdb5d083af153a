use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hyperamp_core::errors::HyperampError;
use tracing::info;

/// Lifecycle of an append-growing index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Nothing written yet during this run.
    Absent,
    /// Created by this run; further writes append.
    Present,
}

/// Append-only name index (vertex or hypertype names).
///
/// The first write creates (truncating any stale file from an earlier run);
/// every later write appends. There is no transition back to `Absent`.
#[derive(Debug)]
pub struct IndexFile {
    path: PathBuf,
    state: FileState,
}

impl IndexFile {
    /// Declares an index file that has not been written yet.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: FileState::Absent,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FileState {
        self.state
    }

    /// Location of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `lines` (each without trailing newline) in one batch.
    pub fn append_lines<I>(&mut self, lines: I) -> Result<(), HyperampError>
    where
        I: IntoIterator<Item = String>,
    {
        let file = match self.state {
            FileState::Absent => File::create(&self.path),
            FileState::Present => OpenOptions::new().append(true).open(&self.path),
        }
        .map_err(|err| HyperampError::io("index-open", &self.path, err))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{line}")
                .map_err(|err| HyperampError::io("index-write", &self.path, err))?;
        }
        writer
            .flush()
            .map_err(|err| HyperampError::io("index-write", &self.path, err))?;
        self.state = FileState::Present;
        Ok(())
    }
}

/// Buffers serialized records and writes them out in whole-file batches.
#[derive(Debug)]
pub struct OutputRotator {
    directory: PathBuf,
    prefix: String,
    extension: String,
    capacity: usize,
    next_suffix: u64,
    buffer: Vec<String>,
    files: Vec<PathBuf>,
    records_written: u64,
}

impl OutputRotator {
    /// Creates a rotator writing into `directory`, numbering files from
    /// `first_suffix`. `capacity` must be positive.
    pub fn new(
        directory: PathBuf,
        prefix: impl Into<String>,
        extension: impl Into<String>,
        capacity: usize,
        first_suffix: u64,
    ) -> Self {
        Self {
            directory,
            prefix: prefix.into(),
            extension: extension.into(),
            capacity,
            next_suffix: first_suffix,
            buffer: Vec::with_capacity(capacity),
            files: Vec::new(),
            records_written: 0,
        }
    }

    /// Buffers one record and flushes as soon as the buffer is full.
    pub fn append(&mut self, record: String) -> Result<(), HyperampError> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes the whole buffer to the next numbered file and clears it.
    ///
    /// Records go to a `.partial` sibling that is renamed into place once
    /// complete, so a rotated file never ends in a truncated record. An empty
    /// buffer writes nothing and consumes no suffix.
    pub fn flush(&mut self) -> Result<Option<PathBuf>, HyperampError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let name = format!("{}{}.{}", self.prefix, self.next_suffix, self.extension);
        let path = self.directory.join(&name);
        let staging = self.directory.join(format!("{name}.partial"));
        info!(file = %name, records = self.buffer.len(), "generating file");

        let file =
            File::create(&staging).map_err(|err| HyperampError::io("rotate-open", &staging, err))?;
        let mut writer = BufWriter::new(file);
        for record in &self.buffer {
            writer
                .write_all(record.as_bytes())
                .map_err(|err| HyperampError::io("rotate-write", &staging, err))?;
        }
        writer
            .flush()
            .map_err(|err| HyperampError::io("rotate-write", &staging, err))?;
        drop(writer);
        fs::rename(&staging, &path).map_err(|err| HyperampError::io("rotate-rename", &path, err))?;

        self.next_suffix += 1;
        self.records_written += self.buffer.len() as u64;
        self.buffer.clear();
        self.files.push(path.clone());
        Ok(Some(path))
    }

    /// Records waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Records already written to disk.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Rotated files written so far, in suffix order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
