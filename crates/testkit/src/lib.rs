#![warn(missing_docs)]
//! Headless test surfaces: an in-memory world and a JSONL transfer log.

mod world;

use anyhow::Result;
use recreator_core::BlockPos;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use world::*;

/// One transfer attempt as written to the transfer log.
#[derive(Debug, Serialize)]
pub struct TransferRecord<'a, R> {
    /// Sequence number of the attempt within a run.
    pub step: u64,
    /// `"push"` or `"pull"`.
    pub kind: &'a str,
    /// Hopper making the attempt.
    pub hopper: BlockPos,
    /// Block pushed into or pulled from.
    pub target: BlockPos,
    /// Outcome reported by the engine.
    pub result: &'a R,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    out: BufWriter<File>,
    written: u64,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            written: 0,
        })
    }

    /// Append one record as a single line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush buffered records to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
