// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! File based dataset sink
//!
//! Every captured frame is written to its own postcard serialized file.
//! An index file lists one `<file name>\t<label code>` line per frame.

use super::DatasetSink;
use crate::error::{Error, Result};
use crate::messages::{CameraFrame, LightState, PixelEncoding};
use crate::timestamp::Timestamp;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the index file within the dataset directory
pub const INDEX_FILE_NAME: &str = "img_dataset.tsv";

/// Serialized frame. This is the borrowed version.
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    pub timestamp: Timestamp,
    pub width: u32,
    pub height: u32,
    pub encoding: PixelEncoding,
    pub label: LightState,
    pub data: &'a [u8],
}

/// Serialized frame. This is the owned version.
#[derive(Debug, Deserialize)]
pub struct OwnedFrameRecord {
    pub timestamp: Timestamp,
    pub width: u32,
    pub height: u32,
    pub encoding: PixelEncoding,
    pub label: LightState,
    pub data: Vec<u8>,
}

impl From<OwnedFrameRecord> for CameraFrame {
    fn from(record: OwnedFrameRecord) -> Self {
        CameraFrame::new(
            record.timestamp,
            record.width,
            record.height,
            record.encoding,
            record.data,
        )
    }
}

/// Read back a frame file written by [DatasetWriter]
pub fn read_frame(path: impl AsRef<Path>) -> Result<OwnedFrameRecord> {
    let bytes = fs::read(path).map_err(|e| Error::Io((e, "failed to read frame file")))?;
    Ok(postcard::from_bytes(&bytes)?)
}

/// Writes captured frames into a dataset directory
#[derive(Debug)]
pub struct DatasetWriter {
    directory: PathBuf,
    index: BufWriter<fs::File>,
    seq: u64,
}

impl DatasetWriter {
    /// Open the dataset in `directory`, creating it if needed.
    ///
    /// The index file is appended to, so repeated runs extend the dataset.
    pub fn create(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)
            .map_err(|e| Error::Io((e, "failed to create dataset directory")))?;
        let index_path = directory.join(INDEX_FILE_NAME);

        // Continue numbering after the frames of earlier runs
        let seq = fs::read_to_string(&index_path)
            .map(|index| index.lines().count() as u64)
            .unwrap_or(0);
        let index = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&index_path)
            .map_err(|e| Error::Io((e, "failed to open dataset index")))?;
        info!("Dataset will be created at {}", directory.display());

        Ok(Self {
            directory,
            index: BufWriter::new(index),
            seq,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl DatasetSink for DatasetWriter {
    fn write(&mut self, frame: &CameraFrame, label: LightState) -> Result<()> {
        let file_name = format!("{}-{}.frame", u64::from(frame.timestamp), self.seq);
        self.seq += 1;

        let record = FrameRecord {
            timestamp: frame.timestamp,
            width: frame.width,
            height: frame.height,
            encoding: frame.encoding,
            label,
            data: frame.data.as_slice(),
        };
        let serialized = postcard::to_allocvec(&record)?;
        fs::write(self.directory.join(&file_name), serialized)
            .map_err(|e| Error::Io((e, "failed to write frame file")))?;

        // Only list the frame once its file exists
        writeln!(self.index, "{file_name}\t{}", label.code())
            .and_then(|_| self.index.flush())
            .map_err(|e| Error::Io((e, "failed to write dataset index")))?;
        debug!("Captured {file_name} labelled {label}");
        Ok(())
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        // Try to flush pending data.
        if let Err(e) = self.index.flush() {
            error!("Failed to flush dataset index: {e}");
        }
    }
}
