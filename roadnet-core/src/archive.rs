//! Feature archive file format.
//!
//! An archive is a fixed header (`RNFA` magic followed by a little-endian
//! `u16` version) and a stream of `bincode` frames. Each frame is either an
//! element or the end marker written when the stream is closed; a stream
//! without the end marker is treated as truncated.
//!
//! Encoding is deterministic: the same element sequence always produces the
//! same bytes.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bincode::{deserialize_from, serialize_into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Element;

/// File identifier for feature archives.
pub const ARCHIVE_MAGIC: [u8; 4] = *b"RNFA";

/// Supported version of the archive format.
pub const ARCHIVE_VERSION: u16 = 1;

#[derive(Serialize)]
enum FrameRef<'a> {
    Element(&'a Element),
    End,
}

#[derive(Deserialize)]
enum Frame {
    Element(Element),
    End,
}

/// Errors raised while reading or writing a feature archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive file could not be opened, written or flushed.
    #[error("archive I/O failed for {path}: {source}")]
    Io {
        /// Archive location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A frame could not be encoded.
    #[error("failed to encode element into {path}: {source}")]
    Encode {
        /// Archive location.
        path: PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// A frame could not be decoded, including a stream cut short.
    #[error("failed to decode element from {path}: {source}")]
    Decode {
        /// Archive location.
        path: PathBuf,
        /// Decoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not start with the archive magic.
    #[error("invalid archive magic in {path}: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Archive location.
        path: PathBuf,
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The archive uses a format version this build cannot read.
    #[error("unsupported archive version {found} in {path}; supported version is {supported}")]
    UnsupportedVersion {
        /// Archive location.
        path: PathBuf,
        /// Version present in the header.
        found: u16,
        /// Version written by this build.
        supported: u16,
    },
}

/// Destination for serialised elements.
pub trait ElementSink {
    /// Append one element to the stream.
    fn append(&mut self, element: &Element) -> Result<(), ArchiveError>;
}

impl ElementSink for Vec<Element> {
    fn append(&mut self, element: &Element) -> Result<(), ArchiveError> {
        self.push(element.clone());
        Ok(())
    }
}

/// Streaming archive writer.
///
/// Call [`ArchiveWriter::finish`] to write the end marker; dropping the writer
/// without finishing leaves a truncated archive that readers reject.
#[derive(Debug)]
pub struct ArchiveWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl ArchiveWriter {
    /// Create (or truncate) an archive at `path` and write its header.
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&ARCHIVE_MAGIC)
            .and_then(|()| writer.write_all(&ARCHIVE_VERSION.to_le_bytes()))
            .map_err(|source| ArchiveError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            written: 0,
        })
    }

    /// Write the end marker, flush and sync the file. Returns the element count.
    pub fn finish(mut self) -> Result<u64, ArchiveError> {
        serialize_into(&mut self.writer, &FrameRef::End).map_err(|source| {
            ArchiveError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        let file = self
            .writer
            .into_inner()
            .map_err(|err| ArchiveError::Io {
                path: self.path.clone(),
                source: err.into_error(),
            })?;
        file.sync_all().map_err(|source| ArchiveError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.written)
    }
}

impl ElementSink for ArchiveWriter {
    fn append(&mut self, element: &Element) -> Result<(), ArchiveError> {
        serialize_into(&mut self.writer, &FrameRef::Element(element)).map_err(|source| {
            ArchiveError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        self.written += 1;
        Ok(())
    }
}

/// Streaming archive reader yielding elements in file order.
#[derive(Debug)]
pub struct ArchiveReader {
    path: PathBuf,
    reader: BufReader<File>,
    finished: bool,
}

impl ArchiveReader {
    /// Open an archive and validate its header.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let io_error = |source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = BufReader::new(File::open(path).map_err(io_error)?);

        let mut magic = [0_u8; 4];
        reader.read_exact(&mut magic).map_err(io_error)?;
        if magic != ARCHIVE_MAGIC {
            return Err(ArchiveError::InvalidMagic {
                path: path.to_path_buf(),
                expected: ARCHIVE_MAGIC,
                found: magic,
            });
        }

        let mut version_bytes = [0_u8; 2];
        reader.read_exact(&mut version_bytes).map_err(io_error)?;
        let version = u16::from_le_bytes(version_bytes);
        if version != ARCHIVE_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: version,
                supported: ARCHIVE_VERSION,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            finished: false,
        })
    }
}

impl Iterator for ArchiveReader {
    type Item = Result<Element, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match deserialize_from(&mut self.reader) {
            Ok(Frame::Element(element)) => Some(Ok(element)),
            Ok(Frame::End) => {
                self.finished = true;
                None
            }
            Err(source) => {
                self.finished = true;
                Some(Err(ArchiveError::Decode {
                    path: self.path.clone(),
                    source,
                }))
            }
        }
    }
}

/// Read every element of an archive into memory.
pub fn read_archive(path: &Path) -> Result<Vec<Element>, ArchiveError> {
    ArchiveReader::open(path)?.collect()
}
