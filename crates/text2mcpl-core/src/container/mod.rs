//! MCPL particle-list container: header model, writer, reader and gzip step.
//!
//! The pipeline only sees [`ParticleSink`]. The lifecycle is encoded in types:
//! [`ContainerBuilder`] is the unopened container whose header can still be
//! edited, [`McplWriter`] is the open container (header already on disk) and
//! [`FinalizedContainer`] is what remains after `finalize` consumed the writer.

mod gzip;
mod packing;
mod reader;
mod writer;

pub use gzip::{gzip_file, gzipped_path};
pub use packing::{pack_direction_ekin, unpack_direction_ekin};
pub use reader::{ContainerInfo, McplReader, read_container};
pub use writer::{ContainerBuilder, FinalizedContainer, McplWriter};

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MCPL_MAGIC: &[u8; 4] = b"MCPL";
pub const MCPL_FORMAT_VERSION: u32 = 3;
pub const MCPL_EXTENSION: &str = "mcpl";
/// Byte offset of the u64 particle count, patched when the writer finalizes.
pub(crate) const PARTICLE_COUNT_OFFSET: u64 = 8;

pub type ContainerResult<T> = Result<T, ContainerError>;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("not an MCPL container (bad magic bytes)")]
    BadMagic,

    #[error("unsupported MCPL format version {0}")]
    UnsupportedVersion(u32),

    #[error("unsupported endianness marker {0:?}")]
    BadEndianness(char),

    #[error("header string of {0} bytes does not fit a u32 length prefix")]
    StringTooLong(usize),

    #[error("malformed MCPL header: {0}")]
    MalformedHeader(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatPrecision {
    #[default]
    Single,
    Double,
}

impl FloatPrecision {
    pub const fn size(self) -> usize {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }
}

/// One particle in the container's schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McplParticle {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub ekin: f64,
    pub time: f64,
    pub weight: f64,
    pub pdgcode: i32,
}

/// Append side of an open container.
pub trait ParticleSink {
    fn append_particle(&mut self, particle: &McplParticle) -> ContainerResult<()>;

    fn particle_count(&self) -> u64;
}

impl ParticleSink for Vec<McplParticle> {
    fn append_particle(&mut self, particle: &McplParticle) -> ContainerResult<()> {
        self.push(*particle);
        Ok(())
    }

    fn particle_count(&self) -> u64 {
        self.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerHeader {
    pub source_name: String,
    pub comments: Vec<String>,
    pub precision: FloatPrecision,
}

impl ContainerHeader {
    /// Bytes per particle record: position, packed direction+ekin, time and
    /// weight as floats, followed by an i32 PDG code.
    pub fn particle_size(&self) -> usize {
        8 * self.precision.size() + std::mem::size_of::<i32>()
    }
}

/// Appends `.mcpl` unless the path already carries that extension.
pub fn normalize_container_path(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension == MCPL_EXTENSION);
    if has_extension {
        return path.to_path_buf();
    }

    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(MCPL_EXTENSION);
    PathBuf::from(raw)
}
