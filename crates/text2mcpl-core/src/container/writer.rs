use super::gzip::gzip_file;
use super::packing::pack_direction_ekin;
use super::{
    ContainerError, ContainerHeader, ContainerResult, FloatPrecision, MCPL_FORMAT_VERSION,
    MCPL_MAGIC, McplParticle, PARTICLE_COUNT_OFFSET, ParticleSink, normalize_container_path,
};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Unopened container. Header fields can only be edited here; `create`
/// consumes the builder, so the header is frozen before the first append.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    path: PathBuf,
    header: ContainerHeader,
}

impl ContainerBuilder {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: normalize_container_path(path.as_ref()),
            header: ContainerHeader::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_name(mut self, source_name: impl Into<String>) -> Self {
        self.header.source_name = source_name.into();
        self
    }

    pub fn add_comment(mut self, comment: impl Into<String>) -> Self {
        self.header.comments.push(comment.into());
        self
    }

    pub fn precision(mut self, precision: FloatPrecision) -> Self {
        self.header.precision = precision;
        self
    }

    pub fn create(self) -> ContainerResult<McplWriter> {
        let header_bytes = encode_header(&self.header)?;
        let file = File::create(&self.path)?;
        let mut output = BufWriter::new(file);
        output.write_all(&header_bytes)?;
        debug!(
            path = %self.path.display(),
            header_bytes = header_bytes.len(),
            "created MCPL container"
        );

        Ok(McplWriter {
            path: self.path,
            header: self.header,
            output,
            particle_count: 0,
            record: Vec::new(),
        })
    }
}

/// Open container with its header already written.
#[derive(Debug)]
pub struct McplWriter {
    path: PathBuf,
    header: ContainerHeader,
    output: BufWriter<File>,
    particle_count: u64,
    record: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedContainer {
    pub path: PathBuf,
    pub particle_count: u64,
    pub compressed: bool,
}

impl McplWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Patches the particle count into the header, closes the file and
    /// optionally replaces it with a gzip-compressed copy.
    pub fn finalize(mut self, compress: bool) -> ContainerResult<FinalizedContainer> {
        self.output.flush()?;
        let mut file = self
            .output
            .into_inner()
            .map_err(|error| ContainerError::from(error.into_error()))?;
        file.seek(SeekFrom::Start(PARTICLE_COUNT_OFFSET))?;
        file.write_all(&self.particle_count.to_le_bytes())?;
        file.sync_all()?;
        drop(file);

        let path = if compress {
            gzip_file(&self.path)?
        } else {
            self.path
        };

        Ok(FinalizedContainer {
            path,
            particle_count: self.particle_count,
            compressed: compress,
        })
    }
}

impl ParticleSink for McplWriter {
    fn append_particle(&mut self, particle: &McplParticle) -> ContainerResult<()> {
        self.record.clear();
        let precision = self.header.precision;
        let packed = pack_direction_ekin(particle.direction, particle.ekin);

        for value in particle.position.iter().chain(packed.iter()) {
            push_float(&mut self.record, precision, *value);
        }
        push_float(&mut self.record, precision, particle.time);
        push_float(&mut self.record, precision, particle.weight);
        self.record.extend_from_slice(&particle.pdgcode.to_le_bytes());

        self.output.write_all(&self.record)?;
        self.particle_count += 1;
        Ok(())
    }

    fn particle_count(&self) -> u64 {
        self.particle_count
    }
}

fn push_float(buffer: &mut Vec<u8>, precision: FloatPrecision, value: f64) {
    match precision {
        FloatPrecision::Single => buffer.extend_from_slice(&(value as f32).to_le_bytes()),
        FloatPrecision::Double => buffer.extend_from_slice(&value.to_le_bytes()),
    }
}

fn push_string(buffer: &mut Vec<u8>, value: &str) -> ContainerResult<()> {
    let length =
        u32::try_from(value.len()).map_err(|_| ContainerError::StringTooLong(value.len()))?;
    buffer.extend_from_slice(&length.to_le_bytes());
    buffer.extend_from_slice(value.as_bytes());
    Ok(())
}

fn encode_header(header: &ContainerHeader) -> ContainerResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(128);
    bytes.extend_from_slice(MCPL_MAGIC);
    bytes.extend_from_slice(format!("{MCPL_FORMAT_VERSION:03}").as_bytes());
    bytes.push(b'L');
    bytes.extend_from_slice(&0_u64.to_le_bytes());

    let comment_count = u32::try_from(header.comments.len())
        .map_err(|_| ContainerError::MalformedHeader("too many comments".to_string()))?;
    let singleprec = u32::from(header.precision == FloatPrecision::Single);
    let particle_size = header.particle_size() as u32;
    let words: [u32; 8] = [
        comment_count,
        0, // blobs
        0, // userflags
        0, // polarisation
        singleprec,
        0, // universal pdg code
        particle_size,
        0, // universal weight
    ];
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }

    push_string(&mut bytes, &header.source_name)?;
    for comment in &header.comments {
        push_string(&mut bytes, comment)?;
    }
    Ok(bytes)
}
