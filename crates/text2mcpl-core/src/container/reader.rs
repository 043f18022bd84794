use super::gzip::GZIP_MAGIC;
use super::packing::unpack_direction_ekin;
use super::{
    ContainerError, ContainerHeader, ContainerResult, FloatPrecision, MCPL_FORMAT_VERSION,
    MCPL_MAGIC, McplParticle,
};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// Header data plus the format options needed to decode particle records.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    pub header: ContainerHeader,
    pub particle_count: u64,
    pub particle_size: u32,
    pub polarisation: bool,
    pub userflags: bool,
    pub universal_pdgcode: Option<i32>,
    pub universal_weight: Option<f64>,
    pub blob_keys: Vec<String>,
}

/// Sequential reader for plain or gzip-compressed MCPL containers.
pub struct McplReader {
    input: Box<dyn Read>,
    endian: Endian,
    info: ContainerInfo,
    remaining: u64,
    record: Vec<u8>,
}

impl McplReader {
    pub fn open(path: &Path) -> ContainerResult<Self> {
        let mut buffered = BufReader::new(File::open(path)?);
        let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
        let input: Box<dyn Read> = if is_gzip {
            Box::new(BufReader::new(GzDecoder::new(buffered)))
        } else {
            Box::new(buffered)
        };
        Self::from_reader(input)
    }

    pub fn from_reader(mut input: Box<dyn Read>) -> ContainerResult<Self> {
        let mut preamble = [0_u8; 8];
        input.read_exact(&mut preamble)?;
        if &preamble[..4] != MCPL_MAGIC {
            return Err(ContainerError::BadMagic);
        }
        let version = std::str::from_utf8(&preamble[4..7])
            .ok()
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| ContainerError::MalformedHeader("unreadable version".to_string()))?;
        if version != MCPL_FORMAT_VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }
        let endian = match preamble[7] {
            b'L' => Endian::Little,
            b'B' => Endian::Big,
            other => return Err(ContainerError::BadEndianness(char::from(other))),
        };

        let particle_count = read_u64(&mut input, endian)?;
        let mut words = [0_u32; 8];
        for word in &mut words {
            *word = read_u32(&mut input, endian)?;
        }
        let [ncomments, nblobs, userflags, polarisation, singleprec, pdg, particle_size, uweight] =
            words;
        let precision = if singleprec != 0 {
            FloatPrecision::Single
        } else {
            FloatPrecision::Double
        };
        let universal_weight = if uweight != 0 {
            Some(f64::from_bits(read_u64(&mut input, endian)?))
        } else {
            None
        };

        let source_name = read_string(&mut input, endian)?;
        let mut comments = Vec::with_capacity(ncomments as usize);
        for _ in 0..ncomments {
            comments.push(read_string(&mut input, endian)?);
        }
        let mut blob_keys = Vec::with_capacity(nblobs as usize);
        for _ in 0..nblobs {
            blob_keys.push(read_string(&mut input, endian)?);
        }
        for _ in 0..nblobs {
            let length = read_u32(&mut input, endian)?;
            std::io::copy(&mut (&mut input).take(u64::from(length)), &mut std::io::sink())?;
        }

        let expected_size = expected_particle_size(
            precision,
            polarisation != 0,
            uweight != 0,
            pdg != 0,
            userflags != 0,
        );
        if particle_size as usize != expected_size {
            return Err(ContainerError::MalformedHeader(format!(
                "particle size {} does not match the {} bytes implied by the header flags",
                particle_size, expected_size
            )));
        }

        let info = ContainerInfo {
            header: ContainerHeader {
                source_name,
                comments,
                precision,
            },
            particle_count,
            particle_size,
            polarisation: polarisation != 0,
            userflags: userflags != 0,
            universal_pdgcode: (pdg != 0).then_some(pdg as i32),
            universal_weight,
            blob_keys,
        };

        Ok(Self {
            input,
            endian,
            remaining: info.particle_count,
            info,
            record: vec![0_u8; expected_size],
        })
    }

    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn read_particle(&mut self) -> ContainerResult<Option<McplParticle>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        self.input.read_exact(&mut self.record)?;
        let mut cursor = self.record.as_slice();
        let precision = self.info.header.precision;

        if self.info.polarisation {
            for _ in 0..3 {
                take_float(&mut cursor, precision, self.endian)?;
            }
        }
        let mut fields = [0.0_f64; 6];
        for field in &mut fields {
            *field = take_float(&mut cursor, precision, self.endian)?;
        }
        let time = take_float(&mut cursor, precision, self.endian)?;
        let weight = match self.info.universal_weight {
            Some(weight) => weight,
            None => take_float(&mut cursor, precision, self.endian)?,
        };
        let pdgcode = match self.info.universal_pdgcode {
            Some(pdgcode) => pdgcode,
            None => take_u32(&mut cursor, self.endian)? as i32,
        };

        let (direction, ekin) = unpack_direction_ekin([fields[3], fields[4], fields[5]]);
        self.remaining -= 1;
        Ok(Some(McplParticle {
            position: [fields[0], fields[1], fields[2]],
            direction,
            ekin,
            time,
            weight,
            pdgcode,
        }))
    }
}

/// Reads a whole container into memory.
pub fn read_container(path: &Path) -> ContainerResult<(ContainerInfo, Vec<McplParticle>)> {
    let mut reader = McplReader::open(path)?;
    let mut particles = Vec::new();
    while let Some(particle) = reader.read_particle()? {
        particles.push(particle);
    }
    Ok((reader.info().clone(), particles))
}

fn read_array<const N: usize>(input: &mut dyn Read) -> ContainerResult<[u8; N]> {
    let mut bytes = [0_u8; N];
    input.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_u32(input: &mut dyn Read, endian: Endian) -> ContainerResult<u32> {
    let bytes = read_array::<4>(input)?;
    Ok(match endian {
        Endian::Little => u32::from_le_bytes(bytes),
        Endian::Big => u32::from_be_bytes(bytes),
    })
}

fn read_u64(input: &mut dyn Read, endian: Endian) -> ContainerResult<u64> {
    let bytes = read_array::<8>(input)?;
    Ok(match endian {
        Endian::Little => u64::from_le_bytes(bytes),
        Endian::Big => u64::from_be_bytes(bytes),
    })
}

fn expected_particle_size(
    precision: FloatPrecision,
    polarisation: bool,
    universal_weight: bool,
    universal_pdgcode: bool,
    userflags: bool,
) -> usize {
    let mut floats = 7;
    if polarisation {
        floats += 3;
    }
    if !universal_weight {
        floats += 1;
    }
    let mut size = floats * precision.size();
    if !universal_pdgcode {
        size += std::mem::size_of::<i32>();
    }
    if userflags {
        size += std::mem::size_of::<u32>();
    }
    size
}

/// Length-prefixed string; the prefix only bounds the read, it never sizes an
/// allocation up front.
fn read_string(input: &mut dyn Read, endian: Endian) -> ContainerResult<String> {
    let length = u64::from(read_u32(input, endian)?);
    let mut bytes = Vec::new();
    (&mut *input).take(length).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != length {
        return Err(ContainerError::MalformedHeader(format!(
            "header string truncated after {} of {} bytes",
            bytes.len(),
            length
        )));
    }
    String::from_utf8(bytes)
        .map_err(|_| ContainerError::MalformedHeader("header string is not UTF-8".to_string()))
}

fn take_u32(cursor: &mut &[u8], endian: Endian) -> ContainerResult<u32> {
    read_u32(cursor, endian)
}

fn take_float(cursor: &mut &[u8], precision: FloatPrecision, endian: Endian) -> ContainerResult<f64> {
    match precision {
        FloatPrecision::Single => Ok(f64::from(f32::from_bits(read_u32(cursor, endian)?))),
        FloatPrecision::Double => Ok(f64::from_bits(read_u64(cursor, endian)?)),
    }
}
