use super::ContainerResult;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn gzipped_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".gz");
    PathBuf::from(raw)
}

/// Compresses `path` into `<path>.gz` and removes the original.
pub fn gzip_file(path: &Path) -> ContainerResult<PathBuf> {
    let target = gzipped_path(path);
    let mut source = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(&target)?), Compression::default());
    let copied = io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.flush()?;
    drop(source);
    fs::remove_file(path)?;

    debug!(
        source = %path.display(),
        target = %target.display(),
        bytes = copied,
        "compressed container"
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{GZIP_MAGIC, gzip_file, gzipped_path};
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::Read;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn gzipped_path_appends_suffix() {
        assert_eq!(
            gzipped_path(Path::new("a/b.mcpl")),
            Path::new("a/b.mcpl.gz")
        );
    }

    #[test]
    fn gzip_roundtrip_preserves_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("payload.mcpl");
        fs::write(&path, b"MCPL003L payload").expect("payload should be written");

        let target = gzip_file(&path).expect("gzip should succeed");
        assert!(!path.exists());

        let compressed = fs::read(&target).expect("gzip output should be readable");
        assert_eq!(compressed[..2], GZIP_MAGIC);

        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .expect("gzip output should decode");
        assert_eq!(decoded, b"MCPL003L payload");
    }
}
