use crate::core::error::{Error, Result};
use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(path, e))?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

/// Sniffs the gzip FEXTRA subfield to tell block formats apart from plain
/// members. Block formats can be decompressed in parallel; plain gzip cannot.
pub fn detect_gzip_variant(path: &Path) -> Result<GzipVariant> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut header = [0u8; 20];
    let n = file.read(&mut header).map_err(|e| Error::io(path, e))?;
    if n < 14 {
        return Ok(GzipVariant::Standard);
    }
    if header[0] != 0x1f || header[1] != 0x8b {
        return Ok(GzipVariant::Standard);
    }
    if header[3] & 4 == 0 {
        return Ok(GzipVariant::Standard);
    }
    if header[12] == b'B' && header[13] == b'C' {
        return Ok(GzipVariant::Bgzf);
    }
    if header[12] == b'I' && header[13] == b'G' {
        return Ok(GzipVariant::Mgzip);
    }
    Ok(GzipVariant::Standard)
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> Result<Box<dyn Read + Send>> {
    let variant = detect_gzip_variant(path)?;
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf => {
            if threads > 1 {
                Box::new(
                    ParDecompressBuilder::<Bgzf>::new()
                        .num_threads(threads)
                        .unwrap()
                        .from_reader(reader),
                )
            } else {
                Box::new(MultiGzDecoder::new(reader))
            }
        }
        GzipVariant::Mgzip => {
            if threads > 1 {
                Box::new(
                    ParDecompressBuilder::<Mgzip>::new()
                        .num_threads(threads)
                        .unwrap()
                        .from_reader(reader),
                )
            } else {
                Box::new(MultiGzDecoder::new(reader))
            }
        }
        GzipVariant::Standard => Box::new(MultiGzDecoder::new(reader)),
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn write_gz(path: &Path, payload: &[u8]) {
        let file = File::create(path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(payload).unwrap();
        enc.finish().unwrap();
    }

    #[test]
    fn standard_gzip_is_detected_and_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.gz");
        write_gz(&path, b"raw cycle bytes");

        assert_eq!(detect_gzip_variant(&path).unwrap(), GzipVariant::Standard);

        let mut out = Vec::new();
        open_gzip_reader(&path, 1)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"raw cycle bytes");
    }

    #[test]
    fn bgzf_extra_field_is_detected() {
        // Minimal gzip member header carrying the BGZF "BC" FEXTRA subfield.
        let mut header = vec![0x1f, 0x8b, 0x08, 0x04, 0, 0, 0, 0, 0, 0xff];
        header.extend_from_slice(&[6, 0]); // XLEN
        header.extend_from_slice(&[b'B', b'C', 2, 0, 0x1b, 0]);
        header.resize(32, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bgzf");
        std::fs::write(&path, &header).unwrap();

        assert_eq!(detect_gzip_variant(&path).unwrap(), GzipVariant::Bgzf);
    }

    #[test]
    fn short_files_fall_back_to_standard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub");
        std::fs::write(&path, [0x1f, 0x8b]).unwrap();
        assert_eq!(detect_gzip_variant(&path).unwrap(), GzipVariant::Standard);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.gz");
        assert!(matches!(open_gzip_reader(&path, 1), Err(Error::Io { .. })));
    }
}
