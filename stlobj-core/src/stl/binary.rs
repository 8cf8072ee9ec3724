/// Binary STL: 80-byte header, little-endian facet count, 50-byte records
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

use log::debug;

use super::FacetSource;
use crate::error::{Result, StlError};
use crate::geometry::{Facet, Vector3};

/// Header bytes plus the 4-byte facet count.
pub const HEADER_LEN: usize = 84;
/// Normal, three vertices, and the 2-byte attribute field.
pub const FACET_RECORD_LEN: usize = 50;

/// Total byte length of a binary STL holding `count` facets.
pub fn binary_len(count: u32) -> u64 {
    HEADER_LEN as u64 + FACET_RECORD_LEN as u64 * count as u64
}

/// Streams facets out of a binary STL, one 50-byte record per pull.
pub struct BinaryStlReader<R> {
    reader: R,
    declared: u32,
    read: u32,
    done: bool,
}

impl<R: Read> BinaryStlReader<R> {
    /// Consume the header and facet count; no facet is read yet.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => {
                StlError::detection("input is shorter than the 84-byte binary STL header")
            }
            _ => StlError::Io(e),
        })?;

        let declared = u32::from_le_bytes([header[80], header[81], header[82], header[83]]);
        debug!("binary STL declares {} facets", declared);

        Ok(Self {
            reader,
            declared,
            read: 0,
            done: false,
        })
    }

    /// Facet count from the header.
    pub fn declared_count(&self) -> u32 {
        self.declared
    }

    /// Fail up front if a stream of `total_len` bytes cannot hold every declared facet.
    pub fn check_length(&self, total_len: u64) -> Result<()> {
        if total_len >= binary_len(self.declared) {
            return Ok(());
        }
        let available = total_len.saturating_sub(HEADER_LEN as u64) / FACET_RECORD_LEN as u64;
        Err(StlError::Truncated {
            declared: self.declared,
            available: available as u32,
        })
    }

    fn read_facet(&mut self) -> Result<Facet> {
        let mut record = [0u8; FACET_RECORD_LEN];
        self.reader.read_exact(&mut record).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => StlError::Truncated {
                declared: self.declared,
                available: self.read,
            },
            _ => StlError::Io(e),
        })?;

        // Trailing attribute field (bytes 48..50) is ignored.
        Ok(Facet::new(
            read_vector(&record[0..12]),
            read_vector(&record[12..24]),
            read_vector(&record[24..36]),
            read_vector(&record[36..48]),
        ))
    }
}

fn read_vector(bytes: &[u8]) -> Vector3 {
    let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    Vector3::from([f(0), f(4), f(8)])
}

impl<R: Read> Iterator for BinaryStlReader<R> {
    type Item = Result<Facet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.read == self.declared {
            return None;
        }
        match self.read_facet() {
            Ok(facet) => {
                self.read += 1;
                Some(Ok(facet))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, Some((self.declared - self.read) as usize))
    }
}

impl<R: Read> FacetSource for BinaryStlReader<R> {
    /// The binary header carries no reliable name.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Write a facet stream as binary STL and return the number of facets written.
///
/// The facet count is unknown until the source is drained, so a placeholder
/// is written and patched afterwards; the sink must be seekable. The header
/// holds `name`, truncated to 80 bytes and zero padded.
pub fn write_binary_stl<W, S>(out: &mut W, mut source: S, name: Option<&str>) -> Result<u32>
where
    W: Write + Seek,
    S: FacetSource,
{
    let name = super::resolve_name(name, &source).to_owned();
    let start = out.stream_position()?;

    let mut header = [0u8; HEADER_LEN - 4];
    let copy_n = name.len().min(header.len());
    header[..copy_n].copy_from_slice(&name.as_bytes()[..copy_n]);
    out.write_all(&header)?;
    out.write_all(&0u32.to_le_bytes())?;

    let mut count: u32 = 0;
    for facet in source.by_ref() {
        let facet = facet?;
        write_vector(out, facet.normal)?;
        for vertex in facet.vertices {
            write_vector(out, vertex)?;
        }
        out.write_all(&0u16.to_le_bytes())?;
        count = count.checked_add(1).ok_or_else(|| {
            StlError::Io(io::Error::new(
                ErrorKind::InvalidInput,
                "binary STL cannot hold more than u32::MAX facets",
            ))
        })?;
    }

    let end = out.stream_position()?;
    out.seek(SeekFrom::Start(start + (HEADER_LEN - 4) as u64))?;
    out.write_all(&count.to_le_bytes())?;
    out.seek(SeekFrom::Start(end))?;

    debug!("wrote {} facets as binary STL", count);
    Ok(count)
}

fn write_vector<W: Write>(out: &mut W, v: Vector3) -> io::Result<()> {
    for component in v.to_f32_array() {
        out.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}
