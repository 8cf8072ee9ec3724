//! STL encoding detection.
//!
//! The binary header is 80 arbitrary bytes, so a binary file may begin with
//! the text `solid` just like an ASCII one. Sniffing the leading token is a
//! heuristic; the one refinement applied is that a `solid`-prefixed file
//! whose length matches its would-be binary facet count exactly is taken as
//! binary.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use super::binary::{binary_len, HEADER_LEN};
use crate::error::{Result, StlError};

/// The two STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Ascii,
    Binary,
}

/// Detect the encoding of a seekable STL stream.
///
/// The stream is left positioned at its start.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<StlFormat> {
    let len = reader.seek(SeekFrom::End(0))?;
    reader.rewind()?;

    let mut prefix = [0u8; HEADER_LEN];
    let filled = read_prefix(reader, &mut prefix)?;
    reader.rewind()?;

    let format = classify(&prefix[..filled], len)?;
    debug!("detected {:?} STL ({} bytes)", format, len);
    Ok(format)
}

/// Classify from the leading bytes and the total stream length.
pub fn classify(prefix: &[u8], len: u64) -> Result<StlFormat> {
    if starts_with_solid(prefix) {
        if let Some(count) = declared_count(prefix) {
            if binary_len(count) == len {
                debug!("`solid` header but length matches {} binary facets", count);
                return Ok(StlFormat::Binary);
            }
        }
        return Ok(StlFormat::Ascii);
    }

    if len >= HEADER_LEN as u64 {
        Ok(StlFormat::Binary)
    } else {
        Err(StlError::detection(format!(
            "{len} bytes is shorter than a binary STL header and does not start with `solid`"
        )))
    }
}

/// True when the prefix decodes as text whose first token is exactly `solid`.
fn starts_with_solid(prefix: &[u8]) -> bool {
    let text = match std::str::from_utf8(prefix) {
        Ok(text) => text,
        // A multi-byte character cut off by the probe length is still text.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&prefix[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    text.split_ascii_whitespace().next() == Some("solid")
}

fn declared_count(prefix: &[u8]) -> Option<u32> {
    let bytes = prefix.get(HEADER_LEN - 4..HEADER_LEN)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
