//! STL decoding and encoding.
//!
//! Both encodings decode into a [`FacetSource`]: a lazy, forward-only,
//! single-pass sequence of facets. [`StlReader`] picks the decoder once,
//! from [`detect_format`], and dispatches to it on every pull.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::geometry::Facet;

pub mod ascii;
pub mod binary;
pub mod detect;

pub use ascii::{write_ascii_stl, AsciiStlReader};
pub use binary::{write_binary_stl, BinaryStlReader};
pub use detect::{detect_format, StlFormat};

/// Group or solid name used when neither the caller nor the mesh supplies one.
pub const DEFAULT_NAME: &str = "default";

/// A lazy, finite sequence of facets, consumed at most once.
///
/// After yielding an `Err` a source yields nothing more, so a partially
/// decoded facet can never follow an error.
pub trait FacetSource: Iterator<Item = Result<Facet>> {
    /// Name the mesh carries itself, if any.
    fn name(&self) -> Option<&str>;
}

/// Caller's name, else the mesh's own, else [`DEFAULT_NAME`].
pub(crate) fn resolve_name<'a, S: FacetSource>(name: Option<&'a str>, source: &'a S) -> &'a str {
    name.or_else(|| source.name()).unwrap_or(DEFAULT_NAME)
}

/// A reader for either encoding, chosen once at construction.
pub enum StlReader<R> {
    Ascii(AsciiStlReader<R>),
    Binary(BinaryStlReader<R>),
}

impl<R: BufRead + Seek> StlReader<R> {
    /// Detect the encoding of `reader` and bind the matching decoder to it.
    ///
    /// For binary input the declared facet count is checked against the
    /// stream length before any facet is produced.
    pub fn new(mut reader: R) -> Result<Self> {
        match detect_format(&mut reader)? {
            StlFormat::Ascii => Ok(Self::Ascii(AsciiStlReader::new(reader)?)),
            StlFormat::Binary => {
                let len = reader.seek(SeekFrom::End(0))?;
                reader.rewind()?;
                let binary = BinaryStlReader::new(reader)?;
                binary.check_length(len)?;
                Ok(Self::Binary(binary))
            }
        }
    }
}

impl<R> StlReader<R> {
    pub fn format(&self) -> StlFormat {
        match self {
            Self::Ascii(_) => StlFormat::Ascii,
            Self::Binary(_) => StlFormat::Binary,
        }
    }
}

impl<R: BufRead> Iterator for StlReader<R> {
    type Item = Result<Facet>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Ascii(reader) => reader.next(),
            Self::Binary(reader) => reader.next(),
        }
    }
}

impl<R: BufRead> FacetSource for StlReader<R> {
    fn name(&self) -> Option<&str> {
        match self {
            Self::Ascii(reader) => reader.name(),
            Self::Binary(reader) => reader.name(),
        }
    }
}

/// Open an STL file and bind the matching decoder to it.
///
/// The returned reader owns the file handle; dropping it closes the file,
/// whether iteration finished, failed, or was abandoned.
pub fn open_stl(path: impl AsRef<Path>) -> Result<StlReader<BufReader<File>>> {
    let path = path.as_ref();
    let reader = StlReader::new(BufReader::new(File::open(path)?))?;
    debug!("opened {} as {:?} STL", path.display(), reader.format());
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn binary_triangle(count: u32) -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&count.to_le_bytes());
        for c in [0.0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&c.to_le_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        data
    }

    #[test]
    fn dispatches_to_ascii() {
        let text = "solid cube\nendsolid cube\n";
        let reader = StlReader::new(Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(reader.format(), StlFormat::Ascii);
        assert_eq!(reader.name(), Some("cube"));
    }

    #[test]
    fn dispatches_to_binary() {
        let reader = StlReader::new(Cursor::new(binary_triangle(1))).unwrap();
        assert_eq!(reader.format(), StlFormat::Binary);
        assert_eq!(reader.name(), None);
        assert_eq!(reader.count(), 1);
    }

    #[test]
    fn truncation_is_caught_before_the_first_facet() {
        let err = StlReader::new(Cursor::new(binary_triangle(4))).err().unwrap();
        assert!(matches!(
            err,
            crate::StlError::Truncated { declared: 4, available: 1 }
        ));
    }

    #[test]
    fn name_resolution_order() {
        let reader = StlReader::new(Cursor::new(b"solid own\nendsolid\n".as_slice())).unwrap();
        assert_eq!(resolve_name(Some("given"), &reader), "given");
        assert_eq!(resolve_name(None, &reader), "own");

        let reader = StlReader::new(Cursor::new(binary_triangle(1))).unwrap();
        assert_eq!(resolve_name(None, &reader), DEFAULT_NAME);
    }
}
