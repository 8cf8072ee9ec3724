//! stlobj core: streaming STL decoding, vertex transforms, and OBJ / STL encoding.
//!
//! A conversion is a pull pipeline:
//! [`open_stl`] picks a decoder, [`FacetStream`] optionally transforms each
//! facet, and a writer ([`write_obj`], [`write_ascii_stl`],
//! [`write_binary_stl`]) drains the stream one facet at a time.

pub mod error;
pub mod geometry;
pub mod obj;
pub mod stl;
pub mod stream;
pub mod transform;

// Re-export commonly used types
pub use error::{Result, StlError};
pub use geometry::{Facet, Vector3};
pub use obj::write_obj;
pub use stl::{
    detect_format, open_stl, write_ascii_stl, write_binary_stl, AsciiStlReader, BinaryStlReader,
    FacetSource, StlFormat, StlReader, DEFAULT_NAME,
};
pub use stream::FacetStream;
pub use transform::Transform;
