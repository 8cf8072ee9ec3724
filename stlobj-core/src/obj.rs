/// Wavefront OBJ writer
use std::io::Write;

use log::debug;

use crate::error::Result;
use crate::stl::{resolve_name, FacetSource};

/// Write a facet stream as OBJ geometry.
///
/// Every facet gets three vertex records of its own; coincident vertices are
/// not shared. Face indices start at `vertex_offset + 1`, so several meshes
/// can be written into one document: pass the value this call returns as the
/// next call's `vertex_offset`.
///
/// Returns `vertex_offset` plus the number of vertices written.
pub fn write_obj<W, S>(
    out: &mut W,
    mut source: S,
    name: Option<&str>,
    vertex_offset: usize,
) -> Result<usize>
where
    W: Write,
    S: FacetSource,
{
    writeln!(out, "g default")?;

    let mut facets = 0usize;
    for facet in source.by_ref() {
        for v in facet?.vertices {
            writeln!(out, "v {}", v)?;
        }
        facets += 1;
    }

    writeln!(out, "s 1")?;
    writeln!(out, "g {}", resolve_name(name, &source))?;
    for k in 0..facets {
        let first = vertex_offset + 3 * k + 1;
        writeln!(out, "f {} {} {}", first, first + 1, first + 2)?;
    }

    debug!("wrote {} facets as OBJ from vertex offset {}", facets, vertex_offset);
    Ok(vertex_offset + 3 * facets)
}
