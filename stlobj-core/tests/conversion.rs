//! End-to-end conversions through the public API.

use std::io::{Cursor, Write};

use approx::assert_abs_diff_eq;
use stlobj_core::{
    open_stl, write_ascii_stl, write_obj, AsciiStlReader, BinaryStlReader, Facet, FacetStream,
    StlError, StlFormat, StlReader, Transform, Vector3,
};
use tempfile::NamedTempFile;

fn binary_stl(facets: &[[[f32; 3]; 4]]) -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
    for facet in facets {
        for v in facet {
            for c in v {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&[0, 0]);
    }
    data
}

fn unit_triangle() -> Vec<u8> {
    binary_stl(&[[[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]])
}

fn scratch_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".stl").unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

fn obj_from(data: Vec<u8>, offset: usize) -> (String, usize) {
    let reader = StlReader::new(Cursor::new(data)).unwrap();
    let mut out = Vec::new();
    let next = write_obj(&mut out, reader, None, offset).unwrap();
    (String::from_utf8(out).unwrap(), next)
}

#[test]
fn binary_triangle_to_obj() {
    let (obj, next) = obj_from(unit_triangle(), 0);
    assert_eq!(next, 3);
    assert_eq!(
        obj,
        "g default\n\
         v 0.000000 0.000000 0.000000\n\
         v 1.000000 0.000000 0.000000\n\
         v 0.000000 1.000000 0.000000\n\
         s 1\n\
         g default\n\
         f 1 2 3\n"
    );
}

#[test]
fn binary_triangle_to_obj_with_offset() {
    let (obj, next) = obj_from(unit_triangle(), 3);
    assert_eq!(next, 6);
    assert!(obj.ends_with("f 4 5 6\n"));
}

#[test]
fn obj_indexing_law() {
    let facets: Vec<[[f32; 3]; 4]> = (0..5)
        .map(|i| {
            let z = i as f32;
            [[0.0, 0.0, 1.0], [0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z]]
        })
        .collect();
    let k = 7;
    let (obj, next) = obj_from(binary_stl(&facets), k);

    let vertex_lines = obj.lines().filter(|l| l.starts_with("v ")).count();
    let face_lines: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
    assert_eq!(vertex_lines, 15);
    assert_eq!(face_lines.len(), 5);
    for (j, line) in face_lines.iter().enumerate() {
        let expected = format!("f {} {} {}", k + 3 * j + 1, k + 3 * j + 2, k + 3 * j + 3);
        assert_eq!(*line, expected);
    }
    assert_eq!(next, k + 15);
}

#[test]
fn chained_meshes_share_one_index_space() {
    let mut out = Vec::new();
    let mut offset = 0;
    for name in ["a", "b", "c"] {
        let reader = StlReader::new(Cursor::new(unit_triangle())).unwrap();
        offset = write_obj(&mut out, reader, Some(name), offset).unwrap();
    }
    let obj = String::from_utf8(out).unwrap();
    assert_eq!(offset, 9);
    assert!(obj.contains("g c\nf 7 8 9\n"));
}

#[test]
fn ascii_single_facet() {
    let text = "solid test\n\
                facet normal 0.5 0.25 -1\n\
                outer loop\n\
                vertex 1 2 3\n\
                vertex 4 5 6\n\
                vertex 7 8 9.5\n\
                endloop\n\
                endfacet\n\
                endsolid test\n";
    let facets: Vec<Facet> = AsciiStlReader::new(Cursor::new(text.as_bytes()))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        facets,
        vec![Facet::new(
            Vector3::new(0.5, 0.25, -1.0),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.5),
        )]
    );
}

#[test]
fn ascii_missing_endloop() {
    let text = "solid test\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendfacet\nendsolid test\n";
    let mut reader = AsciiStlReader::new(Cursor::new(text.as_bytes())).unwrap();
    assert!(matches!(reader.next(), Some(Err(StlError::Parse { .. }))));
    assert!(reader.next().is_none());
}

#[test]
fn binary_round_trip_through_ascii() {
    let source = [
        [[0.0, 0.0, 1.0], [0.1, 0.2, 0.3], [1.123456, -2.5, 3.75], [1e3, -1e-3, 0.333333]],
        [[0.6, 0.8, 0.0], [-7.25, 8.5, 9.0], [0.0, 0.0, 0.0], [12.0, 13.5, -14.0]],
    ];
    let decoded: Vec<Facet> = BinaryStlReader::new(Cursor::new(binary_stl(&source)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let mut ascii = Vec::new();
    let reader = BinaryStlReader::new(Cursor::new(binary_stl(&source))).unwrap();
    write_ascii_stl(&mut ascii, reader, Some("round")).unwrap();

    let reparsed: Vec<Facet> = AsciiStlReader::new(Cursor::new(ascii))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(decoded.len(), reparsed.len());
    for (a, b) in decoded.iter().zip(&reparsed) {
        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_abs_diff_eq!(va.x, vb.x, epsilon = 1e-6);
            assert_abs_diff_eq!(va.y, vb.y, epsilon = 1e-6);
            assert_abs_diff_eq!(va.z, vb.z, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(a.normal.x, b.normal.x, epsilon = 1e-6);
        assert_abs_diff_eq!(a.normal.y, b.normal.y, epsilon = 1e-6);
        assert_abs_diff_eq!(a.normal.z, b.normal.z, epsilon = 1e-6);
    }
}

#[test]
fn truncated_binary_is_reported_not_shortened() {
    let mut data = unit_triangle();
    data[80..84].copy_from_slice(&3u32.to_le_bytes());

    // Streaming decoder notices mid-pass.
    let results: Vec<_> = BinaryStlReader::new(Cursor::new(data.clone())).unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(StlError::Truncated { declared: 3, available: 1 })));

    // Opening a file notices before any facet is produced.
    let file = scratch_file(&data);
    assert!(matches!(
        open_stl(file.path()).err(),
        Some(StlError::Truncated { declared: 3, available: 1 })
    ));
}

#[test]
fn scale_after_translate() {
    let t = Transform::scaling(2.0, 2.0, 2.0) * Transform::translation(1.0, 0.0, 0.0);
    assert_eq!(t.apply(Vector3::ZERO), Vector3::new(2.0, 0.0, 0.0));
}

#[test]
fn transformed_conversion_from_file() {
    let file = scratch_file(&unit_triangle());
    let reader = open_stl(file.path()).unwrap();
    assert_eq!(reader.format(), StlFormat::Binary);

    let stream = FacetStream::new(reader, Some(Transform::scaling(2.0, 2.0, 2.0)));
    let mut out = Vec::new();
    write_obj(&mut out, stream, Some("scaled"), 0).unwrap();
    let obj = String::from_utf8(out).unwrap();
    assert!(obj.contains("v 2.000000 0.000000 0.000000\n"));
    assert!(obj.contains("v 0.000000 2.000000 0.000000\n"));
    assert!(obj.contains("g scaled\nf 1 2 3\n"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.stl");
    assert!(matches!(open_stl(path).err(), Some(StlError::Io(_))));
}
