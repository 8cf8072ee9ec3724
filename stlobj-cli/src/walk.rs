//! Input discovery and output path building.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

/// True for paths ending in `.stl`, any case.
pub fn is_stl(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
}

/// Expand inputs into a sorted list of STL files.
///
/// Directories are searched recursively and only `*.stl` files are kept.
/// Files named directly are kept whatever their extension.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk_dir(input, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            warn!("Skipping {}: not a file or directory", input.display());
        }
    }
    debug!("collected {} input files", files.len());
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_stl(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// `<root>/<parent dir name>/<file stem without whitespace>.<extension>`.
pub fn output_path(root: &Path, input: &Path, extension: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    if let Some(folder) = input.parent().and_then(Path::file_name) {
        path.push(folder);
    }

    let stem: String = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let stem = if stem.is_empty() { "mesh".to_owned() } else { stem };

    path.push(stem);
    path.set_extension(extension);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stl() {
        assert!(is_stl(Path::new("a/b/part.STL")));
        assert!(is_stl(Path::new("part.stl")));
        assert!(!is_stl(Path::new("part.obj")));
        assert!(!is_stl(Path::new("stl")));
    }

    #[test]
    fn test_output_path_uses_parent_folder() {
        let out = output_path(Path::new("/out"), Path::new("/in/robot/left arm.STL"), "obj");
        assert_eq!(out, PathBuf::from("/out/robot/leftarm.obj"));
    }

    #[test]
    fn test_output_path_without_parent() {
        let out = output_path(Path::new("out"), Path::new("cube.stl"), "stl");
        assert_eq!(out, PathBuf::from("out/cube.stl"));
    }
}
