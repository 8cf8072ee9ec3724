//! Batch conversion: detect, decode, transform, encode, one file at a time.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use stlobj_core::{
    open_stl, write_ascii_stl, write_binary_stl, write_obj, FacetSource, FacetStream,
};

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::walk::output_path;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct Summary {
    /// `(input, output)` pairs written successfully.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(PathBuf, anyhow::Error)>,
    /// The batch stopped at the first failure; later inputs were not tried.
    pub aborted: bool,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every input according to `settings`.
///
/// A failed conversion's partial output is deleted. Without `keep_going` the
/// batch stops at the first failure and the summary is marked aborted.
/// Two inputs mapping to the same output path is a failure for the second.
pub fn run(settings: &Settings, inputs: &[PathBuf]) -> Result<Summary> {
    if let Some(merged) = &settings.merge {
        return merge(settings, inputs, merged);
    }

    let mut summary = Summary::default();
    let mut claimed = HashSet::new();
    for input in inputs {
        let output = output_path(&settings.output_dir, input, settings.format.extension());
        let result = if claimed.insert(output.clone()) {
            convert_file(settings, input, &output)
        } else {
            Err(anyhow::anyhow!(
                "{} maps to {}, already written by an earlier input",
                input.display(),
                output.display()
            ))
        };

        match result {
            Ok(facets) => {
                info!("{} -> {} ({} facets)", input.display(), output.display(), facets);
                summary.converted.push((input.clone(), output));
            }
            Err(e) => {
                error!("{:#}", e);
                summary.failed.push((input.clone(), e));
                if !settings.keep_going {
                    summary.aborted = true;
                    break;
                }
            }
        }
    }
    Ok(summary)
}

/// Convert one file and return the number of facets written.
///
/// Refuses to write over `input` itself.
pub fn convert_file(settings: &Settings, input: &Path, output: &Path) -> Result<usize> {
    if same_file(input, output) {
        bail!("Refusing to overwrite input {} with its own conversion", input.display());
    }
    let reader = open_stl(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let stream = FacetStream::new(reader, settings.transform);

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let result = encode(settings, stream, BufWriter::new(file))
        .with_context(|| format!("Failed to convert {}", input.display()));
    if result.is_err() {
        discard(output);
    }
    result
}

fn encode<S: FacetSource>(settings: &Settings, stream: S, mut out: BufWriter<File>) -> Result<usize> {
    let name = settings.name.as_deref();
    let facets = match settings.format {
        OutputFormat::Obj => write_obj(&mut out, stream, name, 0)? / 3,
        OutputFormat::AsciiStl => write_ascii_stl(&mut out, stream, name)? as usize,
        OutputFormat::BinaryStl => write_binary_stl(&mut out, stream, name)? as usize,
    };
    out.flush()?;
    Ok(facets)
}

/// Write every input into one OBJ document, chaining vertex offsets.
///
/// A failure leaves the document unusable, so it is deleted and the batch
/// ends regardless of `keep_going`.
fn merge(settings: &Settings, inputs: &[PathBuf], merged: &Path) -> Result<Summary> {
    if let Some(input) = inputs.iter().find(|input| same_file(input, merged)) {
        bail!("Refusing to overwrite input {} with the merged document", input.display());
    }
    let result = write_merged(settings, inputs, merged);
    if result.is_err() {
        discard(merged);
    }
    result
}

fn write_merged(settings: &Settings, inputs: &[PathBuf], merged: &Path) -> Result<Summary> {
    if let Some(dir) = merged.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    let file = File::create(merged)
        .with_context(|| format!("Failed to create {}", merged.display()))?;
    let mut out = BufWriter::new(file);

    let mut summary = Summary::default();
    let mut offset = 0;
    for input in inputs {
        let reader =
            open_stl(input).with_context(|| format!("Failed to open {}", input.display()))?;
        let stream = FacetStream::new(reader, settings.transform);
        let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned());
        let name = settings.name.as_deref().or(stem.as_deref());

        let next = write_obj(&mut out, stream, name, offset)
            .with_context(|| format!("Failed to convert {}", input.display()))?;
        info!(
            "{} -> {} ({} facets)",
            input.display(),
            merged.display(),
            (next - offset) / 3
        );
        offset = next;
        summary.converted.push((input.clone(), merged.to_path_buf()));
    }

    out.flush()
        .with_context(|| format!("Failed to write {}", merged.display()))?;
    Ok(summary)
}

/// True when both paths exist and resolve to the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn discard(output: &Path) {
    if output.exists() {
        if let Err(e) = fs::remove_file(output) {
            warn!("Failed to remove partial output {}: {}", output.display(), e);
        }
    }
}
