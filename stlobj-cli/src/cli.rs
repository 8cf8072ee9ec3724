//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Output encodings the converter can write.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Wavefront OBJ
    #[default]
    Obj,
    /// ASCII STL
    AsciiStl,
    /// Binary STL
    BinaryStl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Obj => "obj",
            OutputFormat::AsciiStl | OutputFormat::BinaryStl => "stl",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stlobj")]
#[command(about = "Convert STL meshes to OBJ or STL, optionally transforming every vertex", long_about = None)]
pub struct Cli {
    /// STL files, or directories searched recursively for *.stl
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Root directory for converted files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Output encoding
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Group / solid name written to every output
    #[arg(long)]
    pub name: Option<String>,

    /// Scale factors, e.g. `0.5,0.5,0.5`
    #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
    pub scale: Option<[f64; 3]>,

    /// Rotation about x, y, z in degrees, applied x first
    #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
    pub rotate: Option<[f64; 3]>,

    /// Translation, e.g. `-2,1,2`
    #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
    pub translate: Option<[f64; 3]>,

    /// Write every input into this single OBJ document
    #[arg(long)]
    pub merge: Option<PathBuf>,

    /// Continue with the remaining files when one fails
    #[arg(long)]
    pub keep_going: bool,

    /// TOML file with defaults for name, format and transform
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse `x,y,z` into three floats.
pub fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated numbers, got {:?}", s));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid number {:?}: {}", part, e))?;
    }
    Ok(out)
}
