//! Conversion settings: TOML file defaults overridden by command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nalgebra::Vector3;
use serde::Deserialize;
use stlobj_core::Transform;

use crate::cli::{Cli, OutputFormat};
use crate::compose::{RotationState, TransformParams};

/// Contents of a `--config` file.
///
/// ```toml
/// name = "bracket"
/// format = "obj"
///
/// [transform]
/// scale = [0.5, 0.5, 0.5]
/// rotate = [45.0, 0.0, 36.0]
/// translate = [-2.0, 1.0, 2.0]
/// ```
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub name: Option<String>,
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub transform: TransformConfig,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    pub scale: Option<[f64; 3]>,
    /// Degrees about x, y, z.
    pub rotate: Option<[f64; 3]>,
    pub translate: Option<[f64; 3]>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

impl TransformConfig {
    /// Flags win over file values, component-wise per option.
    fn overridden_by(self, other: TransformConfig) -> Self {
        Self {
            scale: other.scale.or(self.scale),
            rotate: other.rotate.or(self.rotate),
            translate: other.translate.or(self.translate),
        }
    }

    /// `None` when no option was given, so vertices pass through untouched.
    pub fn to_transform(self) -> Option<Transform> {
        if self == Self::default() {
            return None;
        }
        let mut params = TransformParams::default();
        if let Some(scale) = self.scale {
            params.scale = Vector3::from(scale);
        }
        if let Some(rotate) = self.rotate {
            params.rotation = RotationState::from_degrees(rotate);
        }
        if let Some(translate) = self.translate {
            params.translation = Vector3::from(translate);
        }
        Some(params.to_transform())
    }
}

/// Everything one batch run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub name: Option<String>,
    pub transform: Option<Transform>,
    pub merge: Option<PathBuf>,
    pub keep_going: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let flags = TransformConfig {
            scale: cli.scale,
            rotate: cli.rotate,
            translate: cli.translate,
        };
        let format = cli.format.or(file.format).unwrap_or_default();

        if cli.merge.is_some() && format != OutputFormat::Obj {
            bail!("--merge writes a single OBJ document and cannot be combined with {:?} output", format);
        }

        Ok(Self {
            output_dir: cli.output.clone(),
            format,
            name: cli.name.clone().or(file.name),
            transform: file.transform.overridden_by(flags).to_transform(),
            merge: cli.merge.clone(),
            keep_going: cli.keep_going,
        })
    }
}
