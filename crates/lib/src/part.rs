//! Part context and plugin properties.
//!
//! A part is one unit of a multi-part build. The host hands each plugin an
//! immutable [`PartInfo`] describing where the part builds and where its
//! artifacts must end up, plus the poetry properties declared for the part.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{REQUIREMENTS_FILE, VENV_DIR};

/// Errors that can occur while loading a part file.
#[derive(Debug, Error)]
pub enum PartError {
  #[error("failed to read part file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse part file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Immutable directories of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartInfo {
  pub name: String,
  pub build_dir: PathBuf,
  pub install_dir: PathBuf,
}

impl PartInfo {
  pub fn new(name: &str, build_dir: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
    Self {
      name: name.to_string(),
      build_dir: build_dir.into(),
      install_dir: install_dir.into(),
    }
  }

  /// Path of the requirements file poetry exports into the build tree.
  pub fn requirements_path(&self) -> PathBuf {
    self.build_dir.join(REQUIREMENTS_FILE)
  }

  /// Venv location used by charms, nested inside the install tree.
  pub fn charm_venv_dir(&self) -> PathBuf {
    self.install_dir.join(VENV_DIR)
  }

  /// Resolve relative directories against the current working directory.
  ///
  /// Step scripts run inside the build directory, so every path baked into
  /// a command must be absolute.
  pub fn absolute(&self) -> std::io::Result<Self> {
    Ok(Self {
      name: self.name.clone(),
      build_dir: std::path::absolute(&self.build_dir)?,
      install_dir: std::path::absolute(&self.install_dir)?,
    })
  }

  pub fn is_absolute(&self) -> bool {
    self.build_dir.is_absolute() && self.install_dir.is_absolute()
  }
}

/// Properties of the poetry plugin, as declared on the part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PoetryOptions {
  /// Optional dependency groups to include in the export (`poetry-with`).
  #[serde(rename = "poetry-with")]
  pub with_groups: BTreeSet<String>,

  /// Extra arguments appended to `poetry export`.
  #[serde(rename = "poetry-export-extra-args")]
  pub export_extra_args: Vec<String>,

  /// Extra arguments passed to `pip install`.
  #[serde(rename = "poetry-pip-extra-args")]
  pub pip_extra_args: Vec<String>,
}

/// On-disk description of a part: its directories and poetry properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartConfig {
  #[serde(flatten)]
  pub info: PartInfo,

  #[serde(flatten)]
  pub options: PoetryOptions,
}

impl PartConfig {
  /// Load a part description from a JSON file.
  pub fn load(path: &Path) -> Result<Self, PartError> {
    let content = std::fs::read_to_string(path).map_err(|source| PartError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content).map_err(|source| PartError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }
}
