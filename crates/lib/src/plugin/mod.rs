//! Part plugins.
//!
//! A plugin turns a part's immutable context into the environment, build
//! packages, and shell commands the host runs for each lifecycle step:
//! - [`python`]: commands shared by every Python plugin (venv, shebangs, symlinks)
//! - [`poetry`]: the generic poetry plugin
//! - [`charm`]: charm packaging conventions layered over the poetry plugin

pub mod charm;
pub mod poetry;
pub mod python;

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::lookup::LookupError;

pub use charm::CharmPoetryPlugin;
pub use poetry::PoetryPlugin;

/// Errors raised while generating a plugin's commands.
#[derive(Debug, Error)]
pub enum PluginError {
  /// A prerequisite check on the build environment failed unexpectedly.
  #[error("environment validation failed for {tool}: {reason}")]
  EnvironmentValidation { tool: String, reason: String },
}

impl From<LookupError> for PluginError {
  fn from(e: LookupError) -> Self {
    PluginError::EnvironmentValidation {
      tool: e.tool,
      reason: e.reason,
    }
  }
}

/// What the host asks of a plugin at each lifecycle point.
pub trait Plugin {
  /// Environment exported before every command of the build step.
  fn build_environment(&self) -> BTreeMap<String, String>;

  /// System packages that must be installed on the build host.
  fn build_packages(&self) -> Result<BTreeSet<String>, PluginError>;

  /// Commands run in the pull step.
  fn pull_commands(&self) -> Result<Vec<String>, PluginError>;

  /// Commands run in the build step.
  fn build_commands(&self) -> Vec<String>;
}
