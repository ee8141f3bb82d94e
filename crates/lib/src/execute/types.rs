//! Types for running lifecycle steps.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin::PluginError;

/// A lifecycle step the runner knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Pull,
  Build,
}

impl Step {
  /// Steps in the order the host runs them.
  pub const ALL: [Step; 2] = [Step::Pull, Step::Build];

  pub fn as_str(&self) -> &'static str {
    match self {
      Step::Pull => "pull",
      Step::Build => "build",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Errors that can occur while running a part.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The plugin could not produce its commands.
  #[error("plugin error: {0}")]
  Plugin(#[from] PluginError),

  /// A step's script exited unsuccessfully.
  #[error("{step} step failed with exit code {code:?}: {stderr}")]
  CmdFailed {
    step: Step,
    code: Option<i32>,
    /// Last lines the script wrote to stderr.
    stderr: String,
  },

  /// Part directories must be absolute; scripts run inside the build dir.
  #[error("part directory is not absolute: {0}")]
  RelativePartDir(PathBuf),

  /// I/O error while preparing or spawning a step.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Options for running a part.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Render the scripts without executing them.
  pub dry_run: bool,

  /// Shell to run scripts with. Defaults to `/bin/sh`.
  pub shell: Option<String>,
}

/// Outcome of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
  pub step: Step,

  /// The script that was (or, in a dry run, would have been) executed.
  pub script: String,

  /// Number of commands in the step, excluding the preamble and exports.
  pub commands: usize,

  /// Trimmed stdout of the step; empty for dry runs.
  pub stdout: String,

  /// Whether the script actually ran.
  pub executed: bool,
}

/// Outcome of running every step of a part.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
  pub part: String,
  pub work_dir: PathBuf,
  pub steps: Vec<StepResult>,
}
