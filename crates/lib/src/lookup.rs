//! Search-path lookup for prerequisite tools.
//!
//! Plugins ask whether a tool such as `poetry` is already installed before
//! deciding which commands to emit. The lookup is injected so tests can
//! substitute a deterministic answer for the real `PATH`.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// The lookup itself failed, as opposed to the tool being absent.
#[derive(Debug, Error)]
#[error("failed to look up {tool} on the search path: {reason}")]
pub struct LookupError {
  pub tool: String,
  pub reason: String,
}

/// Finds executables on the search path.
///
/// Returns `Ok(None)` when the tool is simply not installed.
pub trait PathLookup {
  fn find(&self, tool: &str) -> Result<Option<PathBuf>, LookupError>;

  fn has(&self, tool: &str) -> Result<bool, LookupError> {
    Ok(self.find(tool)?.is_some())
  }
}

impl<F> PathLookup for F
where
  F: Fn(&str) -> Result<Option<PathBuf>, LookupError>,
{
  fn find(&self, tool: &str) -> Result<Option<PathBuf>, LookupError> {
    self(tool)
  }
}

/// Looks tools up on the real `PATH` of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

impl PathLookup for SystemLookup {
  fn find(&self, tool: &str) -> Result<Option<PathBuf>, LookupError> {
    match which::which(tool) {
      Ok(path) => {
        debug!(tool, path = %path.display(), "found tool on search path");
        Ok(Some(path))
      }
      Err(which::Error::CannotFindBinaryPath) => {
        debug!(tool, "tool not found on search path");
        Ok(None)
      }
      Err(e) => Err(LookupError {
        tool: tool.to_string(),
        reason: e.to_string(),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closure_lookup_reports_presence() {
    let lookup = |tool: &str| -> Result<Option<PathBuf>, LookupError> {
      Ok((tool == "poetry").then(|| PathBuf::from("/usr/bin/poetry")))
    };

    assert!(lookup.has("poetry").unwrap());
    assert!(!lookup.has("pdm").unwrap());
  }

  #[test]
  fn closure_lookup_propagates_errors() {
    let lookup = |tool: &str| -> Result<Option<PathBuf>, LookupError> {
      Err(LookupError {
        tool: tool.to_string(),
        reason: "permission denied".to_string(),
      })
    };

    let err = lookup.has("poetry").unwrap_err();

    assert_eq!(err.tool, "poetry");
    assert_eq!(
      err.to_string(),
      "failed to look up poetry on the search path: permission denied"
    );
  }

  #[test]
  #[serial_test::serial]
  #[cfg(unix)]
  fn system_lookup_finds_sh() {
    assert!(SystemLookup.has("sh").unwrap());
  }

  #[test]
  #[serial_test::serial]
  fn system_lookup_missing_tool_is_absent() {
    let found = SystemLookup.find("charmpoetry-definitely-not-installed").unwrap();
    assert!(found.is_none());
  }

  #[cfg(unix)]
  fn fake_tool(dir: &std::path::Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  #[test]
  #[serial_test::serial]
  #[cfg(unix)]
  fn system_lookup_follows_path() {
    let temp = tempfile::TempDir::new().unwrap();
    fake_tool(temp.path(), "poetry");

    temp_env::with_var("PATH", Some(temp.path()), || {
      let found = SystemLookup.find("poetry").unwrap();
      assert_eq!(found, Some(temp.path().join("poetry")));
    });
  }

  #[test]
  #[serial_test::serial]
  fn system_lookup_empty_path_dir_is_absent() {
    let temp = tempfile::TempDir::new().unwrap();

    temp_env::with_var("PATH", Some(temp.path()), || {
      assert!(!SystemLookup.has("poetry").unwrap());
    });
  }
}
