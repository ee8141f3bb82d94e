//! Running a rendered step script.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::types::{ExecuteError, Step};

/// Run `script` for `step` with the caller's environment, in `work_dir`.
///
/// The environment is inherited rather than cleared: plugin environments
/// refer to `$HOME` and `$PATH`, which must expand against the host.
///
/// # Returns
///
/// The stdout of the script on success (trimmed).
pub async fn execute_script(
  step: Step,
  script: &str,
  work_dir: &Path,
  shell: Option<&str>,
) -> Result<String, ExecuteError> {
  info!(%step, work_dir = %work_dir.display(), "running step");

  let (shell_cmd, shell_args) = get_shell(shell);

  debug!(shell = %shell_cmd, "spawning process");

  let output = Command::new(&shell_cmd)
    .args(&shell_args)
    .arg(script)
    .current_dir(work_dir)
    .output()
    .await?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "step stdout");
    }

    let tail = stderr_tail(&stderr);
    if !tail.is_empty() {
      warn!(%step, stderr = %tail, "step failed");
    }

    return Err(ExecuteError::CmdFailed {
      step,
      code: output.status.code(),
      stderr: tail,
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "step output");
  }

  Ok(stdout)
}

/// Lines of stderr kept in a failure report.
const STDERR_TAIL_LINES: usize = 20;

/// The last few non-empty lines of a failed step's stderr.
fn stderr_tail(stderr: &str) -> String {
  let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
  let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
  lines[start..].join("\n")
}

/// Shell and arguments used to run a script.
///
/// Scripts are POSIX, so the default is always `/bin/sh` rather than the
/// user's login shell, which may source profile files.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  let shell = override_shell.unwrap_or("/bin/sh");
  (shell.to_string(), vec!["-c".to_string()])
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[tokio::test]
  async fn execute_simple_script() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_script(Step::Build, "echo hello", temp_dir.path(), None)
      .await
      .unwrap();

    assert_eq!(result, "hello");
  }

  #[tokio::test]
  async fn execute_inherits_environment() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_script(Step::Build, "test -n \"$PATH\" && echo ok", temp_dir.path(), None)
      .await
      .unwrap();

    assert_eq!(result, "ok");
  }

  #[tokio::test]
  async fn execute_runs_in_work_dir() {
    let temp_dir = TempDir::new().unwrap();

    execute_script(Step::Build, "touch cwd_marker", temp_dir.path(), None)
      .await
      .unwrap();

    assert!(temp_dir.path().join("cwd_marker").exists());
  }

  #[tokio::test]
  async fn execute_failure_reports_step_and_code() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_script(Step::Pull, "exit 3", temp_dir.path(), None).await;

    assert!(matches!(
      result,
      Err(ExecuteError::CmdFailed {
        step: Step::Pull,
        code: Some(3),
        ..
      })
    ));
  }

  #[tokio::test]
  async fn execute_failure_carries_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let script = "echo noise >&2\necho 'foo 1.0 has requirement bar>=2, but you have bar 1.0.' >&2\nexit 1";

    let err = execute_script(Step::Build, script, temp_dir.path(), None)
      .await
      .unwrap_err();

    match &err {
      ExecuteError::CmdFailed { stderr, .. } => {
        assert_eq!(stderr, "noise\nfoo 1.0 has requirement bar>=2, but you have bar 1.0.");
      }
      other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("but you have bar 1.0"));
  }

  #[test]
  fn stderr_tail_keeps_last_lines() {
    let stderr: String = (1..=30).map(|i| format!("line {i}\n")).collect();

    let tail = stderr_tail(&stderr);

    assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
    assert!(tail.starts_with("line 11"));
    assert!(tail.ends_with("line 30"));
  }

  #[test]
  fn stderr_tail_skips_blank_lines() {
    assert_eq!(stderr_tail("\n  \nboom\n\n"), "boom");
    assert_eq!(stderr_tail(""), "");
  }

  #[test]
  fn get_shell_default() {
    let (shell, args) = get_shell(None);
    assert_eq!(shell, "/bin/sh");
    assert_eq!(args, vec!["-c"]);
  }

  #[test]
  fn get_shell_with_override() {
    let (shell, args) = get_shell(Some("/usr/bin/bash"));
    assert_eq!(shell, "/usr/bin/bash");
    assert_eq!(args, vec!["-c"]);
  }
}
