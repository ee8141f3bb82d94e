//! Step execution.
//!
//! A minimal host for one part: it asks the plugin for each step's commands,
//! renders them as a script with the plugin's build environment, and runs
//! the scripts in lifecycle order. The first failing step stops the run.

mod cmd;
pub mod types;

use tracing::{debug, info};

use crate::part::PartInfo;
use crate::plugin::{Plugin, PluginError};
use crate::script::render_script;

pub use cmd::execute_script;
pub use types::{ExecuteError, RunOptions, RunResult, Step, StepResult};

/// Commands the plugin produces for `step`.
pub fn step_commands(plugin: &impl Plugin, step: Step) -> Result<Vec<String>, PluginError> {
  let commands = match step {
    Step::Pull => plugin.pull_commands()?,
    Step::Build => plugin.build_commands(),
  };
  debug!(%step, count = commands.len(), "generated step commands");
  Ok(commands)
}

/// Render `step` as a shell script exporting the plugin's build environment.
pub fn step_script(plugin: &impl Plugin, step: Step) -> Result<String, PluginError> {
  let commands = step_commands(plugin, step)?;
  Ok(render_script(&plugin.build_environment(), &commands))
}

/// Run every step of `part` in order.
///
/// Commands for all steps are generated before anything executes, so a
/// plugin error never leaves a half-run part behind. Part directories must be
/// absolute: scripts run inside the build dir, so a relative install dir would
/// resolve against it.
pub async fn run_steps(plugin: &impl Plugin, part: &PartInfo, options: &RunOptions) -> Result<RunResult, ExecuteError> {
  for dir in [&part.build_dir, &part.install_dir] {
    if !dir.is_absolute() {
      return Err(ExecuteError::RelativePartDir(dir.clone()));
    }
  }

  let env = plugin.build_environment();

  let mut planned = Vec::with_capacity(Step::ALL.len());
  for step in Step::ALL {
    let commands = step_commands(plugin, step)?;
    planned.push((step, render_script(&env, &commands), commands.len()));
  }

  if !options.dry_run {
    tokio::fs::create_dir_all(&part.build_dir).await?;
    tokio::fs::create_dir_all(&part.install_dir).await?;
  }

  let mut steps = Vec::with_capacity(planned.len());
  for (step, script, commands) in planned {
    let stdout = if options.dry_run {
      info!(%step, part = %part.name, "dry run, skipping step");
      String::new()
    } else {
      execute_script(step, &script, &part.build_dir, options.shell.as_deref()).await?
    };
    steps.push(StepResult {
      step,
      script,
      commands,
      stdout,
      executed: !options.dry_run,
    });
  }

  info!(part = %part.name, steps = steps.len(), "part complete");

  Ok(RunResult {
    part: part.name.clone(),
    work_dir: part.build_dir.clone(),
    steps,
  })
}
