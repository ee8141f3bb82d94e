//! Implementation of the `charmpoetry run` command.
//!
//! Runs the pull step, then the build step, stopping at the first failure.

use std::time::Instant;

use anyhow::{Context, Result};

use charmpoetry_lib::execute::{RunOptions, run_steps};

use super::PartArgs;
use crate::output::{OutputFormat, format_duration, print_error, print_info, print_json, print_success, symbols};

pub fn cmd_run(part: &PartArgs, dry_run: bool, shell: Option<String>, output: OutputFormat) -> Result<()> {
  let plugin = part.plugin()?;
  let options = RunOptions { dry_run, shell };

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = match rt.block_on(run_steps(&plugin, plugin.part(), &options)) {
    Ok(result) => result,
    Err(e) => {
      if !output.is_json() {
        print_error(&format!("Part {} failed: {}", plugin.part().name, e));
      }
      return Err(e).context("Run failed");
    }
  };

  if output.is_json() {
    return print_json(&result);
  }

  for step in &result.steps {
    if step.executed {
      print_success(&format!("{} ({} commands)", step.step, step.commands));
    } else {
      print_info(&format!("{} ({} commands, not run)", step.step, step.commands));
      print!("{}", step.script);
    }
  }
  println!(
    "{} {} in {}",
    symbols::ARROW,
    result.part,
    format_duration(started.elapsed())
  );
  Ok(())
}
