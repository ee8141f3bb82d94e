//! Implementation of the `charmpoetry plan` command.
//!
//! Generates every step's commands for the part and prints them, in the
//! order the runner would execute them.

use anyhow::{Context, Result};
use serde::Serialize;

use charmpoetry_lib::execute::{Step, step_commands};
use charmpoetry_lib::plugin::Plugin;

use super::PartArgs;
use crate::output::{OutputFormat, print_commands, print_json, print_stat};

#[derive(Debug, Serialize)]
struct PlanOutput {
  part: String,
  build_dir: String,
  install_dir: String,
  venv_dir: String,
  remove_symlinks: bool,
  pull: Vec<String>,
  build: Vec<String>,
}

pub fn cmd_plan(part: &PartArgs, output: OutputFormat) -> Result<()> {
  let plugin = part.plugin()?;
  let info = plugin.part();

  let pull = step_commands(&plugin, Step::Pull).context("Failed to generate pull commands")?;
  let build = step_commands(&plugin, Step::Build).context("Failed to generate build commands")?;

  if output.is_json() {
    return print_json(&PlanOutput {
      part: info.name.clone(),
      build_dir: info.build_dir.display().to_string(),
      install_dir: info.install_dir.display().to_string(),
      venv_dir: plugin.venv_dir().display().to_string(),
      remove_symlinks: plugin.should_remove_symlinks(),
      pull,
      build,
    });
  }

  println!("Part: {}", info.name);
  print_stat("Build dir", &info.build_dir.display().to_string());
  print_stat("Install dir", &info.install_dir.display().to_string());
  print_stat("Venv", &plugin.venv_dir().display().to_string());
  print_stat("Environment", &plugin.build_environment().len().to_string());
  println!();
  print_commands("Pull", &pull);
  println!();
  print_commands("Build", &build);
  Ok(())
}
