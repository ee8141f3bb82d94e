//! Implementation of the `charmpoetry script` command.
//!
//! Prints the exact script the runner would execute for one step.

use anyhow::{Context, Result};

use charmpoetry_lib::execute::{Step, step_script};

use super::PartArgs;

pub fn cmd_script(part: &PartArgs, step: Step) -> Result<()> {
  let plugin = part.plugin()?;
  let script = step_script(&plugin, step).with_context(|| format!("Failed to generate {} script", step))?;
  print!("{}", script);
  Ok(())
}
