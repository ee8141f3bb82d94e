//! Implementation of the `charmpoetry env` command.

use anyhow::Result;

use charmpoetry_lib::plugin::Plugin;

use super::PartArgs;
use crate::output::{OutputFormat, print_json};

pub fn cmd_env(part: &PartArgs, output: OutputFormat) -> Result<()> {
  let plugin = part.plugin()?;
  let env = plugin.build_environment();

  if output.is_json() {
    return print_json(&env);
  }

  for (name, value) in &env {
    println!("{}={}", name, value);
  }
  Ok(())
}
