//! Implementation of the `charmpoetry packages` command.

use anyhow::{Context, Result};

use charmpoetry_lib::plugin::Plugin;

use super::PartArgs;
use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_packages(part: &PartArgs, output: OutputFormat) -> Result<()> {
  let plugin = part.plugin()?;
  let packages = plugin.build_packages().context("Failed to compute build packages")?;

  if output.is_json() {
    return print_json(&packages);
  }

  for package in &packages {
    println!("{} {}", symbols::PLUS, package);
  }
  Ok(())
}
