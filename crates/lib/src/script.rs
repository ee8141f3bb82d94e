//! Shell script rendering for lifecycle steps.
//!
//! The host runs each step as one POSIX shell script: the plugin's build
//! environment is exported first, then every command runs in order under
//! `set -eu` so the first failure stops the step.

use std::collections::BTreeMap;

/// Characters that never need quoting in a POSIX shell word.
fn is_safe(c: char) -> bool {
  c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c)
}

/// Quote a single argument for a POSIX shell.
pub fn quote(arg: &str) -> String {
  if arg.is_empty() {
    return "''".to_string();
  }
  if arg.chars().all(is_safe) {
    return arg.to_string();
  }
  format!("'{}'", arg.replace('\'', r#"'"'"'"#))
}

/// Quote and join arguments into one command line.
pub fn quote_join<S: AsRef<str>>(args: &[S]) -> String {
  args.iter().map(|a| quote(a.as_ref())).collect::<Vec<_>>().join(" ")
}

/// Render an `export` line that still expands `$VAR` references at run time.
pub fn export_var(name: &str, value: &str) -> String {
  let escaped = value.replace('\\', r"\\").replace('"', "\\\"");
  format!("export {name}=\"{escaped}\"")
}

/// Render a step as a shell script.
pub fn render_script(env: &BTreeMap<String, String>, commands: &[String]) -> String {
  let mut lines = vec!["#!/bin/sh".to_string(), "set -eu".to_string()];
  lines.extend(env.iter().map(|(name, value)| export_var(name, value)));
  lines.extend(commands.iter().cloned());
  let mut script = lines.join("\n");
  script.push('\n');
  script
}
