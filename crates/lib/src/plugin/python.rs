//! Commands shared by Python plugins.
//!
//! Every Python plugin builds into a virtual environment: it creates the
//! venv, installs packages into it, rewrites shebangs that point at the venv
//! interpreter, and optionally drops the interpreter symlinks the venv module
//! created. Plugins vary only the venv location, the package install
//! commands, and the symlink policy.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::consts::{ENV_PATH, ENV_PYTHON_INTERPRETER, ENV_PYTHON_VENV_ARGS, ENV_PYTHON_VENV_INTERP_PATH};
use crate::part::PartInfo;
use crate::script::quote;

/// System packages needed to create a venv on the build host.
pub fn build_packages() -> BTreeSet<String> {
  ["findutils", "python3-dev", "python3-venv"]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn build_environment(part: &PartInfo) -> BTreeMap<String, String> {
  BTreeMap::from([
    (
      ENV_PATH.to_string(),
      format!("{}/bin:${{PATH}}", part.install_dir.display()),
    ),
    (ENV_PYTHON_INTERPRETER.to_string(), "python3".to_string()),
    (ENV_PYTHON_VENV_ARGS.to_string(), String::new()),
  ])
}

/// Path of the venv's pip executable, quoted for the shell.
pub fn pip(venv_dir: &Path) -> String {
  quote(&format!("{}/bin/pip", venv_dir.display()))
}

pub fn create_venv_commands(venv_dir: &Path) -> Vec<String> {
  let venv = venv_dir.display();
  vec![
    format!("\"${{{ENV_PYTHON_INTERPRETER}}}\" -m venv ${{{ENV_PYTHON_VENV_ARGS}}} \"{venv}\""),
    format!("{ENV_PYTHON_VENV_INTERP_PATH}=\"{venv}/bin/${{{ENV_PYTHON_INTERPRETER}}}\""),
  ]
}

/// Rewrite shebangs pointing at the venv interpreter to a portable one.
pub fn rewrite_shebangs_commands(part: &PartInfo) -> Vec<String> {
  let find = format!("find \"{}\" -type f -executable -print0", part.install_dir.display());
  let xargs = "xargs --no-run-if-empty -0";
  let sed = format!(
    "sed -i \"1 s|^#\\!${{{ENV_PYTHON_VENV_INTERP_PATH}}}.*$|#\\!/usr/bin/env ${{{ENV_PYTHON_INTERPRETER}}}|\""
  );
  vec![format!("{find} | {xargs} {sed}")]
}

/// Handle the `python*` symlinks the venv module left in `bin/`.
///
/// When kept, the venv interpreter is re-linked to the interpreter resolved
/// on the build host's `PATH`. When removed, they are deleted and not
/// recreated.
pub fn handle_symlinks_commands(venv_dir: &Path, remove: bool) -> Vec<String> {
  if !remove {
    return vec![
      format!("symlink_target=\"$(readlink -f \"$(command -v \"${{{ENV_PYTHON_INTERPRETER}}}\")\")\""),
      format!("ln -sf \"${{symlink_target}}\" \"${{{ENV_PYTHON_VENV_INTERP_PATH}}}\""),
    ];
  }
  let venv = venv_dir.display();
  vec![
    format!("echo Removing python symlinks in {venv}/bin"),
    format!("rm \"{venv}\"/bin/python*"),
  ]
}

/// Assemble the build step in the order every Python plugin uses.
pub fn build_commands(
  part: &PartInfo,
  venv_dir: &Path,
  package_install: Vec<String>,
  remove_symlinks: bool,
) -> Vec<String> {
  let mut commands = create_venv_commands(venv_dir);
  commands.extend(package_install);
  commands.extend(rewrite_shebangs_commands(part));
  commands.extend(handle_symlinks_commands(venv_dir, remove_symlinks));
  commands
}
