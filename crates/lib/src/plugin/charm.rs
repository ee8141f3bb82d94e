//! Charm packaging conventions on top of the poetry plugin.
//!
//! Each customization is a pure transformation of what the poetry plugin
//! produces:
//! - the build environment gains `~/.local/bin` on `PATH` and forces source installs
//! - `curl` joins the build packages so the poetry installer can be fetched
//! - the pull step installs poetry when it is not already on the search path
//! - dependencies install without resolution, followed by `pip check`
//! - `src` and `lib` are copied from the build tree into the install tree
//! - the venv lives in `venv/` and loses its interpreter symlinks

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::poetry::requirement_arg;
use super::{Plugin, PluginError, PoetryPlugin, python};
use crate::consts::{COPIED_DIRS, CURL_PACKAGE, ENV_PATH, ENV_PIP_NO_BINARY, POETRY, POETRY_INSTALLER_URL};
use crate::lookup::PathLookup;
use crate::part::{PartInfo, PoetryOptions};
use crate::script::quote;

/// Overlay the charm entries onto a base environment.
pub fn augment_environment(mut env: BTreeMap<String, String>) -> BTreeMap<String, String> {
  env.insert(ENV_PATH.to_string(), "$HOME/.local/bin:$PATH".to_string());
  env.insert(ENV_PIP_NO_BINARY.to_string(), ":all:".to_string());
  env
}

/// Add the transfer utility to a base package set.
pub fn augment_build_packages(mut packages: BTreeSet<String>) -> BTreeSet<String> {
  packages.insert(CURL_PACKAGE.to_string());
  packages
}

/// Command that downloads and runs the poetry installer.
pub fn install_poetry_command() -> String {
  format!("curl -sSL {POETRY_INSTALLER_URL} | python3 -")
}

/// Append the poetry installer to `base` when poetry is not installed.
pub fn augment_pull_commands(base: Vec<String>, lookup: &impl PathLookup) -> Result<Vec<String>, PluginError> {
  let mut commands = base;
  if !lookup.has(POETRY)? {
    debug!("poetry not found, installing it during pull");
    commands.push(install_poetry_command());
  }
  Ok(commands)
}

/// Install exported requirements without resolving, then check the venv.
///
/// The export pins hashes, which pip cannot honour alongside a directory
/// install, so resolution is skipped and `pip check` catches anything missing.
pub fn pip_install_commands(pip: &str, requirements_path: &Path) -> Vec<String> {
  vec![
    format!("{pip} install --no-dependencies {}", requirement_arg(requirements_path)),
    format!("{pip} check"),
  ]
}

/// Copy one build subdirectory into the install tree.
///
/// A missing source directory is skipped; any other `cp` failure fails the step.
pub fn copy_dir_command(build_dir: &Path, install_dir: &Path, dir: &str) -> String {
  let source = quote(&build_dir.join(dir).display().to_string());
  let target = quote(&install_dir.display().to_string());
  format!("[ ! -d {source} ] || cp -arf {source} {target}")
}

/// Append the `src` and `lib` copies to a base install command list.
pub fn augment_package_install_commands(base: Vec<String>, part: &PartInfo) -> Vec<String> {
  let mut commands = base;
  commands.extend(
    COPIED_DIRS
      .iter()
      .map(|dir| copy_dir_command(&part.build_dir, &part.install_dir, dir)),
  );
  commands
}

/// Charm venvs never keep the `python*` symlinks in `bin/`.
pub fn should_remove_symlinks() -> bool {
  true
}

/// The poetry plugin as used to pack charms.
pub struct CharmPoetryPlugin<L> {
  base: PoetryPlugin<L>,
}

impl<L: PathLookup> CharmPoetryPlugin<L> {
  pub fn new(part: PartInfo, options: PoetryOptions, lookup: L) -> Self {
    Self {
      base: PoetryPlugin::new(part, options, lookup),
    }
  }

  pub fn part(&self) -> &PartInfo {
    self.base.part()
  }

  pub fn venv_dir(&self) -> PathBuf {
    self.part().charm_venv_dir()
  }

  pub fn pip(&self) -> String {
    python::pip(&self.venv_dir())
  }

  pub fn pip_install_commands(&self, requirements_path: &Path) -> Vec<String> {
    pip_install_commands(&self.pip(), requirements_path)
  }

  /// Export and install with the charm installer, then copy `src` and `lib`.
  pub fn package_install_commands(&self) -> Vec<String> {
    let base = self
      .base
      .package_install_commands_with(|requirements| self.pip_install_commands(requirements));
    augment_package_install_commands(base, self.part())
  }

  pub fn should_remove_symlinks(&self) -> bool {
    should_remove_symlinks()
  }
}

impl<L: PathLookup> Plugin for CharmPoetryPlugin<L> {
  fn build_environment(&self) -> BTreeMap<String, String> {
    augment_environment(self.base.build_environment())
  }

  /// Starts from the Python plugin's packages; `python3-poetry` is never
  /// requested since poetry comes from its installer instead.
  fn build_packages(&self) -> Result<BTreeSet<String>, PluginError> {
    Ok(augment_build_packages(python::build_packages()))
  }

  fn pull_commands(&self) -> Result<Vec<String>, PluginError> {
    augment_pull_commands(self.base.pull_commands()?, self.base.lookup())
  }

  fn build_commands(&self) -> Vec<String> {
    python::build_commands(
      self.part(),
      &self.venv_dir(),
      self.package_install_commands(),
      self.should_remove_symlinks(),
    )
  }
}
