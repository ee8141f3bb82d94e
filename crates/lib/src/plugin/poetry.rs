//! The generic poetry plugin.
//!
//! Exports the project's lockfile to a plain requirements file with
//! `poetry export`, then installs it into the venv with pip.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Plugin, PluginError, python};
use crate::consts::{POETRY, POETRY_PACKAGE};
use crate::lookup::PathLookup;
use crate::part::{PartInfo, PoetryOptions};
use crate::script::{quote, quote_join};

/// Commands that export the lockfile to `requirements_path`.
pub fn export_commands(options: &PoetryOptions, requirements_path: &Path) -> Vec<String> {
  let mut args = vec![
    POETRY.to_string(),
    "export".to_string(),
    "--format=requirements.txt".to_string(),
    format!("--output={}", requirements_path.display()),
    "--with-credentials".to_string(),
  ];
  if !options.with_groups.is_empty() {
    let groups: Vec<&str> = options.with_groups.iter().map(String::as_str).collect();
    args.push(format!("--with={}", groups.join(",")));
  }
  args.extend(options.export_extra_args.iter().cloned());
  vec![quote_join(&args)]
}

/// The `--requirement=` argument, quoted for the shell.
pub fn requirement_arg(requirements_path: &Path) -> String {
  quote(&format!("--requirement={}", requirements_path.display()))
}

/// Default pip install: requirements first, then the project itself, then a
/// consistency check.
pub fn pip_install_commands(options: &PoetryOptions, pip: &str, requirements_path: &Path) -> Vec<String> {
  let extra = if options.pip_extra_args.is_empty() {
    String::new()
  } else {
    format!("{} ", quote_join(&options.pip_extra_args))
  };
  vec![
    format!("{pip} install {extra}{}", requirement_arg(requirements_path)),
    format!("{pip} install --no-deps ."),
    format!("{pip} check"),
  ]
}

/// Poetry plugin with the stock venv layout and pip behavior.
pub struct PoetryPlugin<L> {
  part: PartInfo,
  options: PoetryOptions,
  lookup: L,
}

impl<L: PathLookup> PoetryPlugin<L> {
  pub fn new(part: PartInfo, options: PoetryOptions, lookup: L) -> Self {
    Self { part, options, lookup }
  }

  pub fn part(&self) -> &PartInfo {
    &self.part
  }

  pub fn options(&self) -> &PoetryOptions {
    &self.options
  }

  pub fn lookup(&self) -> &L {
    &self.lookup
  }

  pub fn system_has_poetry(&self) -> Result<bool, PluginError> {
    Ok(self.lookup.has(POETRY)?)
  }

  /// The stock plugin installs straight into the install tree.
  pub fn venv_dir(&self) -> PathBuf {
    self.part.install_dir.clone()
  }

  /// Export the lockfile, then install it with `pip_install`.
  ///
  /// `pip_install` receives the requirements path; plugins that change how
  /// dependencies are installed pass their own generator here.
  pub fn package_install_commands_with<F>(&self, pip_install: F) -> Vec<String>
  where
    F: FnOnce(&Path) -> Vec<String>,
  {
    let requirements_path = self.part.requirements_path();
    let mut commands = export_commands(&self.options, &requirements_path);
    commands.extend(pip_install(&requirements_path));
    commands
  }

  pub fn package_install_commands(&self) -> Vec<String> {
    let pip = python::pip(&self.venv_dir());
    self.package_install_commands_with(|requirements| pip_install_commands(&self.options, &pip, requirements))
  }
}

impl<L: PathLookup> Plugin for PoetryPlugin<L> {
  fn build_environment(&self) -> BTreeMap<String, String> {
    python::build_environment(&self.part)
  }

  fn build_packages(&self) -> Result<BTreeSet<String>, PluginError> {
    let mut packages = python::build_packages();
    if !self.system_has_poetry()? {
      debug!(package = POETRY_PACKAGE, "poetry missing, adding build package");
      packages.insert(POETRY_PACKAGE.to_string());
    }
    Ok(packages)
  }

  fn pull_commands(&self) -> Result<Vec<String>, PluginError> {
    Ok(Vec::new())
  }

  fn build_commands(&self) -> Vec<String> {
    let venv_dir = self.venv_dir();
    python::build_commands(&self.part, &venv_dir, self.package_install_commands(), false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lookup::LookupError;

  fn part() -> PartInfo {
    PartInfo::new("charm", "/b", "/i")
  }

  fn present(_: &str) -> Result<Option<PathBuf>, LookupError> {
    Ok(Some(PathBuf::from("/usr/bin/poetry")))
  }

  fn absent(_: &str) -> Result<Option<PathBuf>, LookupError> {
    Ok(None)
  }

  fn broken(tool: &str) -> Result<Option<PathBuf>, LookupError> {
    Err(LookupError {
      tool: tool.to_string(),
      reason: "boom".to_string(),
    })
  }

  #[test]
  fn export_without_groups() {
    let commands = export_commands(&PoetryOptions::default(), Path::new("/b/requirements.txt"));

    assert_eq!(
      commands,
      vec!["poetry export --format=requirements.txt --output=/b/requirements.txt --with-credentials"]
    );
  }

  #[test]
  fn export_with_sorted_groups_and_extra_args() {
    let options = PoetryOptions {
      with_groups: ["test", "docs"].into_iter().map(String::from).collect(),
      export_extra_args: vec!["--without-hashes".to_string()],
      pip_extra_args: Vec::new(),
    };

    let commands = export_commands(&options, Path::new("/b/requirements.txt"));

    assert_eq!(
      commands,
      vec![
        "poetry export --format=requirements.txt --output=/b/requirements.txt --with-credentials \
         --with=docs,test --without-hashes"
      ]
    );
  }

  #[test]
  fn export_quotes_paths_with_spaces() {
    let commands = export_commands(&PoetryOptions::default(), Path::new("/my build/requirements.txt"));
    assert!(commands[0].contains("'--output=/my build/requirements.txt'"));
  }

  #[test]
  fn default_pip_install() {
    let commands = pip_install_commands(&PoetryOptions::default(), "/i/bin/pip", Path::new("/b/requirements.txt"));

    assert_eq!(
      commands,
      vec![
        "/i/bin/pip install --requirement=/b/requirements.txt",
        "/i/bin/pip install --no-deps .",
        "/i/bin/pip check",
      ]
    );
  }

  #[test]
  fn pip_install_quotes_paths_with_spaces() {
    let commands = pip_install_commands(
      &PoetryOptions::default(),
      &python::pip(Path::new("/my install")),
      Path::new("/my build/requirements.txt"),
    );

    assert_eq!(
      commands[0],
      "'/my install/bin/pip' install '--requirement=/my build/requirements.txt'"
    );
    assert_eq!(commands[2], "'/my install/bin/pip' check");
  }

  #[test]
  fn pip_extra_args_go_before_requirement() {
    let options = PoetryOptions {
      pip_extra_args: vec!["--no-cache-dir".to_string()],
      ..Default::default()
    };

    let commands = pip_install_commands(&options, "pip", Path::new("r.txt"));

    assert_eq!(commands[0], "pip install --no-cache-dir --requirement=r.txt");
  }

  #[test]
  fn package_install_exports_then_installs() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), present);

    let commands = plugin.package_install_commands();

    assert_eq!(commands.len(), 4);
    assert!(commands[0].starts_with("poetry export"));
    assert_eq!(commands[1], "/i/bin/pip install --requirement=/b/requirements.txt");
  }

  #[test]
  fn package_install_with_custom_installer() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), present);

    let commands = plugin.package_install_commands_with(|req| vec![format!("install {}", req.display())]);

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[1], "install /b/requirements.txt");
  }

  #[test]
  fn build_packages_add_poetry_when_missing() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), absent);

    let packages = plugin.build_packages().unwrap();

    assert!(packages.contains("python3-poetry"));
    assert!(packages.contains("python3-venv"));
  }

  #[test]
  fn build_packages_skip_poetry_when_present() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), present);

    let packages = plugin.build_packages().unwrap();

    assert_eq!(packages, python::build_packages());
  }

  #[test]
  fn build_packages_propagate_lookup_failure() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), broken);

    let err = plugin.build_packages().unwrap_err();

    assert!(matches!(err, PluginError::EnvironmentValidation { ref tool, .. } if tool == "poetry"));
  }

  #[test]
  fn pull_is_empty() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), broken);
    assert!(plugin.pull_commands().unwrap().is_empty());
  }

  #[test]
  fn build_keeps_symlinks_and_uses_install_dir_venv() {
    let plugin = PoetryPlugin::new(part(), PoetryOptions::default(), present);

    let commands = plugin.build_commands();

    assert!(commands[0].ends_with("\"/i\""));
    assert!(!commands.iter().any(|c| c.contains("Removing python symlinks")));
    assert!(commands.last().unwrap().starts_with("ln -sf "));
  }
}
