mod env;
mod packages;
mod plan;
mod run;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::debug;

use charmpoetry_lib::execute::Step;
use charmpoetry_lib::lookup::SystemLookup;
use charmpoetry_lib::part::{PartConfig, PartInfo, PoetryOptions};
use charmpoetry_lib::plugin::CharmPoetryPlugin;

pub use env::cmd_env;
pub use packages::cmd_packages;
pub use plan::cmd_plan;
pub use run::cmd_run;
pub use script::cmd_script;

/// Where the part lives; flags override values from `--part`.
#[derive(Args, Debug, Default)]
pub struct PartArgs {
  /// JSON part description (name, build-dir, install-dir, poetry properties)
  #[arg(long, global = true)]
  part: Option<PathBuf>,

  /// Part name
  #[arg(long, global = true)]
  name: Option<String>,

  /// Part build directory (default: ./build)
  #[arg(long, global = true)]
  build_dir: Option<PathBuf>,

  /// Part install directory (default: ./install)
  #[arg(long, global = true)]
  install_dir: Option<PathBuf>,
}

impl PartArgs {
  pub fn resolve(&self) -> Result<PartConfig> {
    let mut config = match &self.part {
      Some(path) => PartConfig::load(path).with_context(|| format!("Failed to load part: {}", path.display()))?,
      None => PartConfig {
        info: PartInfo::new("charm", "build", "install"),
        options: PoetryOptions::default(),
      },
    };

    if let Some(name) = &self.name {
      config.info.name = name.clone();
    }
    if let Some(dir) = &self.build_dir {
      config.info.build_dir = dir.clone();
    }
    if let Some(dir) = &self.install_dir {
      config.info.install_dir = dir.clone();
    }

    config.info = config
      .info
      .absolute()
      .context("Failed to resolve part directories")?;

    debug!(part = ?config.info, "resolved part");
    Ok(config)
  }

  pub fn plugin(&self) -> Result<CharmPoetryPlugin<SystemLookup>> {
    let config = self.resolve()?;
    Ok(CharmPoetryPlugin::new(config.info, config.options, SystemLookup))
  }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StepArg {
  Pull,
  Build,
}

impl From<StepArg> for Step {
  fn from(step: StepArg) -> Self {
    match step {
      StepArg::Pull => Step::Pull,
      StepArg::Build => Step::Build,
    }
  }
}
