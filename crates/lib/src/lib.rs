//! charmpoetry-lib: charm packaging conventions for poetry-based parts
//!
//! This crate turns a part's build and install directories into the
//! environment, build packages, and shell commands of each lifecycle step:
//! - `PoetryPlugin`: the generic poetry plugin (export, then pip install)
//! - `CharmPoetryPlugin`: the charm customizations layered on top of it
//! - `execute`: a sequential runner for the generated steps

pub mod consts;
pub mod execute;
pub mod lookup;
pub mod part;
pub mod plugin;
pub mod script;
