#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Virtual environment backends for python-venv
//!
//! Four environment types are supported, backed by three tools:
//! - `venv` and `named-venv`: the standard library `venv` module, in the
//!   project directory or in a shared directory of named environments
//! - `pyenv`: the `pyenv-virtualenv` plugin
//! - `conda`: conda environments, by name or by prefix path
//!
//! This crate resolves where an environment lives, asks the backend whether
//! it exists, and builds the commands that create or delete it. Running
//! those commands is left to the caller.

mod commands;
mod interpreter;
mod lookup;
mod names;
mod spec;

pub use commands::{create_command, removal, Removal};
pub use interpreter::Interpreter;
pub use lookup::{env_exists, find_conda_env};
pub use names::{check_python_version, default_env_name};
pub use spec::{EnvSpec, Target};
