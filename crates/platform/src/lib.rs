#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for python-venv.
//!
//! This crate provides a unified interface for the side effects the tool
//! performs:
//! - Process execution, captured (queries) or attached to the terminal (plan steps)
//! - Filesystem inspection and removal of directory environments
//! - Cleaning virtual environment activation out of child environments
//!
//! Everything goes through traits so planning and execution can be tested
//! against recording implementations.

pub mod core;
pub mod environment;
pub mod filesystem;
pub mod implementations;
pub mod process;

pub use core::{Platform, PlatformContext};
pub use environment::{clean_environment, clean_process_environment, EnvMap};
pub use filesystem::{FilesystemOperations, PathKind};
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
