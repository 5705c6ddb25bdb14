//! Implementation on top of the host operating system via `tokio`

pub mod filesystem;
pub mod process;
