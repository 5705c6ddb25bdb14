use std::path::Path;

/// The interpreter environments are created from.
///
/// A full path is used verbatim for creation; inside the environment the
/// same interpreter is reached by its last path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    command: String,
}

impl Interpreter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// `python3.12` for `/usr/local/bin/python3.12`
    #[must_use]
    pub fn base_name(&self) -> &str {
        Path::new(&self.command)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.command)
    }
}
