//! The slice of `pyproject.toml` we care about

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PyProject {
    #[serde(default)]
    project: Option<ProjectTable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
}

impl PyProject {
    /// Parse the document, ignoring every table except `[project]`.
    ///
    /// # Errors
    ///
    /// Returns the TOML parser's message when the document is malformed.
    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.project.as_ref().and_then(|p| p.version.as_deref())
    }
}
