//! What each requirement scheme installs

use pyvenv_config::constants::DIST_DIR;
use pyvenv_types::ReqScheme;

const PLAIN_FILES: &[&str] = &["requirements.txt"];
const DEV_FILES: &[&str] = &["requirements_dev.txt"];
const DEVPLUS_FILES: &[&str] = &[
    "requirements.txt",
    "dev/requirements_build.txt",
    "dev/requirements_dev.txt",
    "dev/requirements_test.txt",
];
const FROZEN_FILES: &[&str] = &["requirements_frozen.txt"];

/// Requirement files read by `scheme`, relative to the project directory.
#[must_use]
pub fn files(scheme: ReqScheme) -> &'static [&'static str] {
    match scheme {
        ReqScheme::Plain => PLAIN_FILES,
        ReqScheme::Dev => DEV_FILES,
        ReqScheme::Devplus => DEVPLUS_FILES,
        ReqScheme::Frozen => FROZEN_FILES,
        ReqScheme::Package | ReqScheme::Pip | ReqScheme::Source | ReqScheme::Wheel => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Sdist,
    Wheel,
}

impl ArtifactKind {
    /// Flag passed to `python -m build`
    #[must_use]
    pub fn build_flag(self) -> &'static str {
        match self {
            Self::Sdist => "--sdist",
            Self::Wheel => "--wheel",
        }
    }

    /// Path of the built file, relative to the project directory.
    #[must_use]
    pub fn path(self, dist_name: &str, version: &str) -> String {
        match self {
            Self::Sdist => format!("{DIST_DIR}/{dist_name}-{version}.tar.gz"),
            Self::Wheel => format!("{DIST_DIR}/{dist_name}-{version}-py3-none-any.whl"),
        }
    }
}

/// A distribution of the project to build and then install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub dist_name: String,
    pub version: String,
}

impl Artifact {
    #[must_use]
    pub fn path(&self) -> String {
        self.kind.path(&self.dist_name, &self.version)
    }
}

/// Everything a scheme installs, in installation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub files: Vec<String>,
    pub packages: Vec<String>,
    pub pip_args: Vec<String>,
    pub artifact: Option<Artifact>,
}

impl Sources {
    /// Expand `scheme`.
    ///
    /// `basename` feeds the `package` scheme, `pip_args` the `pip` scheme.
    /// `dist` is the project's distribution name and version; it is only
    /// consulted by schemes that build an artifact and is ignored otherwise.
    #[must_use]
    pub fn for_scheme(
        scheme: ReqScheme,
        basename: &str,
        pip_args: &[String],
        dist: Option<(&str, &str)>,
    ) -> Self {
        let mut sources = Self {
            files: files(scheme).iter().map(|f| (*f).to_string()).collect(),
            ..Self::default()
        };

        match scheme {
            ReqScheme::Package => sources.packages.push(basename.to_string()),
            ReqScheme::Pip => sources.pip_args = pip_args.to_vec(),
            ReqScheme::Source | ReqScheme::Wheel => {
                let kind = if scheme == ReqScheme::Source {
                    ArtifactKind::Sdist
                } else {
                    ArtifactKind::Wheel
                };
                if let Some((dist_name, version)) = dist {
                    sources.artifact = Some(Artifact {
                        kind,
                        dist_name: dist_name.to_string(),
                        version: version.to_string(),
                    });
                }
            }
            ReqScheme::Plain | ReqScheme::Dev | ReqScheme::Devplus | ReqScheme::Frozen => {}
        }

        sources
    }

    /// True when nothing would be handed to pip.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.packages.is_empty()
            && self.pip_args.is_empty()
            && self.artifact.is_none()
    }
}
