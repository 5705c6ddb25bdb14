//! Command line interface definition

use clap::{ArgGroup, Args, Parser, Subcommand};
use pyvenv_ops::EnvRequest;
use pyvenv_types::{ColorChoice, EnvType, ReqScheme};
use std::path::PathBuf;

/// python-venv - Create, remove and replace Python virtual environments
#[derive(Parser)]
#[command(name = "python-venv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create, remove and replace Python virtual environments")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Args)]
pub struct GlobalArgs {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a virtual environment and install requirements into it
    #[command(alias = "new")]
    Create {
        #[command(flatten)]
        env: EnvArgs,

        /// Interpreter version for pyenv and conda environments
        #[arg(long, value_name = "VERSION")]
        python_version: Option<String>,
    },

    /// Remove a virtual environment
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// Remove a virtual environment if present, then create it again
    #[command(alias = "rpl")]
    Replace {
        #[command(flatten)]
        env: EnvArgs,

        /// Interpreter version for pyenv and conda environments
        #[arg(long, value_name = "VERSION")]
        python_version: Option<String>,
    },

    /// Print instructions for enabling shell autocompletion
    Completion {
        /// Print autocompletion code for Bash-compatible shells
        #[arg(long)]
        bash: bool,

        /// Register the program by its absolute location instead of its name
        #[arg(long, requires = "bash")]
        absolute: bool,
    },
}

/// Environment and requirement options shared by create, remove and replace
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("env_type_group").args(["env_type", "venv", "named_venv", "pyenv", "conda"])))]
#[command(group(ArgGroup::new("scheme_group").args([
    "requirements", "plain", "dev", "devplus", "frozen", "package", "pip", "source", "wheel",
])))]
pub struct EnvArgs {
    /// The type of environment
    #[arg(short = 't', long = "type", value_enum, value_name = "TYPE", help_heading = "Environment")]
    pub env_type: Option<EnvType>,

    /// Same as '--type venv'
    #[arg(short = 'v', long, help_heading = "Environment")]
    pub venv: bool,

    /// Same as '--type named-venv'
    #[arg(short = 'N', long, help_heading = "Environment")]
    pub named_venv: bool,

    /// Same as '--type pyenv'
    #[arg(short = 'y', long, help_heading = "Environment")]
    pub pyenv: bool,

    /// Same as '--type conda'
    #[arg(short = 'c', long, help_heading = "Environment")]
    pub conda: bool,

    /// Requirements scheme to install
    #[arg(short = 'r', long, value_enum, value_name = "SCHEME", help_heading = "Requirements")]
    pub requirements: Option<ReqScheme>,

    /// Install 'requirements.txt'
    #[arg(short = 'p', long, help_heading = "Requirements")]
    pub plain: bool,

    /// Install 'requirements_dev.txt'
    #[arg(short = 'd', long, help_heading = "Requirements")]
    pub dev: bool,

    /// Install the project requirements plus the build, dev and test requirements under 'dev/'
    #[arg(short = 'D', long, help_heading = "Requirements")]
    pub devplus: bool,

    /// Install 'requirements_frozen.txt'
    #[arg(short = 'z', long, help_heading = "Requirements")]
    pub frozen: bool,

    /// Install the package named BASENAME
    #[arg(long, help_heading = "Requirements")]
    pub package: bool,

    /// Pass the trailing arguments to 'pip install'
    #[arg(short = 'P', long, help_heading = "Requirements")]
    pub pip: bool,

    /// Build an sdist of the project and install it
    #[arg(short = 's', long, help_heading = "Requirements")]
    pub source: bool,

    /// Build a wheel of the project and install it
    #[arg(short = 'w', long, help_heading = "Requirements")]
    pub wheel: bool,

    /// Base name for the environment and package (default: the project name, '_' replaced by '-')
    #[arg(short = 'b', long)]
    pub basename: Option<String>,

    /// Name of (or path to) the environment
    #[arg(short = 'e', long)]
    pub env_name: Option<String>,

    /// Directory holding named venvs (default: ~/.venvs)
    #[arg(short = 'V', long, value_name = "DIR")]
    pub venvs_dir: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long = "cd", value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Interpreter used to create the environment
    #[arg(long, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Remove a preexisting environment first; never prompt
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Print what would run without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Extra arguments for 'pip install' (with --pip; put them after '--')
    #[arg(value_name = "PIP_ARGS")]
    pub pip_args: Vec<String>,
}

impl EnvArgs {
    /// Environment type after applying the shortcut flags
    #[must_use]
    pub fn env_type(&self) -> EnvType {
        if let Some(env_type) = self.env_type {
            return env_type;
        }
        [
            (self.venv, EnvType::Venv),
            (self.named_venv, EnvType::NamedVenv),
            (self.pyenv, EnvType::Pyenv),
            (self.conda, EnvType::Conda),
        ]
        .into_iter()
        .find_map(|(set, env_type)| set.then_some(env_type))
        .unwrap_or_default()
    }

    /// Requirements scheme after applying the shortcut flags
    #[must_use]
    pub fn scheme(&self) -> Option<ReqScheme> {
        if self.requirements.is_some() {
            return self.requirements;
        }
        [
            (self.plain, ReqScheme::Plain),
            (self.dev, ReqScheme::Dev),
            (self.devplus, ReqScheme::Devplus),
            (self.frozen, ReqScheme::Frozen),
            (self.package, ReqScheme::Package),
            (self.pip, ReqScheme::Pip),
            (self.source, ReqScheme::Source),
            (self.wheel, ReqScheme::Wheel),
        ]
        .into_iter()
        .find_map(|(set, scheme)| set.then_some(scheme))
    }

    /// The request handed to the operations layer
    #[must_use]
    pub fn to_request(&self, python_version: Option<String>) -> EnvRequest {
        let mut request = EnvRequest::new(self.env_type(), self.scheme());
        request.basename.clone_from(&self.basename);
        request.env_name.clone_from(&self.env_name);
        request.venvs_dir.clone_from(&self.venvs_dir);
        request.python.clone_from(&self.python);
        request.python_version = python_version;
        request.force = self.force;
        request.pip_args.clone_from(&self.pip_args);
        request
    }
}
