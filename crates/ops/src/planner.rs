//! Building command plans for create, remove and replace

use pyvenv_config::expand_home;
use pyvenv_env::{
    check_python_version, create_command, default_env_name, env_exists, removal, EnvSpec,
    Interpreter, Removal, Target,
};
use pyvenv_errors::{EnvError, Error};
use pyvenv_events::EventEmitter;
use pyvenv_platform::PlatformContext;
use pyvenv_project::{Lookup, ProjectMetadata};
use pyvenv_requirements::{bootstrap_command, check_files, install_commands, Sources};
use pyvenv_types::{Action, EnvType, NamingScheme, ReqScheme};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::plan::{CommandPlan, Stage, StageKind};
use crate::request::EnvRequest;
use crate::OpsCtx;

/// A request with every name and default settled
struct Resolved {
    spec: EnvSpec,
    interpreter: Interpreter,
    python_version: Option<String>,
    sources: Option<Sources>,
}

/// Build the plan for `action` without running any of it.
///
/// Reads project metadata when names depend on it and checks whether the
/// environment already exists. In a dry run, pyenv and conda are not asked:
/// a removal then assumes the environment exists and a creation assumes it
/// does not.
///
/// # Errors
///
/// Returns usage errors for invalid option combinations, and resolution
/// errors for missing requirement files, missing project metadata, or an
/// environment that already exists on create without `force`.
pub async fn plan(ctx: &OpsCtx, action: Action, request: &EnvRequest) -> Result<CommandPlan, Error> {
    request.validate(action)?;
    let pctx = ctx.platform_context();
    let resolved = resolve(ctx, &pctx, action, request).await?;
    let spec = &resolved.spec;

    if let Some(scheme) = request.scheme.filter(|_| action.creates()) {
        check_files(&ctx.platform, &pctx, &ctx.project_dir, scheme).await?;
    }

    let exists = if ctx.dry_run && spec.lookup_needs_process() {
        ctx.emit_debug(format!(
            "dry run: not asking {} whether {} exists",
            spec.env_type(),
            spec.env_name()
        ));
        None
    } else {
        Some(env_exists(&ctx.platform, &pctx, spec).await?)
    };

    let mut plan = CommandPlan::new(action, spec.env_name());
    match action {
        Action::Create => {
            if exists == Some(true) {
                if !request.force {
                    return Err(EnvError::Exists {
                        name: preexisting_name(spec),
                    }
                    .into());
                }
                let mut stage = Stage::new(StageKind::Remove, spec.description());
                stage.progress(format!("Found preexisting {}", preexisting_name(spec)));
                add_removal(ctx, &mut stage, spec, true, request.force);
                plan.push(stage);
            }
            plan.push(create_stage(ctx, &resolved, request));
        }
        Action::Remove => {
            let mut stage = Stage::new(StageKind::Remove, spec.description());
            stage.progress(format!("Removing {}", spec.description()));
            add_removal(ctx, &mut stage, spec, exists != Some(false), request.force);
            stage.progress("Done.");
            plan.push(stage);
        }
        Action::Replace => {
            let mut stage = Stage::new(StageKind::Remove, spec.description());
            stage.progress(format!("Replacing {}", spec.description()));
            stage.progress(format!("Removing {}", spec.description()));
            add_removal(ctx, &mut stage, spec, exists != Some(false), request.force);
            plan.push(stage);
            plan.push(create_stage(ctx, &resolved, request));
        }
    }

    Ok(plan)
}

async fn resolve(
    ctx: &OpsCtx,
    pctx: &PlatformContext,
    action: Action,
    request: &EnvRequest,
) -> Result<Resolved, Error> {
    let interpreter = Interpreter::new(
        request
            .python
            .clone()
            .unwrap_or_else(|| ctx.config.python.interpreter.clone()),
    );

    let python_version = match &request.python_version {
        Some(version) => Some(version.clone()),
        None if request.env_type.accepts_python_version() => ctx.config.python.version.clone(),
        None => None,
    };
    if let Some(version) = &python_version {
        check_python_version(request.env_type, version)?;
    }

    let scheme = request.scheme.filter(|_| action.creates());
    let builds_artifact = scheme.is_some_and(ReqScheme::builds_artifact);
    let needs_basename = request.basename.is_none()
        && ((request.env_name.is_none()
            && request.env_type.naming_scheme() == NamingScheme::Named)
            || scheme == Some(ReqScheme::Package));

    let metadata = if builds_artifact || needs_basename {
        let what = if builds_artifact {
            Lookup::NameAndVersion
        } else {
            Lookup::NameOnly
        };
        let metadata = pyvenv_project::lookup(
            &ctx.platform,
            pctx,
            &ctx.project_dir,
            interpreter.command(),
            what,
        )
        .await?;
        debug!(name = %metadata.name, version = ?metadata.version, "project metadata");
        Some(metadata)
    } else {
        None
    };

    let basename = request
        .basename
        .clone()
        .or_else(|| metadata.as_ref().map(ProjectMetadata::basename));

    let env_name = match &request.env_name {
        Some(name) => name.clone(),
        None => default_env_name(request.env_type, request.scheme, basename.as_deref())
            .ok_or_else(|| Error::internal("environment name could not be derived"))?,
    };

    // Only named venvs live under the venvs directory
    let venvs_dir = match request.venvs_dir.as_deref() {
        Some(dir) => expand_home(dir),
        None if request.env_type == EnvType::NamedVenv => ctx.config.venvs_dir()?,
        None => PathBuf::new(),
    };
    let spec = EnvSpec::new(request.env_type, env_name, &venvs_dir, &ctx.project_dir);
    debug!(env_type = %request.env_type, env = spec.env_name(), target = ?spec.target(), "resolved environment");

    let dist = metadata
        .as_ref()
        .and_then(|m| Some((m.dist_name(), m.version.clone()?)));
    let sources = scheme.map(|scheme| {
        Sources::for_scheme(
            scheme,
            basename.as_deref().unwrap_or_default(),
            &request.pip_args,
            dist.as_ref().map(|(name, version)| (name.as_str(), version.as_str())),
        )
    });

    Ok(Resolved {
        spec,
        interpreter,
        python_version,
        sources,
    })
}

/// How an existing environment is named in the "already exists" error.
fn preexisting_name(spec: &EnvSpec) -> String {
    match spec.target() {
        Target::Directory { path } => path.display().to_string(),
        _ => spec.env_name().to_string(),
    }
}

fn add_removal(ctx: &OpsCtx, stage: &mut Stage, spec: &EnvSpec, exists: bool, force: bool) {
    if !exists {
        info!(env = spec.env_name(), "nothing to remove");
        stage.notice(format!("Good news!  There is no {}.", spec.description()));
        return;
    }

    match removal(spec, force) {
        Removal::Tree(path) => {
            let verb = if ctx.dry_run { "Would remove" } else { "Removing" };
            stage.progress(format!("{verb} {} and all its contents", path.display()));
            stage.remove_tree(path);
        }
        Removal::Command(cmd) => stage.run(cmd),
    }
}

fn create_stage(ctx: &OpsCtx, resolved: &Resolved, request: &EnvRequest) -> Stage {
    let spec = &resolved.spec;
    let mut stage = Stage::new(StageKind::Create, spec.description());
    stage.progress(format!("Creating {}", spec.description()));

    stage.run(create_command(
        spec,
        &resolved.interpreter,
        resolved.python_version.as_deref(),
        request.force,
    ));

    // conda reports its own creation
    if spec.env_type() != EnvType::Conda {
        let created = spec
            .abs_dir()
            .map_or_else(|| spec.env_name().to_string(), |dir| dir.display().to_string());
        let verb = if ctx.dry_run {
            "Would have created"
        } else {
            "Created"
        };
        stage.message(format!("{verb} {created}"));
    }

    if let (Some(scheme), Some(sources)) = (request.scheme, &resolved.sources) {
        stage.progress(format!("Installing {scheme} requirements"));
        let python = spec.env_python(&resolved.interpreter);
        if spec.env_type().bootstraps_pip() || scheme.builds_artifact() {
            stage.run(bootstrap_command(&python, scheme));
        }
        for cmd in install_commands(&python, sources) {
            stage.run(cmd);
        }
    }

    stage.progress("Done.");
    if !ctx.dry_run {
        stage.message(format!(
            "To use your virtual environment: '{}'.",
            spec.activation_command()
        ));
    }

    stage
}

