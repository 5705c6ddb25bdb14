//! Integration tests for ops crate

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pyvenv_config::Config;
    use pyvenv_errors::{EnvError, Error, ProjectError, RequirementsError};
    use pyvenv_events::{AppEvent, EventReceiver, GeneralEvent, ProcessEvent};
    use pyvenv_ops::*;
    use pyvenv_platform::{
        CommandOutput, Platform, PlatformCommand, PlatformContext, ProcessOperations,
    };
    use pyvenv_types::{Action, EnvType, ReqScheme};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Records every command and answers from canned responses.
    #[derive(Default)]
    struct Recorder {
        queries: Mutex<Vec<String>>,
        attached: Mutex<Vec<String>>,
        responses: Mutex<HashMap<String, (i32, String)>>,
        failures: Mutex<HashMap<String, i32>>,
    }

    impl Recorder {
        fn respond(&self, command: &str, code: i32, stdout: &str) {
            self.responses
                .lock()
                .unwrap()
                .insert(command.to_string(), (code, stdout.to_string()));
        }

        fn fail(&self, command: &str, code: i32) {
            self.failures
                .lock()
                .unwrap()
                .insert(command.to_string(), code);
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        fn attached(&self) -> Vec<String> {
            self.attached.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessOperations for Recorder {
        async fn execute_command(
            &self,
            _ctx: &PlatformContext,
            cmd: PlatformCommand,
        ) -> Result<CommandOutput, Error> {
            let rendered = cmd.to_string();
            self.queries.lock().unwrap().push(rendered.clone());
            let (code, stdout) = self
                .responses
                .lock()
                .unwrap()
                .get(&rendered)
                .cloned()
                .unwrap_or((1, String::new()));
            Ok(CommandOutput {
                code,
                stdout: stdout.into_bytes(),
                stderr: Vec::new(),
            })
        }

        async fn run_attached(
            &self,
            _ctx: &PlatformContext,
            cmd: PlatformCommand,
        ) -> Result<i32, Error> {
            let rendered = cmd.to_string();
            self.attached.lock().unwrap().push(rendered.clone());
            Ok(self
                .failures
                .lock()
                .unwrap()
                .get(&rendered)
                .copied()
                .unwrap_or(0))
        }
    }

    fn context(recorder: &Arc<Recorder>, project: &Path, dry_run: bool) -> (OpsCtx, EventReceiver) {
        let (tx, rx) = pyvenv_events::channel();
        let ctx = OpsContextBuilder::new()
            .with_platform(Platform::with_process(recorder.clone()))
            .with_event_sender(tx)
            .with_config(Config::default())
            .with_project_dir(project)
            .with_dry_run(dry_run)
            .build()
            .unwrap();
        (ctx, rx)
    }

    fn commands(plan: &CommandPlan) -> Vec<String> {
        plan.commands().map(ToString::to_string).collect()
    }

    fn drain(rx: &mut EventReceiver) -> (Vec<String>, Vec<String>) {
        let mut progress = Vec::new();
        let mut traces = Vec::new();
        while let Ok(message) = rx.try_recv() {
            match message.event {
                AppEvent::General(GeneralEvent::Progress { message }) => progress.push(message),
                AppEvent::Process(ProcessEvent::Trace { command }) => traces.push(command),
                _ => {}
            }
        }
        (progress, traces)
    }

    #[tokio::test]
    async fn test_ops_context_builder_requires_components() {
        let Err(err) = OpsContextBuilder::new()
            .with_config(Config::default())
            .build()
        else {
            panic!("builder without a platform must fail");
        };
        assert_eq!(err.to_string(), "component not found: platform");
    }

    #[tokio::test]
    async fn test_venv_plain_dry_run() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "requests\n").unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, mut rx) = context(&recorder, temp.path(), true);

        let request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Plain));
        let result = create(&ctx, &request).await.unwrap();

        assert!(matches!(result, OperationResult::DryRun(_)));
        assert_eq!(
            result.report().commands,
            vec![
                "python3 -m venv .venv",
                ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel",
                ".venv/bin/python3 -m pip install -r requirements.txt",
            ]
        );
        assert!(recorder.queries().is_empty());
        assert!(recorder.attached().is_empty());
        assert!(!temp.path().join(".venv").exists());

        let (progress, traces) = drain(&mut rx);
        assert_eq!(traces, result.report().commands);
        assert_eq!(
            progress,
            vec![
                "Creating Python venv at .venv...".to_string(),
                format!("Would have created {}", temp.path().join(".venv").display()),
                "Installing plain requirements...".to_string(),
                "Done.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_conda_package_with_basename() {
        // No project metadata at all: the explicit basename must be enough
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), true);

        let mut request = EnvRequest::new(EnvType::Conda, Some(ReqScheme::Package));
        request.basename = Some("foo".to_string());
        let plan = plan(&ctx, Action::Create, &request).await.unwrap();

        assert_eq!(
            commands(&plan),
            vec![
                "conda create --quiet -n foo python=3",
                "conda run --no-capture-output -n foo python3 -m pip install foo",
            ]
        );
        assert!(recorder.queries().is_empty());
    }

    #[tokio::test]
    async fn test_named_env_without_metadata_fails() {
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), true);

        let request = EnvRequest::new(EnvType::Pyenv, Some(ReqScheme::Package));
        let err = plan(&ctx, Action::Create, &request).await.unwrap_err();
        assert!(matches!(err, Error::Project(ProjectError::NoProject { .. })));
    }

    #[tokio::test]
    async fn test_named_venv_dev_uses_project_name() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nname = \"my_tool\"\nversion = \"1.0\"\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("requirements_dev.txt"), "").unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), true);

        let mut request = EnvRequest::new(EnvType::NamedVenv, Some(ReqScheme::Dev));
        request.venvs_dir = Some(temp.path().join("venvs"));
        request.python = Some("/usr/bin/python3.12".to_string());
        let plan = plan(&ctx, Action::Create, &request).await.unwrap();

        let env_dir = temp.path().join("venvs").join("my-tool-dev");
        let python = env_dir.join("bin").join("python3.12");
        assert_eq!(plan.env_name, "my-tool-dev");
        assert_eq!(
            commands(&plan),
            vec![
                format!("/usr/bin/python3.12 -m venv {}", env_dir.display()),
                format!(
                    "{} -m pip install --upgrade pip setuptools wheel",
                    python.display()
                ),
                format!("{} -m pip install -r requirements_dev.txt", python.display()),
            ]
        );
    }

    #[tokio::test]
    async fn test_wheel_scheme_builds_then_installs() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nname = \"my-pkg\"\nversion = \"0.2.0\"\n",
        )
        .unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), true);

        let mut request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Wheel));
        request.basename = Some("ignored-for-artifacts".to_string());
        let plan = plan(&ctx, Action::Create, &request).await.unwrap();

        assert_eq!(
            commands(&plan),
            vec![
                "python3 -m venv .venv",
                ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel build",
                ".venv/bin/python3 -m build --wheel --outdir dist .",
                ".venv/bin/python3 -m pip install dist/my_pkg-0.2.0-py3-none-any.whl",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_requirement_files() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), false);

        let request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Devplus));
        let err = create(&ctx, &request).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Requirements(RequirementsError::MissingFiles { ref files }) if files.len() == 3
        ));
        assert!(recorder.attached().is_empty());
    }

    #[tokio::test]
    async fn test_existing_venv_requires_force() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        std::fs::create_dir_all(temp.path().join(".venv/bin")).unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), false);

        let mut request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Plain));
        let err = create(&ctx, &request).await.unwrap_err();
        assert!(matches!(err, Error::Env(EnvError::Exists { .. })));
        assert_eq!(
            err.to_string(),
            "Found preexisting .venv, please remove it first, or use '--force'"
        );

        request.force = true;
        let result = create(&ctx, &request).await.unwrap();
        assert!(matches!(result, OperationResult::Completed(_)));
        assert!(!temp.path().join(".venv").exists());
        assert_eq!(recorder.attached().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_removes_then_creates() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let recorder = Arc::new(Recorder::default());
        recorder.respond(
            "conda env list",
            0,
            "# conda environments:\nbase  /opt/conda\nproj  /opt/conda/envs/proj\n",
        );
        let (ctx, _rx) = context(&recorder, temp.path(), false);

        let mut request = EnvRequest::new(EnvType::Conda, Some(ReqScheme::Plain));
        request.env_name = Some("proj".to_string());
        request.force = true;
        let planned = plan(&ctx, Action::Replace, &request).await.unwrap();
        assert_eq!(
            planned.stage_kinds(),
            vec![StageKind::Remove, StageKind::Create]
        );

        replace(&ctx, &request).await.unwrap();
        assert_eq!(
            recorder.attached(),
            vec![
                "conda env remove --quiet --yes -n proj",
                "conda create --quiet --yes -n proj python=3",
                "conda run --no-capture-output -n proj python3 -m pip install -r requirements.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_replace_of_missing_env_only_creates() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, mut rx) = context(&recorder, temp.path(), false);

        let request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Plain));
        replace(&ctx, &request).await.unwrap();

        assert_eq!(recorder.attached()[0], "python3 -m venv .venv");
        let (progress, _) = drain(&mut rx);
        assert!(progress.contains(&"Good news!  There is no Python venv at .venv.".to_string()));
        assert_eq!(
            progress.last().map(String::as_str),
            Some("To use your virtual environment: 'source .venv/bin/activate'.")
        );
    }

    #[tokio::test]
    async fn test_real_run_stops_at_first_failure() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let recorder = Arc::new(Recorder::default());
        recorder.fail(
            ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel",
            3,
        );
        let (ctx, _rx) = context(&recorder, temp.path(), false);

        let request = EnvRequest::new(EnvType::Venv, Some(ReqScheme::Plain));
        let err = create(&ctx, &request).await.unwrap_err();

        assert_eq!(err.command_exit_code(), Some(3));
        assert_eq!(
            recorder.attached(),
            vec![
                "python3 -m venv .venv",
                ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel",
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_missing_venv_is_a_notice() {
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, mut rx) = context(&recorder, temp.path(), false);

        let request = EnvRequest::new(EnvType::Venv, None);
        let result = remove(&ctx, &request).await.unwrap();

        assert!(result.report().commands.is_empty());
        let (progress, _) = drain(&mut rx);
        assert_eq!(
            progress,
            vec![
                "Removing Python venv at .venv...",
                "Good news!  There is no Python venv at .venv.",
                "Done.",
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_pyenv_dev_env() {
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        recorder.respond("pyenv prefix proj-dev", 0, "/root/.pyenv/versions/proj-dev\n");
        let (ctx, _rx) = context(&recorder, temp.path(), false);

        let mut request = EnvRequest::new(EnvType::Pyenv, Some(ReqScheme::Devplus));
        request.basename = Some("proj".to_string());
        remove(&ctx, &request).await.unwrap();

        assert_eq!(recorder.queries(), vec!["pyenv prefix proj-dev"]);
        assert_eq!(recorder.attached(), vec!["pyenv virtualenv-delete proj-dev"]);
    }

    #[tokio::test]
    async fn test_dry_run_remove_does_not_query_backends() {
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, _rx) = context(&recorder, temp.path(), true);

        let mut request = EnvRequest::new(EnvType::Conda, None);
        request.env_name = Some("scratch".to_string());
        let result = remove(&ctx, &request).await.unwrap();

        assert_eq!(
            result.report().commands,
            vec!["conda env remove --quiet -n scratch"]
        );
        assert!(recorder.queries().is_empty());
        assert!(recorder.attached().is_empty());
    }

    #[tokio::test]
    async fn test_real_run_spawns_what_dry_run_printed() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nname = \"my-pkg\"\nversion = \"1.4.0\"\n",
        )
        .unwrap();
        let mut request = EnvRequest::new(EnvType::Conda, Some(ReqScheme::Wheel));
        request.python_version = Some("3.12".to_string());

        let dry_recorder = Arc::new(Recorder::default());
        let (dry_ctx, mut dry_rx) = context(&dry_recorder, temp.path(), true);
        let printed = replace(&dry_ctx, &request).await.unwrap();
        assert!(dry_recorder.queries().is_empty());
        assert!(dry_recorder.attached().is_empty());

        let real_recorder = Arc::new(Recorder::default());
        real_recorder.respond(
            "conda env list",
            0,
            "# conda environments:\nbase  /opt/conda\nmy-pkg  /opt/conda/envs/my-pkg\n",
        );
        let (real_ctx, mut real_rx) = context(&real_recorder, temp.path(), false);
        let ran = replace(&real_ctx, &request).await.unwrap();

        assert!(!printed.report().commands.is_empty());
        assert_eq!(printed.report().commands, real_recorder.attached());
        assert_eq!(printed.report().commands, ran.report().commands);
        assert_eq!(
            printed.report().commands.first().map(String::as_str),
            Some("conda env remove --quiet -n my-pkg")
        );

        // conda announces its own environments
        for rx in [&mut dry_rx, &mut real_rx] {
            let (progress, _) = drain(rx);
            assert!(progress.iter().all(|line| !line.contains("reated ")));
        }
    }

    #[tokio::test]
    async fn test_dry_run_records_skipped_lookup_in_debug_log() {
        let temp = tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let (ctx, mut rx) = context(&recorder, temp.path(), true);

        let mut request = EnvRequest::new(EnvType::Pyenv, None);
        request.env_name = Some("scratch".to_string());
        remove(&ctx, &request).await.unwrap();

        let mut debug = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let AppEvent::General(GeneralEvent::Debug { message }) = message.event {
                debug.push(message);
            }
        }
        assert_eq!(debug, vec!["dry run: not asking pyenv whether scratch exists"]);
    }
}
