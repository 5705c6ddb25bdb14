//! Integration tests for error types

#[cfg(test)]
mod tests {
    use pyvenv_errors::*;

    #[test]
    fn test_error_conversion() {
        let env_err = EnvError::Exists {
            name: "/work/.venv".into(),
        };
        let err: Error = env_err.into();
        assert!(matches!(err, Error::Env(_)));
    }

    #[test]
    fn test_error_display() {
        let err = EnvError::Occluded {
            path: "/work/.venv".into(),
        };
        assert_eq!(
            err.to_string(),
            "/work/.venv exists, but is not a directory; you must deal with it by hand."
        );
    }

    #[test]
    fn test_domain_messages_pass_through() {
        let err: Error = RequirementsError::MissingFiles {
            files: vec!["requirements.txt".into(), "dev/requirements_test.txt".into()],
        }
        .into();
        assert_eq!(
            err.user_message(),
            "Missing requirements files: requirements.txt, dev/requirements_test.txt"
        );
        assert_eq!(err.user_code(), Some("requirements.missing_files"));
    }

    #[test]
    fn test_config_errors_are_prefixed() {
        let err: Error = ConfigError::NotFound {
            path: "/etc/python-venv.toml".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "config error: config file not found: /etc/python-venv.toml"
        );
    }

    #[test]
    fn test_only_command_failures_carry_exit_codes() {
        let failed: Error = PlatformError::CommandFailed {
            command: "pyenv virtualenv foo".into(),
            code: 127,
        }
        .into();
        let missing: Error = PlatformError::CommandNotFound {
            command: "pyenv".into(),
        }
        .into();
        assert_eq!(failed.command_exit_code(), Some(127));
        assert_eq!(missing.command_exit_code(), None);
        assert!(missing.user_hint().is_some());
    }
}
