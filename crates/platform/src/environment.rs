//! Child-process environment cleaning
//!
//! When the tool itself runs inside an activated virtual environment, the
//! activation leaks into every command we spawn: `python3` would resolve to
//! the active environment's interpreter and new environments would be
//! derived from it. We strip the activation before spawning anything.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A full child-process environment. Keys and values may be any bytes the OS
/// allows, so nothing here assumes UTF-8.
pub type EnvMap = BTreeMap<OsString, OsString>;

/// Variables pointing at an active environment prefix.
const PREFIX_VARS: &[&str] = &["VIRTUAL_ENV", "CONDA_PREFIX"];

/// Variables removed outright.
const REMOVED_VARS: &[&str] = &[
    "PYTHONHOME",
    "VIRTUAL_ENV",
    "CONDA_DEFAULT_ENV",
    "CONDA_PREFIX",
];

/// Return `vars` with virtual environment activation removed.
///
/// `PATH` loses the active environments' `bin` directories and
/// `PYTHONPATH` loses their `site-packages` directories.
#[must_use]
pub fn clean_environment<I, K, V>(vars: I) -> EnvMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut env: EnvMap = vars
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();

    let prefixes: Vec<PathBuf> = PREFIX_VARS
        .iter()
        .filter_map(|var| env.get(OsStr::new(var)))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .collect();

    if let Some(path) = env.get_mut(OsStr::new("PATH")) {
        *path = filter_search_path(path, |entry| {
            prefixes.iter().any(|prefix| entry == prefix.join("bin"))
        });
    }

    if let Some(pythonpath) = env.get_mut(OsStr::new("PYTHONPATH")) {
        *pythonpath = filter_search_path(pythonpath, |entry| {
            prefixes.iter().any(|prefix| is_site_packages_of(entry, prefix))
        });
    }

    for var in REMOVED_VARS {
        env.remove(OsStr::new(var));
    }

    env
}

/// The current process environment, cleaned.
#[must_use]
pub fn clean_process_environment() -> EnvMap {
    clean_environment(std::env::vars_os())
}

fn filter_search_path(value: &OsStr, mut drop: impl FnMut(&Path) -> bool) -> OsString {
    let kept: Vec<PathBuf> = std::env::split_paths(value)
        .filter(|entry| !drop(entry))
        .collect();
    // Entries came out of split_paths, so they hold no separator
    std::env::join_paths(kept).unwrap_or_else(|_| value.to_os_string())
}

/// `<prefix>/lib/python<X.Y>/site-packages`
fn is_site_packages_of(entry: &Path, prefix: &Path) -> bool {
    let Ok(rest) = entry.strip_prefix(prefix.join("lib")) else {
        return false;
    };
    let mut parts = rest.components();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(version), Some(site), None) => {
            version.as_os_str().to_string_lossy().starts_with("python")
                && site.as_os_str() == "site-packages"
        }
        _ => false,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn get<'a>(env: &'a EnvMap, key: &str) -> &'a OsStr {
        &env[OsStr::new(key)]
    }

    fn has(env: &EnvMap, key: &str) -> bool {
        env.contains_key(OsStr::new(key))
    }

    #[test]
    fn strips_active_venv_from_path() {
        let env = clean_environment(vars(&[
            ("VIRTUAL_ENV", "/work/proj/.venv"),
            ("PATH", "/work/proj/.venv/bin:/usr/local/bin:/usr/bin"),
            ("HOME", "/home/me"),
        ]));
        assert_eq!(get(&env, "PATH"), "/usr/local/bin:/usr/bin");
        assert!(!has(&env, "VIRTUAL_ENV"));
        assert_eq!(get(&env, "HOME"), "/home/me");
    }

    #[test]
    fn strips_conda_activation() {
        let env = clean_environment(vars(&[
            ("CONDA_PREFIX", "/opt/conda/envs/demo"),
            ("CONDA_DEFAULT_ENV", "demo"),
            ("PATH", "/opt/conda/envs/demo/bin:/opt/conda/bin:/usr/bin"),
            (
                "PYTHONPATH",
                "/opt/conda/envs/demo/lib/python3.11/site-packages:/src",
            ),
        ]));
        assert_eq!(get(&env, "PATH"), "/opt/conda/bin:/usr/bin");
        assert_eq!(get(&env, "PYTHONPATH"), "/src");
        assert!(!has(&env, "CONDA_PREFIX"));
        assert!(!has(&env, "CONDA_DEFAULT_ENV"));
    }

    #[test]
    fn leaves_unactivated_environment_alone() {
        let env = clean_environment(vars(&[("PATH", "/usr/bin:/bin"), ("PYTHONHOME", "/x")]));
        assert_eq!(get(&env, "PATH"), "/usr/bin:/bin");
        assert!(!has(&env, "PYTHONHOME"));
    }

    #[test]
    fn keeps_non_utf8_variables() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff\xfe");
        let env = clean_environment([
            (OsString::from("RAW_BYTES"), raw.to_os_string()),
            (OsString::from("VIRTUAL_ENV"), OsString::from("/p/.venv")),
            (
                OsString::from("PATH"),
                OsString::from("/p/.venv/bin:/usr/bin"),
            ),
        ]);
        assert_eq!(get(&env, "RAW_BYTES"), raw);
        assert_eq!(get(&env, "PATH"), "/usr/bin");
        assert!(!has(&env, "VIRTUAL_ENV"));
    }

    #[test]
    fn site_packages_match_is_exact() {
        let prefix = Path::new("/opt/env");
        assert!(is_site_packages_of(
            Path::new("/opt/env/lib/python3.12/site-packages"),
            prefix
        ));
        assert!(!is_site_packages_of(
            Path::new("/opt/env/lib/python3.12/site-packages/extra"),
            prefix
        ));
        assert!(!is_site_packages_of(Path::new("/opt/other/lib/python3.12/site-packages"), prefix));
    }
}
