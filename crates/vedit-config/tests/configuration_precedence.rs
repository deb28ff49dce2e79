//! Layering tests for [`vedit_config::Config`].

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use vedit_config::{Config, LogFormat};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serialises environment mutation and restores prior values on drop.
struct EnvScope {
    previous: Vec<(&'static str, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvScope {
    fn new() -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            previous: Vec::new(),
            _guard: guard,
        }
    }

    fn set(&mut self, key: &'static str, value: impl AsRef<OsStr>) {
        self.previous.push((key, std::env::var_os(key)));
        // Environment mutation is unsafe on edition 2024; access is
        // serialised by `ENV_MUTEX` and undone in `Drop`.
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, value)) = self.previous.pop() {
            match value {
                Some(value) => unsafe { std::env::set_var(key, value) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

struct Harness {
    dir: TempDir,
}

impl Harness {
    fn write_config(&self, body: &str) -> PathBuf {
        let path = self.dir.path().join("vedit.toml");
        fs::write(&path, body).expect("write configuration");
        path
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        dir: TempDir::new().expect("create temp dir"),
    }
}

fn args(extra: &[&OsStr]) -> Vec<OsString> {
    let mut args = vec![OsString::from("vedit")];
    args.extend(extra.iter().map(|arg| arg.to_os_string()));
    args
}

#[rstest]
fn file_values_override_defaults(harness: Harness) {
    let _env = EnvScope::new();
    let path = harness.write_config(
        "editor = \"nano\"\nlog_format = \"json\"\nshellcheck_severity = \"warning\"\n",
    );

    let config = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        path.as_os_str(),
    ]))
    .expect("configuration loads");

    assert_eq!(config.editor(), Some("nano"));
    assert_eq!(config.log_format(), LogFormat::Json);
    assert_eq!(config.shellcheck_severity(), "warning");
    assert_eq!(config.shellcheck_shell(), "bash");
}

#[rstest]
fn environment_overrides_file(harness: Harness) {
    let mut env = EnvScope::new();
    let path = harness.write_config("editor = \"nano\"\n");
    env.set("VEDIT_EDITOR", "vim");

    let config = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        path.as_os_str(),
    ]))
    .expect("configuration loads");

    assert_eq!(config.editor(), Some("vim"));
}

#[rstest]
fn cli_flags_override_environment(harness: Harness) {
    let mut env = EnvScope::new();
    let path = harness.write_config("log_filter = \"trace\"\n");
    env.set("VEDIT_LOG_FILTER", "info");

    let config = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        path.as_os_str(),
        OsStr::new("--log-filter"),
        OsStr::new("debug"),
    ]))
    .expect("configuration loads");

    assert_eq!(config.log_filter(), "debug");
}

#[rstest]
fn malformed_file_is_reported(harness: Harness) {
    let _env = EnvScope::new();
    let path = harness.write_config("log_format = [not toml\n");

    let result = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        path.as_os_str(),
    ]));

    assert!(result.is_err(), "malformed configuration must not load");
}
