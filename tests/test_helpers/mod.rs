//! Environment guards and `pg_worker` discovery for integration tests.

use camino::Utf8PathBuf;
use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

const WORKER_BINARY: &str = "pg_worker";

/// Applies environment variable changes until dropped, then restores the
/// previous values.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets (or removes, for `None`) every listed variable.
    pub fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = changes
            .iter()
            .map(|(key, value)| {
                let old = env::var_os(key);
                // SAFETY: ENV_MUTEX serializes environment mutation in tests.
                unsafe {
                    match value {
                        Some(new_value) => env::set_var(key, new_value),
                        None => env::remove_var(key),
                    }
                }
                (key.clone(), old)
            })
            .collect();

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: the guard still holds ENV_MUTEX.
            unsafe {
                match value {
                    Some(old) => env::set_var(&key, &old),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

/// Finds the `pg_worker` binary built alongside the test target.
pub fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    env::var_os("CARGO_BIN_EXE_pg_worker")
        .and_then(|path| utf8_path(&path))
        .or_else(worker_from_env)
        .or_else(worker_near_target)
        .or_else(worker_in_path)
}

fn worker_from_env() -> Option<Utf8PathBuf> {
    let configured = utf8_path(&env::var_os("PG_EMBEDDED_WORKER")?)?;
    (configured.file_stem() == Some(WORKER_BINARY) && configured.is_file()).then_some(configured)
}

fn worker_near_target() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe_path = utf8_path(exe.as_os_str())?;
    let candidate = exe_path.parent()?.parent()?.join(WORKER_BINARY);
    candidate.is_file().then_some(candidate)
}

fn worker_in_path() -> Option<Utf8PathBuf> {
    let search = env::var_os("PATH")?;
    env::split_paths(&search)
        .filter_map(|dir| utf8_path(dir.as_os_str()))
        .map(|dir| dir.join(WORKER_BINARY))
        .find(|candidate| candidate.is_file())
}

fn utf8_path(value: &OsStr) -> Option<Utf8PathBuf> {
    value.to_os_string().into_string().ok().map(Utf8PathBuf::from)
}
