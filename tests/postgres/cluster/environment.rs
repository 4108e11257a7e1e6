//! Environment preparation for cluster bootstrap.

use super::BoxError;
use crate::test_helpers::locate_pg_worker_path;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::OsString;
use std::net::TcpListener;
use std::sync::OnceLock;

static PREPARED_WORKER: OnceLock<Utf8PathBuf> = OnceLock::new();

pub(super) fn to_os_pairs(
    env_vars: &[(String, Option<String>)],
) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Variables to set while `bootstrap_for_tests` reads its configuration: a
/// free port unless `PG_PORT` is pinned, and a worker path for root runs.
pub(super) fn bootstrap_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if std::env::var_os("PG_PORT").is_none() {
        changes.push((OsString::from("PG_PORT"), Some(free_port()?)));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker = locate_pg_worker_path().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set and the pg_worker binary was not found",
            )) as BoxError
        })?;
        let prepared = prepare_worker(&worker)?;
        changes.push((
            OsString::from("PG_EMBEDDED_WORKER"),
            Some(OsString::from(prepared.as_str())),
        ));
    }
    Ok(changes)
}

fn free_port() -> Result<OsString, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    Ok(OsString::from(port.to_string()))
}

/// Copies the worker into the temp directory with world-executable
/// permissions so the demoted `nobody` user can run it.
fn prepare_worker(worker: &Utf8Path) -> Result<Utf8PathBuf, BoxError> {
    if let Some(prepared) = PREPARED_WORKER.get() {
        return Ok(prepared.clone());
    }

    let temp_dir = Utf8PathBuf::try_from(std::env::temp_dir())?;
    let file_name = format!("pg_worker_tasktrack_{}", std::process::id());
    let source_dir = Dir::open_ambient_dir(
        worker.parent().unwrap_or_else(|| Utf8Path::new(".")),
        ambient_authority(),
    )?;
    let source_name = worker.file_name().ok_or_else(|| {
        Box::new(std::io::Error::other("worker path must include a file name")) as BoxError
    })?;
    let destination_dir = Dir::open_ambient_dir(&temp_dir, ambient_authority())?;

    match destination_dir.remove_file(&file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(Box::new(err)),
    }
    source_dir.copy(source_name, &destination_dir, &file_name)?;
    #[cfg(unix)]
    {
        use cap_std::fs::{Permissions, PermissionsExt};
        destination_dir.set_permissions(&file_name, Permissions::from_mode(0o755))?;
    }

    Ok(PREPARED_WORKER
        .get_or_init(|| temp_dir.join(file_name))
        .clone())
}
