//! Reconciles bootstrap settings with what the server wrote to disk.

use super::BoxError;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;

/// Adopts the password persisted by an earlier setup, if any.
pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let lossy = settings.password_file.to_string_lossy();
    let password_file = Utf8Path::new(lossy.as_ref());
    let (Some(parent), Some(file_name)) = (password_file.parent(), password_file.file_name())
    else {
        return Ok(());
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Box::new(err)),
    }
}

/// Reads the listening port from `postmaster.pid` (fourth line).
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let lossy = settings.data_dir.to_string_lossy();
    let data_dir = Dir::open_ambient_dir(Utf8Path::new(lossy.as_ref()), ambient_authority())?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(Box::new(err)),
    };

    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
