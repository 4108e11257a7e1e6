//! Runs embedded `PostgreSQL` lifecycle steps on behalf of a root test runner.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <config-path>
//! ```
//!
//! The file at `config-path` holds a JSON `WorkerPayload` from
//! `pg_embedded_setup_unpriv`: cluster settings plus environment overrides.
//! When started as root the worker switches to `nobody` before touching the
//! cluster, since `PostgreSQL` refuses to run as the superuser account.

#[cfg(unix)]
mod unix {
    use camino::{Utf8Path, Utf8PathBuf};
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use std::env;
    use std::ffi::CString;
    use std::io::Read;
    use thiserror::Error;

    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    const UNPRIVILEGED_USER: &str = "nobody";

    #[derive(Debug, Error)]
    pub enum WorkerError {
        #[error("invalid arguments: {0}")]
        InvalidArgs(String),
        #[error("failed to read worker config: {0}")]
        ConfigRead(#[source] BoxError),
        #[error("failed to parse worker config: {0}")]
        ConfigParse(#[source] serde_json::Error),
        #[error("settings conversion failed: {0}")]
        Settings(String),
        #[error("runtime init failed: {0}")]
        Runtime(#[source] std::io::Error),
        #[error("failed to drop privileges: {0}")]
        PrivilegeDrop(String),
        #[error("postgres operation failed: {0}")]
        Postgres(String),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Operation {
        Setup,
        Start,
        Stop,
    }

    impl Operation {
        pub fn parse(raw: &str) -> Result<Self, WorkerError> {
            match raw {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::InvalidArgs(format!(
                    "unknown operation '{other}'; expected setup, start, or stop"
                ))),
            }
        }
    }

    pub fn parse_args(
        mut args: impl Iterator<Item = String>,
    ) -> Result<(Operation, Utf8PathBuf), WorkerError> {
        let _program = args.next();
        let operation = args
            .next()
            .ok_or_else(|| WorkerError::InvalidArgs("missing operation argument".to_owned()))
            .and_then(|raw| Operation::parse(&raw))?;
        let config_path = args
            .next()
            .map(Utf8PathBuf::from)
            .ok_or_else(|| WorkerError::InvalidArgs("missing config path argument".to_owned()))?;
        if let Some(extra) = args.next() {
            return Err(WorkerError::InvalidArgs(format!(
                "unexpected extra argument: {extra}"
            )));
        }
        Ok((operation, config_path))
    }

    pub fn run() -> Result<(), WorkerError> {
        let args = env::args_os()
            .map(|arg| {
                arg.into_string()
                    .map_err(|_| WorkerError::InvalidArgs("argument is not valid UTF-8".to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let (operation, config_path) = parse_args(args.into_iter())?;
        let payload = load_payload(&config_path)?;
        drop_privileges_if_root()?;
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Runtime)?;
        apply_environment(&payload.environment);
        let mut postgres = PostgreSQL::new(settings);
        runtime.block_on(async {
            match operation {
                Operation::Setup => {
                    postgres.setup().await.map_err(postgres_error)?;
                    ensure_started(&mut postgres).await
                }
                Operation::Start => {
                    ensure_started(&mut postgres).await?;
                    // The server must outlive this process.
                    let _running = std::mem::ManuallyDrop::new(postgres);
                    Ok(())
                }
                Operation::Stop => postgres.stop().await.map_err(postgres_error),
            }
        })
    }

    fn load_payload(config_path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
        let (dir, relative) =
            ambient_dir_and_path(config_path).map_err(|err| WorkerError::ConfigRead(err.into()))?;
        let mut bytes = Vec::new();
        dir.open(relative.as_std_path())
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|err| WorkerError::ConfigRead(Box::new(err)))?;
        serde_json::from_slice(&bytes).map_err(WorkerError::ConfigParse)
    }

    fn drop_privileges_if_root() -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }

        let user = User::from_name(UNPRIVILEGED_USER)
            .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?
            .ok_or_else(|| {
                WorkerError::PrivilegeDrop(format!("user '{UNPRIVILEGED_USER}' not found"))
            })?;
        let name = CString::new(user.name.clone())
            .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
        initgroups(&name, user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
        setgid(user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
        setuid(user.uid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

        // SAFETY: no other threads exist yet.
        unsafe {
            env::set_var("HOME", &user.dir);
            env::set_var("USER", &user.name);
            env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: the runtime is single-threaded and has not spawned
            // anything yet.
            unsafe {
                match value {
                    Some(secret) => env::set_var(key, secret.expose()),
                    None => env::remove_var(key),
                }
            }
        }
    }

    fn postgres_error(err: impl std::fmt::Display) -> WorkerError {
        WorkerError::Postgres(err.to_string())
    }

    async fn ensure_started(postgres: &mut PostgreSQL) -> Result<(), WorkerError> {
        if matches!(postgres.status(), Status::Started) {
            return Ok(());
        }
        postgres.start().await.map_err(postgres_error)
    }

}

#[cfg(unix)]
fn main() -> Result<(), unix::BoxError> {
    unix::run().map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Err("pg_worker is only supported on Unix platforms".into())
}
