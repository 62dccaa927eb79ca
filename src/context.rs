//! Seam between the client and the application hosting it.
//!
//! A host integration supplies the connection settings and describes who
//! and where the application is; the client itself never looks at a
//! specific framework.

use crate::settings::{ConfigError, Settings};

/// Configuration and identity provided by the host application.
pub trait HostContext {
    fn settings(&self) -> Result<Settings, ConfigError>;

    /// Name of the machine or virtual host serving the application.
    fn host_name(&self) -> String;

    /// Identity of the current user.
    fn username(&self) -> String;
}

/// Context for command-line and background processes.
///
/// Settings come from `APPENLIGHT_*` variables and the user is always
/// `console`. The host name is taken from `HOSTNAME`/`COMPUTERNAME` when
/// exported, otherwise from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleContext;

impl HostContext for ConsoleContext {
    fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::from_env()
    }

    fn host_name(&self) -> String {
        host_name_from(|key| std::env::var(key).ok(), system_host_name)
    }

    fn username(&self) -> String {
        "console".to_string()
    }
}

fn host_name_from<F, S>(get_env: F, system: S) -> String
where
    F: Fn(&str) -> Option<String>,
    S: FnOnce() -> Option<String>,
{
    ["HOSTNAME", "COMPUTERNAME"]
        .into_iter()
        .filter_map(|key| get_env(key))
        .find(|v| !v.is_empty())
        .or_else(|| system().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| {
            tracing::warn!("[appenlight] could not determine host name, using 'localhost'");
            "localhost".to_string()
        })
}

#[cfg(unix)]
fn system_host_name() -> Option<String> {
    match nix::unistd::gethostname() {
        Ok(name) => name.into_string().ok(),
        Err(e) => {
            tracing::warn!("[appenlight] gethostname failed: {e}");
            None
        }
    }
}

#[cfg(not(unix))]
fn system_host_name() -> Option<String> {
    None
}
