//! System-wide constants and OS-dependent defaults.

/// Search path injected as `PATH` on unix-like platforms.
pub const DEFAULT_UNIX_PATH_ENV: &str =
    "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Operating system assumed when no platform tag says otherwise.
pub const DEFAULT_OS: &str = "linux";

/// Value injected as `TERM` for services that request a TTY.
pub const DEFAULT_TERMINAL: &str = "xterm";

/// Working directory used when neither source sets one.
pub const DEFAULT_CWD: &str = "/";

/// Platform segment of a spec key whose configuration carries no tag.
pub const DEFAULT_PLATFORM_SEGMENT: &str = "default";

/// Label carrying the owning project's name.
pub const PROJECT_LABEL: &str = "io.compose-spec.project";

/// Label carrying the service name.
pub const SERVICE_LABEL: &str = "io.compose-spec.service";

/// Sysctl key holding the container's NIS domain name.
pub const DOMAINNAME_SYSCTL: &str = "kernel.domainname";

/// Version of the OCI runtime specification emitted by the builder.
pub const OCI_VERSION: &str = "1.0.2";

/// Returns the canonical default search path for an operating system.
///
/// Windows has no default; every other OS gets the unix path.
#[must_use]
pub fn default_path_env(os: &str) -> Option<&'static str> {
    if os.eq_ignore_ascii_case("windows") {
        None
    } else {
        Some(DEFAULT_UNIX_PATH_ENV)
    }
}
