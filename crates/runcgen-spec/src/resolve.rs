//! Field resolution between a service definition and its exec state.
//!
//! Each function picks one effective value for an attribute both sources
//! can carry. All of them are total and side-effect free.

use std::collections::BTreeMap;

use runcgen_common::config::CompilerConfig;
use runcgen_common::constants::{DEFAULT_CWD, default_path_env};
use runcgen_common::types::Platform;
use runcgen_compose::ServiceDefinition;

use crate::exec::ExecState;

/// Variable name to optional value. `None` marks a variable that is
/// present without a value.
pub type Environment = BTreeMap<String, Option<String>>;

/// Effective process attributes for one service and platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedProcess {
    /// `KEY=VALUE` and bare `KEY` entries, one per variable.
    pub env: Vec<String>,
    /// Argument vector.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: String,
    /// User name; empty means the image default.
    pub user: String,
}

/// Resolves all overlapping process attributes at once.
#[must_use]
pub fn resolve(
    service: &ServiceDefinition,
    exec: &ExecState,
    platform: Option<&Platform>,
    config: &CompilerConfig,
) -> ResolvedProcess {
    let os = target_os(platform, exec, config);
    ResolvedProcess {
        env: environment(service, exec, os, config),
        args: command(service, exec).to_vec(),
        cwd: working_dir(service, exec).to_string(),
        user: user(service, exec).to_string(),
    }
}

/// Picks the OS whose defaults apply: the configuration's tag, then the
/// platform recorded in the exec state, then the configured default.
#[must_use]
pub fn target_os<'a>(
    platform: Option<&'a Platform>,
    exec: &'a ExecState,
    config: &'a CompilerConfig,
) -> &'a str {
    platform
        .or(exec.platform.as_ref())
        .map_or(config.default_os.as_str(), Platform::os)
}

/// Merges the exec-state environment with the service overrides and the
/// synthesized `TERM`, `PATH` and `HOSTNAME` defaults.
///
/// Service entries replace exec-state entries of the same name, valued or
/// not. Defaults are added only for names still absent afterwards.
#[must_use]
pub fn merge_environment(
    service: &ServiceDefinition,
    exec: &ExecState,
    os: &str,
    config: &CompilerConfig,
) -> Environment {
    let mut env: Environment = exec
        .env
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (entry.clone(), None),
        })
        .collect();

    env.extend(
        service
            .environment
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    if service.tty {
        let _ = env
            .entry("TERM".to_string())
            .or_insert_with(|| Some(config.terminal.clone()));
    }
    if let Some(path) = default_path_env(os) {
        let _ = env
            .entry("PATH".to_string())
            .or_insert_with(|| Some(path.to_string()));
    }
    let _ = env
        .entry("HOSTNAME".to_string())
        .or_insert_with(|| Some(service.hostname.clone()));

    env
}

/// Renders a merged environment as `KEY=VALUE` / `KEY` entries, sorted by key.
#[must_use]
pub fn render_environment(env: &Environment) -> Vec<String> {
    env.iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{key}={value}"),
            None => key.clone(),
        })
        .collect()
}

/// Effective environment entries for a service.
#[must_use]
pub fn environment(
    service: &ServiceDefinition,
    exec: &ExecState,
    os: &str,
    config: &CompilerConfig,
) -> Vec<String> {
    render_environment(&merge_environment(service, exec, os, config))
}

/// The service command if it has any tokens, otherwise the exec-state
/// command. Tokens are never merged.
#[must_use]
pub fn command<'a>(service: &'a ServiceDefinition, exec: &'a ExecState) -> &'a [String] {
    if service.command.is_empty() {
        &exec.cmd
    } else {
        &service.command
    }
}

/// The first non-empty working directory, falling back to `/`.
#[must_use]
pub fn working_dir<'a>(service: &'a ServiceDefinition, exec: &'a ExecState) -> &'a str {
    [service.working_dir.as_str(), exec.working_dir.as_str()]
        .into_iter()
        .find(|dir| !dir.is_empty())
        .unwrap_or(DEFAULT_CWD)
}

/// The service user if set, otherwise the exec-state user (possibly empty).
#[must_use]
pub fn user<'a>(service: &'a ServiceDefinition, exec: &'a ExecState) -> &'a str {
    if service.user.is_empty() {
        &exec.user
    } else {
        &service.user
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use runcgen_common::constants::DEFAULT_UNIX_PATH_ENV;

    use super::*;

    fn exec_with_env(env: &[&str]) -> ExecState {
        ExecState {
            env: env.iter().map(|e| (*e).to_string()).collect(),
            ..ExecState::default()
        }
    }

    fn service_with_env(env: &[(&str, Option<&str>)]) -> ServiceDefinition {
        ServiceDefinition {
            environment: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
                .collect(),
            hostname: "web-1".into(),
            ..ServiceDefinition::new("web")
        }
    }

    fn as_set(env: &[String]) -> HashSet<&str> {
        env.iter().map(String::as_str).collect()
    }

    #[test]
    fn service_environment_overlays_exec_state() {
        let exec = exec_with_env(&["A=1", "B=2"]);
        let service = service_with_env(&[("B", Some("3")), ("C", Some("4"))]);
        let env = merge_environment(&service, &exec, "linux", &CompilerConfig::default());

        assert_eq!(env.get("A"), Some(&Some("1".to_string())));
        assert_eq!(env.get("B"), Some(&Some("3".to_string())));
        assert_eq!(env.get("C"), Some(&Some("4".to_string())));
    }

    #[test]
    fn overlay_with_defaults_as_set() {
        let exec = exec_with_env(&["A=1", "B=2"]);
        let service = service_with_env(&[("B", Some("3")), ("C", Some("4"))]);
        let env = environment(&service, &exec, "linux", &CompilerConfig::default());
        let expected_path = format!("PATH={DEFAULT_UNIX_PATH_ENV}");

        assert_eq!(
            as_set(&env),
            HashSet::from(["A=1", "B=3", "C=4", "HOSTNAME=web-1", expected_path.as_str()])
        );
    }

    #[test]
    fn valueless_entries_survive_and_can_be_overridden() {
        let exec = exec_with_env(&["KEEP", "DROP", "EQ=a=b"]);
        let service = service_with_env(&[("DROP", Some("now")), ("BARE", None)]);
        let env = environment(&service, &exec, "linux", &CompilerConfig::default());
        let set = as_set(&env);

        assert!(set.contains("KEEP"));
        assert!(set.contains("DROP=now"));
        assert!(set.contains("BARE"));
        assert!(set.contains("EQ=a=b"));
        assert!(!set.contains("DROP"));
    }

    #[test]
    fn service_can_clear_value_of_exec_variable() {
        let exec = exec_with_env(&["TOKEN=secret"]);
        let service = service_with_env(&[("TOKEN", None)]);
        let env = environment(&service, &exec, "linux", &CompilerConfig::default());
        assert!(as_set(&env).contains("TOKEN"));
        assert!(!env.iter().any(|e| e.starts_with("TOKEN=")));
    }

    #[test]
    fn no_duplicate_names() {
        let exec = exec_with_env(&["A=1", "A=2", "PATH=/bin"]);
        let service = service_with_env(&[("A", Some("3"))]);
        let env = environment(&service, &exec, "linux", &CompilerConfig::default());
        let names: Vec<&str> = env
            .iter()
            .map(|e| e.split_once('=').map_or(e.as_str(), |(k, _)| k))
            .collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert!(as_set(&env).contains("A=3"));
        assert!(as_set(&env).contains("PATH=/bin"));
    }

    #[test]
    fn term_injected_only_for_tty() {
        let config = CompilerConfig::default();
        let mut service = service_with_env(&[]);
        let env = merge_environment(&service, &ExecState::default(), "linux", &config);
        assert!(!env.contains_key("TERM"));

        service.tty = true;
        let env = merge_environment(&service, &ExecState::default(), "linux", &config);
        assert_eq!(env.get("TERM"), Some(&Some("xterm".to_string())));
    }

    #[test]
    fn term_default_is_not_destructive() {
        let mut service = service_with_env(&[]);
        service.tty = true;
        let exec = exec_with_env(&["TERM=vt100"]);
        let env = merge_environment(&service, &exec, "linux", &CompilerConfig::default());
        assert_eq!(env.get("TERM"), Some(&Some("vt100".to_string())));
    }

    #[test]
    fn valueless_path_and_hostname_are_kept() {
        let exec = exec_with_env(&["PATH", "HOSTNAME"]);
        let env = merge_environment(
            &service_with_env(&[]),
            &exec,
            "linux",
            &CompilerConfig::default(),
        );
        assert_eq!(env.get("PATH"), Some(&None));
        assert_eq!(env.get("HOSTNAME"), Some(&None));
    }

    #[test]
    fn configured_terminal_is_used() {
        let config = CompilerConfig {
            terminal: "screen".into(),
            ..CompilerConfig::default()
        };
        let mut service = service_with_env(&[]);
        service.tty = true;
        let env = merge_environment(&service, &ExecState::default(), "linux", &config);
        assert_eq!(env.get("TERM"), Some(&Some("screen".to_string())));
    }

    #[test]
    fn windows_gets_no_default_path() {
        let env = merge_environment(
            &service_with_env(&[]),
            &ExecState::default(),
            "windows",
            &CompilerConfig::default(),
        );
        assert!(!env.contains_key("PATH"));
        assert!(env.contains_key("HOSTNAME"));
    }

    #[test]
    fn target_os_prefers_tag_then_exec_state() {
        let config = CompilerConfig::default();
        let tag = Platform::parse("windows/amd64");
        let exec = ExecState {
            platform: Some(Platform::parse("freebsd/amd64")),
            ..ExecState::default()
        };
        assert_eq!(target_os(Some(&tag), &exec, &config), "windows");
        assert_eq!(target_os(None, &exec, &config), "freebsd");
        assert_eq!(target_os(None, &ExecState::default(), &config), "linux");
    }

    #[test]
    fn command_is_all_or_nothing() {
        let exec = ExecState {
            cmd: vec!["/bin/sh".into()],
            ..ExecState::default()
        };
        let mut service = ServiceDefinition::new("web");
        service.command = vec!["echo".into(), "hi".into()];
        assert_eq!(command(&service, &exec), ["echo", "hi"]);

        service.command.clear();
        assert_eq!(command(&service, &exec), ["/bin/sh"]);
    }

    #[test]
    fn command_may_resolve_to_empty() {
        let service = ServiceDefinition::new("web");
        assert!(command(&service, &ExecState::default()).is_empty());
    }

    #[test]
    fn working_dir_precedence() {
        let mut service = ServiceDefinition::new("web");
        let mut exec = ExecState::default();
        assert_eq!(working_dir(&service, &exec), "/");

        exec.working_dir = "/srv".into();
        assert_eq!(working_dir(&service, &exec), "/srv");

        service.working_dir = "/app".into();
        assert_eq!(working_dir(&service, &exec), "/app");
    }

    #[test]
    fn user_precedence() {
        let mut service = ServiceDefinition::new("web");
        let mut exec = ExecState::default();
        assert_eq!(user(&service, &exec), "");

        exec.user = "nobody".into();
        assert_eq!(user(&service, &exec), "nobody");

        service.user = "1000:1000".into();
        assert_eq!(user(&service, &exec), "1000:1000");
    }

    #[test]
    fn resolve_combines_all_fields() {
        let exec = ExecState {
            env: vec!["A=1".into()],
            cmd: vec!["run".into()],
            working_dir: "/srv".into(),
            user: "app".into(),
            platform: None,
        };
        let service = service_with_env(&[]);
        let resolved = resolve(&service, &exec, None, &CompilerConfig::default());
        assert_eq!(resolved.args, vec!["run"]);
        assert_eq!(resolved.cwd, "/srv");
        assert_eq!(resolved.user, "app");
        assert!(as_set(&resolved.env).contains("A=1"));
    }
}
