use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::error::Error;
use crate::resources::{BootKind, BootResource};
use crate::util::{shell_escape_json, shell_quote};

/// Options to configure how the cluster CLI is invoked.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Config {
    /// Name of the cluster CLI binary.  Defaults to "oc".
    #[clap(
        long = "oc-command",
        value_parser,
        default_value = "oc",
        env = "OC_CMD"
    )]
    pub oc: String,

    /// Namespace to operate in.  If not given, the CLI's current project is
    /// used.
    #[clap(short = 'n', long = "namespace", value_parser, env = "OC_NAMESPACE")]
    pub namespace: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oc: "oc".to_owned(),
            namespace: None,
        }
    }
}

impl Config {
    fn oc(&self) -> Command {
        let mut cmd = Command::new(&self.oc);
        cmd.kill_on_drop(true);
        if let Some(namespace) = &self.namespace {
            cmd.args(["-n", namespace]);
        }
        cmd
    }

    /// The binary and global flags, as they appear in a command line.
    fn prefix(&self) -> String {
        let oc = shell_quote(&self.oc);
        match &self.namespace {
            Some(namespace) => format!("{oc} -n {namespace}", namespace = shell_quote(namespace)),
            None => oc,
        }
    }
}

/// A single call to the cluster CLI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// `oc create -f -`, with the manifest on stdin.
    Create(BootResource),
    /// `oc replace -f -`, with the manifest on stdin.
    Replace(BootResource),
    /// `oc delete TYPE NAME`.
    Delete { rtype: String, name: String },
}

impl Invocation {
    /// Delete a boot by name.
    pub fn delete(kind: BootKind, name: String) -> Self {
        Self::Delete {
            rtype: kind.resource_type(),
            name,
        }
    }

    /// Name of the boot this touches.
    pub fn name(&self) -> &str {
        match self {
            Self::Create(boot) | Self::Replace(boot) => boot.name(),
            Self::Delete { name, .. } => name,
        }
    }

    /// The manifest piped to the CLI, if any.
    pub fn manifest(&self) -> Option<&BootResource> {
        match self {
            Self::Create(boot) | Self::Replace(boot) => Some(boot),
            Self::Delete { .. } => None,
        }
    }

    /// Subcommand and arguments.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Create(_) => vec!["create".to_owned(), "-f".to_owned(), "-".to_owned()],
            Self::Replace(_) => vec!["replace".to_owned(), "-f".to_owned(), "-".to_owned()],
            Self::Delete { rtype, name } => vec!["delete".to_owned(), rtype.clone(), name.clone()],
        }
    }

    /// The equivalent shell command line, for display.  Manifests are shown
    /// as an escaped `echo` piped into the CLI.
    pub fn command_line(&self, config: &Config) -> Result<String, Error> {
        let cmd = format!(
            "{prefix} {args}",
            prefix = config.prefix(),
            args = self
                .args()
                .iter()
                .map(|arg| shell_quote(arg))
                .collect::<Vec<_>>()
                .join(" ")
        );

        match self.manifest() {
            Some(boot) => Ok(format!(
                "echo {json} | {cmd}",
                json = shell_escape_json(&boot.to_json_string()?)
            )),
            None => Ok(cmd),
        }
    }
}

/// Run the CLI and wait for it to exit.  Its stdout and stderr are inherited.
///
/// The exit status is returned but a failing CLI is not an error: only
/// failing to start it, or to talk to it, is.
pub async fn run(config: &Config, invocation: &Invocation) -> Result<ExitStatus, Error> {
    let manifest = match invocation.manifest() {
        Some(boot) => Some(boot.to_json_string()?),
        None => None,
    };

    let mut cmd = config.oc();
    cmd.args(invocation.args());
    cmd.stdin(if manifest.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn().map_err(|error| Error::Spawn {
        command: config.oc.clone(),
        error,
    })?;

    if let (Some(json), Some(mut stdin)) = (manifest, child.stdin.take()) {
        write_manifest(&mut stdin, &json).await?;
    }

    let exit_status = child.wait().await?;
    Ok(exit_status)
}

///////////////////////////////////////////////////////////////////////////////

/// Write the manifest and a trailing newline, then close the pipe.  A CLI
/// which exits without reading it is left to report that itself.
async fn write_manifest(stdin: &mut ChildStdin, json: &str) -> Result<(), Error> {
    let written = async {
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.shutdown().await
    }
    .await;

    match written {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::BrokenPipe => {
            tracing::debug!(?error, "cluster CLI closed stdin early");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Workload;

    fn java(suffix: i64) -> BootResource {
        Workload::new(BootKind::Java).boot(suffix)
    }

    #[test]
    fn args_per_subcommand() {
        assert_eq!(Invocation::Create(java(0)).args(), ["create", "-f", "-"]);
        assert_eq!(Invocation::Replace(java(0)).args(), ["replace", "-f", "-"]);
        assert_eq!(
            Invocation::delete(BootKind::Java, "demo-boot-java5".to_owned()).args(),
            ["delete", "javaboot", "demo-boot-java5"]
        );
    }

    #[test]
    fn create_command_line_matches_echo_pipeline() {
        let line = Invocation::Create(java(3))
            .command_line(&Config::default())
            .unwrap();

        assert_eq!(
            line,
            r#"echo \{\"apiVersion\":\"app.logancloud.com/v1\",\"kind\":\"JavaBoot\",\"metadata\":\{\"name\":\"demo-boot-java3\"\},\"spec\":\{\"image\":\"logan/logan-startkit-java\",\"version\":\"latest\",\"replicas\":0\}\} | oc create -f -"#
        );
    }

    #[test]
    fn replace_command_line_ends_with_replace() {
        let line = Invocation::Replace(java(1))
            .command_line(&Config::default())
            .unwrap();

        assert!(line.starts_with("echo \\{"));
        assert!(line.ends_with("\\} | oc replace -f -"));
    }

    #[test]
    fn delete_command_line_has_no_manifest() {
        let invocation = Invocation::delete(BootKind::NodeJS, "demo-boot-nodejs2".to_owned());

        assert_eq!(invocation.manifest(), None);
        assert_eq!(invocation.name(), "demo-boot-nodejs2");
        assert_eq!(
            invocation.command_line(&Config::default()).unwrap(),
            "oc delete nodejsboot demo-boot-nodejs2"
        );
    }

    #[test]
    fn command_line_uses_configured_binary_and_namespace() {
        let config = Config {
            oc: "/usr/local/bin/kubectl".to_owned(),
            namespace: Some("bench".to_owned()),
        };
        let invocation = Invocation::delete(BootKind::Java, "demo-boot-java10".to_owned());

        assert_eq!(
            invocation.command_line(&config).unwrap(),
            "/usr/local/bin/kubectl -n bench delete javaboot demo-boot-java10"
        );
    }

    #[test]
    fn command_line_quotes_binary_with_spaces() {
        let config = Config {
            oc: "/opt/cluster tools/oc".to_owned(),
            namespace: Some("load test".to_owned()),
        };
        let invocation = Invocation::delete(BootKind::Java, "demo-boot-java10".to_owned());

        assert_eq!(
            invocation.command_line(&config).unwrap(),
            "'/opt/cluster tools/oc' -n 'load test' delete javaboot demo-boot-java10"
        );

        let line = Invocation::Create(java(0)).command_line(&config).unwrap();
        assert!(line.ends_with(" | '/opt/cluster tools/oc' -n 'load test' create -f -"));
    }

    #[tokio::test]
    async fn run_reports_exit_status_without_failing() {
        let ok = Config {
            oc: "true".to_owned(),
            namespace: None,
        };
        let status = run(&ok, &Invocation::Create(java(0))).await.unwrap();
        assert!(status.success());

        let failing = Config {
            oc: "false".to_owned(),
            namespace: Some("bench".to_owned()),
        };
        let status = run(&failing, &Invocation::Replace(java(0))).await.unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    async fn run_without_stdin_for_delete() {
        let config = Config {
            oc: "true".to_owned(),
            namespace: None,
        };
        let invocation = Invocation::delete(BootKind::Java, "demo-boot-java0".to_owned());

        assert!(run(&config, &invocation).await.unwrap().success());
    }

    #[tokio::test]
    async fn run_fails_to_spawn_missing_binary() {
        let config = Config {
            oc: "/nonexistent/bootbench-oc".to_owned(),
            namespace: None,
        };

        match run(&config, &Invocation::Create(java(0))).await {
            Err(Error::Spawn { command, .. }) => assert_eq!(command, "/nonexistent/bootbench-oc"),
            other => panic!("expected spawn error, got {other:?}"),
        }
    }
}
