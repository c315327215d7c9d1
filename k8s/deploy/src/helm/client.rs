use crate::{
    common::{
        constants::HELM,
        error::{
            HelmClientNs, HelmCommand, HelmInstallCommand, HelmListCommand, HelmRepoAddCommand,
            HelmRepoUpdateCommand, HelmUpgradeCommand, MissingPrerequisite, Result,
            YamlParseFromSlice,
        },
    },
    exec::{CommandOutput, CommandRunner, SystemRunner},
    vec_to_strings,
};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use std::{path::Path, sync::Arc};
use tracing::{debug, warn};

/// This struct is used to deserialize the output of `helm list -n <namespace> -o yaml`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HelmReleaseElement {
    name: String,
    revision: String,
    status: String,
    chart: String,
}

impl HelmReleaseElement {
    /// This is a getter function for the name of the release.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    /// This is a getter function for the chart_name of the release. This also contains the chart
    /// version.
    pub fn chart(&self) -> &str {
        self.chart.as_str()
    }
    /// The release status, e.g. deployed, failed.
    pub fn status(&self) -> &str {
        self.status.as_str()
    }
    pub fn revision(&self) -> &str {
        self.revision.as_str()
    }
}

/// This is a builder for HelmClient.
#[derive(Default)]
pub struct HelmClientBuilder {
    namespace: Option<String>,
    runner: Option<Arc<dyn CommandRunner>>,
}

impl HelmClientBuilder {
    /// This is a builder option to add Namespace. This is mandatory,
    /// because all helm releases are tied to a Namespace.
    #[must_use]
    pub fn with_namespace<J>(mut self, ns: J) -> Self
    where
        J: ToString,
    {
        self.namespace = Some(ns.to_string());
        self
    }

    /// Use this CommandRunner instead of spawning real processes.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Build the HelmClient.
    pub fn build(self) -> Result<HelmClient> {
        let namespace = self.namespace.ok_or(HelmClientNs.build())?;
        let runner = self.runner.unwrap_or_else(|| Arc::new(SystemRunner));
        Ok(HelmClient { namespace, runner })
    }
}

/// This type has functions which execute helm commands to fetch info about and modify helm
/// releases.
#[derive(Clone)]
pub struct HelmClient {
    namespace: String,
    runner: Arc<dyn CommandRunner>,
}

impl HelmClient {
    /// This creates an empty builder.
    pub fn builder() -> HelmClientBuilder {
        HelmClientBuilder::default()
    }

    /// Runs a helm command and returns its captured output, whatever the exit code.
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %HELM, ?args, "Helm command");

        let output = self.runner.output(HELM, args).await.context(HelmCommand {
            command: HELM,
            args: args.to_vec(),
        })?;

        debug!(stdout = %String::from_utf8_lossy(&output.stdout), "Helm command standard output");
        Ok(output)
    }

    /// Runs command `helm version --short`. Fails only if the helm binary cannot be run at all.
    pub async fn version(&self) -> Result<String> {
        let args: Vec<String> = vec_to_strings!["version", "--short"];
        debug!(command = %HELM, ?args, "Helm version command");

        let output = self
            .runner
            .output(HELM, &args)
            .await
            .context(MissingPrerequisite { command: HELM })?;

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.success {
            debug!(std_err = %String::from_utf8_lossy(&output.stderr), "Helm version command failed");
        } else if !version.starts_with("v3.") {
            warn!(%version, "Expected helm v3.x.y");
        }
        Ok(version)
    }

    /// Runs command `helm repo add <alias> <url>`, with `--force-update` if asked to.
    pub async fn repo_add<A, U>(&self, alias: A, url: U, force_update: bool) -> Result<()>
    where
        A: ToString,
        U: ToString,
    {
        let mut args: Vec<String> = vec_to_strings!["repo", "add", alias, url];
        if force_update {
            args.push("--force-update".to_string());
        }

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            HelmRepoAddCommand {
                command: HELM,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }

    /// Runs command `helm repo update`.
    pub async fn repo_update(&self) -> Result<()> {
        let args: Vec<String> = vec_to_strings!["repo", "update"];

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            HelmRepoUpdateCommand {
                command: HELM,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }

    /// Runs command `helm list -n <namespace> -o yaml`.
    pub async fn list(&self) -> Result<Vec<HelmReleaseElement>> {
        let mut args: Vec<String> = vec_to_strings!["list", "-n", self.namespace.as_str()];
        // Because this option has to be at the end for it to work.
        args.extend(vec_to_strings!["-o", "yaml"]);

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            HelmListCommand {
                command: HELM,
                args,
                std_err: output.stderr_str()?
            }
        );

        let stdout_str = output.stdout_str()?;
        if stdout_str.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_yaml::from_slice(output.stdout.as_slice()).context(YamlParseFromSlice {
            input_yaml: stdout_str,
        })
    }

    /// Fetches info about a Helm release in the Namespace, if it exists.
    pub async fn release_info<A>(&self, release_name: A) -> Result<Option<HelmReleaseElement>>
    where
        A: ToString,
    {
        let release_name = release_name.to_string();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|release| release.name().eq(&release_name)))
    }

    /// Runs command `helm install <release_name> <chart> -n <namespace> -f <values>
    /// --create-namespace`.
    pub async fn install<A, C, P>(&self, release_name: A, chart: C, values: P) -> Result<()>
    where
        A: ToString,
        C: ToString,
        P: AsRef<Path>,
    {
        let args: Vec<String> = vec_to_strings![
            "install",
            release_name,
            chart,
            "-n",
            self.namespace.as_str(),
            "-f",
            values.as_ref().to_string_lossy(),
            "--create-namespace"
        ];

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            HelmInstallCommand {
                command: HELM,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }

    /// Runs command `helm upgrade <release_name> <chart> -n <namespace> -f <values>`.
    pub async fn upgrade<A, C, P>(&self, release_name: A, chart: C, values: P) -> Result<()>
    where
        A: ToString,
        C: ToString,
        P: AsRef<Path>,
    {
        let args: Vec<String> = vec_to_strings![
            "upgrade",
            release_name,
            chart,
            "-n",
            self.namespace.as_str(),
            "-f",
            values.as_ref().to_string_lossy()
        ];

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            HelmUpgradeCommand {
                command: HELM,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }
}
