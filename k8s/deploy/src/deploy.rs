use crate::{
    common::{
        constants::PRODUCT,
        error::{MissingInputFile, Result},
    },
    config::DeployConfig,
    exec::{CommandRunner, SystemRunner},
    helm::client::HelmClient,
    kubectl::client::KubectlClient,
    prompt::{
        deployed_message, upgrade_question, Confirm, StdinConfirm, MISSING_MANIFEST_HINT,
        PODS_NOT_READY_WARNING, SECRETS_LEFT_APPLIED_WARNING, UPGRADE_DECLINED,
    },
    status::PodSummary,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

/// What the deployment is going to do to the release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseAction {
    Install,
    Upgrade,
}

/// How a deployment run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A new release was installed.
    Installed(PodSummary),
    /// The existing release was upgraded.
    Upgraded(PodSummary),
    /// The release exists and the operator chose not to upgrade it.
    Declined,
}

/// This is a builder for Deployer.
#[derive(Default)]
pub struct DeployerBuilder {
    config: Option<DeployConfig>,
    runner: Option<Arc<dyn CommandRunner>>,
    confirm: Option<Arc<dyn Confirm>>,
}

impl DeployerBuilder {
    /// The deployment target. Defaults to DeployConfig::default().
    #[must_use]
    pub fn with_config(mut self, config: DeployConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Runs helm and kubectl through this. Defaults to SystemRunner.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Asks the upgrade question through this. Defaults to StdinConfirm.
    #[must_use]
    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Build the Deployer.
    pub fn build(self) -> Result<Deployer> {
        let config = self.config.unwrap_or_default();
        let runner = self.runner.unwrap_or_else(|| Arc::new(SystemRunner));

        let helm = HelmClient::builder()
            .with_namespace(config.namespace.as_str())
            .with_runner(runner.clone())
            .build()?;
        let kubectl = KubectlClient::builder()
            .with_namespace(config.namespace.as_str())
            .with_runner(runner)
            .build()?;

        Ok(Deployer {
            config,
            helm,
            kubectl,
            confirm: self.confirm.unwrap_or_else(|| Arc::new(StdinConfirm)),
        })
    }
}

/// Deploys the release: one pass through a fixed sequence of helm and kubectl calls. Every
/// step's failure ends the run, except for the readiness wait.
pub struct Deployer {
    config: DeployConfig,
    helm: HelmClient,
    kubectl: KubectlClient,
    confirm: Arc<dyn Confirm>,
}

impl Deployer {
    /// This creates an empty builder.
    pub fn builder() -> DeployerBuilder {
        DeployerBuilder::default()
    }

    /// Runs the deployment. With `port_forward` set, this blocks on a port-forward to the web
    /// Service at the end, also when the operator declines the upgrade.
    pub async fn deploy(&self, port_forward: bool) -> Result<Outcome> {
        self.check_prerequisites().await?;

        let Some(action) = self.choose_action().await? else {
            console_logger::info(UPGRADE_DECLINED);
            if port_forward {
                self.port_forward().await?;
            }
            return Ok(Outcome::Declined);
        };

        self.register_repository().await?;
        // Nothing is created in the cluster for a run without a secrets manifest.
        let secrets = self.existing_input(self.config.secrets_path())?;
        self.ensure_namespace().await?;
        self.apply_secrets(secrets.as_path()).await?;

        // No rollback here, the secrets are left in place for the next attempt.
        if let Err(error) = self.deploy_release(action).await {
            console_logger::warn(
                SECRETS_LEFT_APPLIED_WARNING,
                &format!(
                    "kubectl delete -f {} -n {}",
                    secrets.display(),
                    self.config.namespace
                ),
            );
            return Err(error);
        }

        self.wait_for_ready().await?;
        let summary = self.report_status(action).await?;
        self.print_hints(port_forward);

        if port_forward {
            self.port_forward().await?;
        }

        Ok(match action {
            ReleaseAction::Install => Outcome::Installed(summary),
            ReleaseAction::Upgrade => Outcome::Upgraded(summary),
        })
    }

    /// Checks that kubectl and helm can be run.
    async fn check_prerequisites(&self) -> Result<()> {
        console_logger::step("Checking prerequisites");

        let kubectl_version = self.kubectl.version().await?;
        let helm_version = self.helm.version().await?;

        info!(kubectl = %kubectl_version, helm = %helm_version, "Found prerequisites");
        Ok(())
    }

    /// Looks for the release. None means it exists and the operator does not want it upgraded.
    async fn choose_action(&self) -> Result<Option<ReleaseAction>> {
        console_logger::step(&format!(
            "Checking for an existing '{}' release",
            self.config.release_name
        ));

        let Some(release) = self
            .helm
            .release_info(self.config.release_name.as_str())
            .await?
        else {
            info!(release = %self.config.release_name, "No existing release, installing");
            return Ok(Some(ReleaseAction::Install));
        };

        info!(
            release = %release.name(),
            chart = %release.chart(),
            status = %release.status(),
            "Found existing release"
        );

        let question = upgrade_question(&self.config.release_name, &self.config.namespace);
        Ok(self
            .confirm
            .confirm(question.as_str())?
            .then_some(ReleaseAction::Upgrade))
    }

    /// Adds the chart repository, replacing an existing entry with the same alias, and
    /// refreshes the repository index.
    async fn register_repository(&self) -> Result<()> {
        console_logger::step(&format!(
            "Adding Helm repository '{}'",
            self.config.repo_alias
        ));

        let alias = self.config.repo_alias.as_str();
        let url = self.config.repo_url.as_str();
        if let Err(error) = self.helm.repo_add(alias, url, false).await {
            info!(%error, "Retrying helm repo add with --force-update");
            self.helm.repo_add(alias, url, true).await?;
        }

        self.helm.repo_update().await
    }

    async fn ensure_namespace(&self) -> Result<()> {
        if !self.kubectl.namespace_exists().await? {
            console_logger::step(&format!(
                "Creating namespace '{}'",
                self.config.namespace
            ));
            self.kubectl.create_namespace().await?;
        }
        Ok(())
    }

    async fn apply_secrets(&self, secrets: &Path) -> Result<()> {
        console_logger::step(&format!("Applying {}", secrets.display()));
        self.kubectl.apply(secrets).await
    }

    async fn deploy_release(&self, action: ReleaseAction) -> Result<()> {
        let values = self.existing_input(self.config.values_path())?;
        let chart = self.config.chart_ref();
        let release = self.config.release_name.as_str();

        match action {
            ReleaseAction::Install => {
                console_logger::step(&format!("Installing {PRODUCT} ({chart})"));
                self.helm.install(release, chart, values).await
            }
            ReleaseAction::Upgrade => {
                console_logger::step(&format!("Upgrading {PRODUCT} ({chart})"));
                self.helm.upgrade(release, chart, values).await
            }
        }
    }

    /// Fails with MissingInputFile unless the path is an existing file.
    fn existing_input(&self, path: PathBuf) -> Result<PathBuf> {
        if !path.is_file() {
            console_logger::info(MISSING_MANIFEST_HINT);
            return MissingInputFile {
                filepath: path,
                directory: self.config.work_dir.clone(),
            }
            .fail();
        }
        Ok(path)
    }

    /// Waits for the Pods to become ready. Timing out only produces a warning.
    async fn wait_for_ready(&self) -> Result<()> {
        console_logger::step(&format!(
            "Waiting up to {} for pods to become ready",
            humantime::format_duration(self.config.ready_timeout)
        ));

        let ready = self
            .kubectl
            .wait_for_ready(self.config.pod_selector.as_str(), self.config.ready_timeout)
            .await?;
        if !ready {
            warn!(selector = %self.config.pod_selector, "Pods did not become ready in time");
            console_logger::warn(PODS_NOT_READY_WARNING, &self.watch_command());
        }
        Ok(())
    }

    /// Prints the Pods and Services, and how many of the Pods are running.
    async fn report_status(&self, action: ReleaseAction) -> Result<PodSummary> {
        console_logger::step("Deployment status");

        println!("{}", self.kubectl.get_pods_table().await?);
        println!("{}", self.kubectl.get_services_table().await?);

        let summary = self.kubectl.get_pods().await?.summary();
        info!(
            running = summary.running(),
            total = summary.total(),
            "Pod status"
        );

        console_logger::success(&deployed_message(action == ReleaseAction::Upgrade));
        if summary.all_running() {
            console_logger::success(&format!(
                "All pods are running ({}/{})",
                summary.running(),
                summary.total()
            ));
        } else {
            console_logger::warn(
                &format!(
                    "{}/{} pods are running, the rest may still be starting. Watch them with:",
                    summary.running(),
                    summary.total()
                ),
                &self.watch_command(),
            );
        }
        Ok(summary)
    }

    fn print_hints(&self, port_forward: bool) {
        let ns = self.config.namespace.as_str();
        let release = self.config.release_name.as_str();

        console_logger::info("\nUseful commands:");
        console_logger::hint("Watch the pods", &self.watch_command());
        console_logger::hint(
            "Follow the logs",
            &format!(
                "kubectl logs -n {ns} -l {} --all-containers --tail=100 -f",
                self.config.pod_selector
            ),
        );
        console_logger::hint(
            "Open a shell in the web pod",
            &format!("kubectl exec -it -n {ns} {} -- sh", self.web_deployment()),
        );
        console_logger::hint(
            "Upgrade after editing values",
            &format!(
                "helm upgrade {release} {} -n {ns} -f {}",
                self.config.chart_ref(),
                self.config.values_file.display()
            ),
        );
        console_logger::hint("Roll back", &format!("helm rollback {release} -n {ns}"));
        console_logger::hint("Uninstall", &format!("helm uninstall {release} -n {ns}"));
        if !port_forward {
            console_logger::hint(
                &format!("Open the UI at {}", self.config.local_url()),
                &self.port_forward_command(),
            );
        }
    }

    /// Relays the local port to the web Service until interrupted.
    async fn port_forward(&self) -> Result<()> {
        console_logger::step(&format!(
            "Forwarding {} to {} (Ctrl-C to stop)",
            self.config.local_url(),
            self.config.service
        ));

        self.kubectl
            .port_forward(
                self.config.service.as_str(),
                self.config.local_port,
                self.config.remote_port,
            )
            .await
    }

    fn watch_command(&self) -> String {
        format!("kubectl get pods -n {} -w", self.config.namespace)
    }

    fn port_forward_command(&self) -> String {
        format!(
            "kubectl port-forward {} {}:{} -n {}",
            self.config.service,
            self.config.local_port,
            self.config.remote_port,
            self.config.namespace
        )
    }

    /// The web Deployment, named like its Service.
    fn web_deployment(&self) -> String {
        let name = self
            .config
            .service
            .split_once('/')
            .map_or(self.config.service.as_str(), |(_, name)| name);
        format!("deploy/{name}")
    }
}
