use crate::{
    common::{
        constants::KUBECTL,
        error::{
            JsonParseFromSlice, KubectlApplyCommand, KubectlClientNs, KubectlCommand,
            KubectlCreateNamespaceCommand, KubectlGetCommand, KubectlPortForwardCommand,
            MissingPrerequisite, Result,
        },
    },
    exec::{Attached, CommandOutput, CommandRunner, SystemRunner},
    status::PodList,
    vec_to_strings,
};
use snafu::{ensure, ResultExt};
use std::{path::Path, sync::Arc, time::Duration};
use tracing::{debug, info};

/// This is a builder for KubectlClient.
#[derive(Default)]
pub struct KubectlClientBuilder {
    namespace: Option<String>,
    runner: Option<Arc<dyn CommandRunner>>,
}

impl KubectlClientBuilder {
    /// This is a builder option to add Namespace. This is mandatory, every namespaced command
    /// is run against it.
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

    /// Build the KubectlClient.
    pub fn build(self) -> Result<KubectlClient> {
        let namespace = self.namespace.ok_or(KubectlClientNs.build())?;
        let runner = self.runner.unwrap_or_else(|| Arc::new(SystemRunner));
        Ok(KubectlClient { namespace, runner })
    }
}

/// Executes kubectl commands against a single Namespace.
#[derive(Clone)]
pub struct KubectlClient {
    namespace: String,
    runner: Arc<dyn CommandRunner>,
}

impl KubectlClient {
    /// This creates an empty builder.
    pub fn builder() -> KubectlClientBuilder {
        KubectlClientBuilder::default()
    }

    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %KUBECTL, ?args, "kubectl command");

        let output = self
            .runner
            .output(KUBECTL, args)
            .await
            .context(KubectlCommand {
                command: KUBECTL,
                args: args.to_vec(),
            })?;

        debug!(stdout = %String::from_utf8_lossy(&output.stdout), "kubectl command standard output");
        Ok(output)
    }

    /// Runs a `kubectl get` and returns its standard output.
    async fn get(&self, args: Vec<String>) -> Result<String> {
        let output = self.run(&args).await?;
        ensure!(
            output.success,
            KubectlGetCommand {
                command: KUBECTL,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(output.stdout_str()?.to_string())
    }

    /// Runs command `kubectl version --client`. Fails only if the kubectl binary cannot be run
    /// at all.
    pub async fn version(&self) -> Result<String> {
        let args: Vec<String> = vec_to_strings!["version", "--client"];
        debug!(command = %KUBECTL, ?args, "kubectl version command");

        let output = self
            .runner
            .output(KUBECTL, &args)
            .await
            .context(MissingPrerequisite { command: KUBECTL })?;

        if !output.success {
            debug!(std_err = %String::from_utf8_lossy(&output.stderr), "kubectl version command failed");
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs command `kubectl get namespace <namespace>`.
    pub async fn namespace_exists(&self) -> Result<bool> {
        let args: Vec<String> = vec_to_strings!["get", "namespace", self.namespace.as_str()];
        Ok(self.run(&args).await?.success)
    }

    /// Runs command `kubectl create namespace <namespace>`.
    pub async fn create_namespace(&self) -> Result<()> {
        let args: Vec<String> = vec_to_strings!["create", "namespace", self.namespace.as_str()];

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            KubectlCreateNamespaceCommand {
                command: KUBECTL,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }

    /// Runs command `kubectl apply -f <manifest> -n <namespace>`.
    pub async fn apply<P>(&self, manifest: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let args: Vec<String> = vec_to_strings![
            "apply",
            "-f",
            manifest.as_ref().to_string_lossy(),
            "-n",
            self.namespace.as_str()
        ];

        let output = self.run(&args).await?;
        ensure!(
            output.success,
            KubectlApplyCommand {
                command: KUBECTL,
                args,
                std_err: output.stderr_str()?
            }
        );
        Ok(())
    }

    /// Runs command `kubectl wait --for=condition=ready pod -l <selector> -n <namespace>
    /// --timeout=<timeout>`. Returns false if the Pods did not become ready in time.
    pub async fn wait_for_ready<S>(&self, selector: S, timeout: Duration) -> Result<bool>
    where
        S: ToString,
    {
        let args: Vec<String> = vec_to_strings![
            "wait",
            "--for=condition=ready",
            "pod",
            "-l",
            selector,
            "-n",
            self.namespace.as_str(),
            format!("--timeout={}", kubectl_duration(timeout))
        ];

        let output = self.run(&args).await?;
        if !output.success {
            debug!(std_err = %String::from_utf8_lossy(&output.stderr), "kubectl wait returned an error");
        }
        Ok(output.success)
    }

    /// Runs command `kubectl get pods -n <namespace>` and returns the table.
    pub async fn get_pods_table(&self) -> Result<String> {
        self.get(vec_to_strings!["get", "pods", "-n", self.namespace.as_str()])
            .await
    }

    /// Runs command `kubectl get svc -n <namespace>` and returns the table.
    pub async fn get_services_table(&self) -> Result<String> {
        self.get(vec_to_strings!["get", "svc", "-n", self.namespace.as_str()])
            .await
    }

    /// Runs command `kubectl get pods -n <namespace> -o json`.
    pub async fn get_pods(&self) -> Result<PodList> {
        let stdout = self
            .get(vec_to_strings![
                "get",
                "pods",
                "-n",
                self.namespace.as_str(),
                "-o",
                "json"
            ])
            .await?;

        serde_json::from_str(stdout.as_str()).context(JsonParseFromSlice {
            input_json: stdout.as_str(),
        })
    }

    /// Runs command `kubectl port-forward <target> <local>:<remote> -n <namespace>` attached to
    /// the terminal. This returns once kubectl exits or the operator hits Ctrl-C.
    pub async fn port_forward<T>(&self, target: T, local_port: u16, remote_port: u16) -> Result<()>
    where
        T: ToString,
    {
        let args: Vec<String> = vec_to_strings![
            "port-forward",
            target,
            format!("{local_port}:{remote_port}"),
            "-n",
            self.namespace.as_str()
        ];
        debug!(command = %KUBECTL, ?args, "kubectl port-forward command");

        let attached = self
            .runner
            .attached(KUBECTL, &args)
            .await
            .context(KubectlCommand {
                command: KUBECTL,
                args: args.clone(),
            })?;

        match attached {
            Attached::Interrupted => {
                info!("Port-forward interrupted");
                Ok(())
            }
            Attached::Exited { success } => {
                ensure!(
                    success,
                    KubectlPortForwardCommand {
                        command: KUBECTL,
                        args
                    }
                );
                Ok(())
            }
        }
    }
}

/// Renders a Duration the way kubectl's Go duration flags parse it, e.g. 1m30s500ms.
fn kubectl_duration(duration: Duration) -> String {
    humantime::format_duration(duration)
        .to_string()
        .replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::{kubectl_duration, KubectlClient};
    use crate::{
        common::error::Error,
        exec::{
            testing::{FakeRunner, Reply},
            Attached,
        },
    };
    use std::{sync::Arc, time::Duration};

    fn client(runner: Arc<FakeRunner>) -> KubectlClient {
        KubectlClient::builder()
            .with_namespace("langfuse")
            .with_runner(runner)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_namespace() {
        assert!(matches!(
            KubectlClient::builder().build(),
            Err(Error::KubectlClientNs)
        ));
    }

    #[tokio::test]
    async fn test_wait_for_ready() {
        let runner = Arc::new(FakeRunner::default());
        let kubectl = client(runner.clone());
        assert!(kubectl
            .wait_for_ready("app.kubernetes.io/instance=langfuse", Duration::from_secs(300))
            .await
            .unwrap());
        assert_eq!(
            runner.calls(),
            vec!["kubectl wait --for=condition=ready pod -l app.kubernetes.io/instance=langfuse -n langfuse --timeout=5m"]
        );

        let runner = Arc::new(FakeRunner::default().on(
            "kubectl wait",
            Reply::failure("error: timed out waiting for the condition on pods/langfuse-web-0"),
        ));
        assert!(!client(runner)
            .wait_for_ready("app=web", Duration::from_secs(90))
            .await
            .unwrap());
    }

    #[test]
    fn test_kubectl_duration() {
        assert_eq!(kubectl_duration(Duration::from_secs(300)), "5m");
        assert_eq!(kubectl_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(kubectl_duration(Duration::from_millis(90_500)), "1m30s500ms");
        assert_eq!(kubectl_duration(Duration::from_millis(250)), "250ms");
    }

    #[tokio::test]
    async fn test_apply_failure() {
        let runner = Arc::new(
            FakeRunner::default().on("kubectl apply", Reply::failure("error: no objects passed")),
        );
        let error = client(runner).apply("secrets.yaml").await.unwrap_err();
        assert!(matches!(error, Error::KubectlApplyCommand { .. }));
    }

    #[tokio::test]
    async fn test_get_pods() {
        let pods = r#"{
            "apiVersion": "v1",
            "kind": "List",
            "items": [
                {
                    "apiVersion": "v1",
                    "kind": "Pod",
                    "metadata": {"name": "langfuse-web-0"},
                    "status": {"phase": "Running"}
                }
            ]
        }"#;
        let runner = Arc::new(FakeRunner::default().on("kubectl get pods", Reply::stdout(pods)));
        let summary = client(runner.clone()).get_pods().await.unwrap().summary();
        assert_eq!((summary.running(), summary.total()), (1, 1));
        assert_eq!(runner.calls(), vec!["kubectl get pods -n langfuse -o json"]);
    }

    #[tokio::test]
    async fn test_get_pods_bad_json() {
        let runner =
            Arc::new(FakeRunner::default().on("kubectl get pods", Reply::stdout("No resources")));
        let error = client(runner).get_pods().await.unwrap_err();
        assert!(matches!(error, Error::JsonParseFromSlice { .. }));
    }

    #[tokio::test]
    async fn test_port_forward() {
        let runner = Arc::new(FakeRunner::default());
        client(runner.clone())
            .port_forward("svc/langfuse-web", 3000, 3000)
            .await
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec!["kubectl port-forward svc/langfuse-web 3000:3000 -n langfuse"]
        );

        let runner = Arc::new(FakeRunner::default().on(
            "kubectl port-forward",
            Reply::Attached(Attached::Exited { success: false }),
        ));
        let error = client(runner)
            .port_forward("svc/langfuse-web", 3000, 3000)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::KubectlPortForwardCommand { .. }));
    }
}
