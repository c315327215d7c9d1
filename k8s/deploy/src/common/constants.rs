use std::time::Duration;

/// This is the name of the product that is being deployed.
pub const PRODUCT: &str = "Langfuse";

/// This is the Kubernetes Namespace which holds the Helm release.
pub const NAMESPACE: &str = "langfuse";

/// This is the name of the Helm release.
pub const RELEASE_NAME: &str = "langfuse";

/// This is the alias under which the chart repository is registered with helm.
pub const REPO_ALIAS: &str = "langfuse";

/// This is the URL of the chart repository.
pub const REPO_URL: &str = "https://langfuse.github.io/langfuse-k8s";

/// This is the name of the chart inside the repository.
pub const CHART_NAME: &str = "langfuse";

/// This is the manifest with the Kubernetes Secrets the chart consumes.
pub const SECRETS_FILE: &str = "secrets.yaml";

/// This is the Helm values file for the release.
pub const VALUES_FILE: &str = "values.yaml";

/// This is the label shared by the Pods of the release.
pub const POD_SELECTOR: &str = "app.kubernetes.io/instance=langfuse";

/// This is how long to wait for the Pods to become ready.
pub const READY_TIMEOUT: Duration = Duration::from_secs(300);

/// This is the Service which serves the web UI.
pub const WEB_SERVICE: &str = "svc/langfuse-web";

/// This is the local port of the port-forward.
pub const LOCAL_PORT: u16 = 3000;

/// This is the Service port of the port-forward.
pub const REMOTE_PORT: u16 = 3000;

/// The helm binary.
pub const HELM: &str = "helm";

/// The kubectl binary.
pub const KUBECTL: &str = "kubectl";
