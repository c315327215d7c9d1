use crate::common::constants::{
    CHART_NAME, LOCAL_PORT, NAMESPACE, POD_SELECTOR, READY_TIMEOUT, RELEASE_NAME, REMOTE_PORT,
    REPO_ALIAS, REPO_URL, SECRETS_FILE, VALUES_FILE, WEB_SERVICE,
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Everything the deployment needs to know about its target. The defaults are the fixed
/// deployment constants; nothing here is read from the command line or the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// The Kubernetes Namespace for the Helm release.
    pub namespace: String,
    /// The name of the Helm release.
    pub release_name: String,
    /// The alias under which the chart repository is added.
    pub repo_alias: String,
    pub repo_url: String,
    /// The chart's name inside the repository.
    pub chart_name: String,
    /// The directory which holds the input manifests.
    pub work_dir: PathBuf,
    pub secrets_file: PathBuf,
    pub values_file: PathBuf,
    /// The label selector for the release's Pods.
    pub pod_selector: String,
    pub ready_timeout: Duration,
    /// The target of the port-forward, e.g. svc/langfuse-web.
    pub service: String,
    pub local_port: u16,
    pub remote_port: u16,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            namespace: NAMESPACE.to_string(),
            release_name: RELEASE_NAME.to_string(),
            repo_alias: REPO_ALIAS.to_string(),
            repo_url: REPO_URL.to_string(),
            chart_name: CHART_NAME.to_string(),
            work_dir: PathBuf::from("."),
            secrets_file: PathBuf::from(SECRETS_FILE),
            values_file: PathBuf::from(VALUES_FILE),
            pod_selector: POD_SELECTOR.to_string(),
            ready_timeout: READY_TIMEOUT,
            service: WEB_SERVICE.to_string(),
            local_port: LOCAL_PORT,
            remote_port: REMOTE_PORT,
        }
    }
}

impl DeployConfig {
    /// Sets the directory in which the input manifests are looked up.
    #[must_use]
    pub fn with_work_dir<P>(mut self, dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.work_dir = dir.as_ref().to_path_buf();
        self
    }

    /// The chart reference as understood by helm, i.e. <repo-alias>/<chart-name>.
    pub fn chart_ref(&self) -> String {
        format!("{}/{}", self.repo_alias, self.chart_name)
    }

    /// The full path to the secrets manifest.
    pub fn secrets_path(&self) -> PathBuf {
        self.work_dir.join(&self.secrets_file)
    }

    /// The full path to the Helm values file.
    pub fn values_path(&self) -> PathBuf {
        self.work_dir.join(&self.values_file)
    }

    /// The local URL served by the port-forward.
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.local_port)
    }
}
