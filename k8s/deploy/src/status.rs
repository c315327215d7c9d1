use k8s_openapi::api::core::v1::Pod;
use serde::Deserialize;

/// This is the Pod phase counted as running.
const RUNNING_PHASE: &str = "Running";

/// This struct is used to deserialize the output of `kubectl get pods -n <namespace> -o json`.
/// kubectl reports `kind: List` here, so this can't be a k8s_openapi::List<Pod>.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

impl PodList {
    /// Counts the running Pods.
    pub fn summary(&self) -> PodSummary {
        PodSummary::from_pods(self.items.as_slice())
    }
}

/// Running versus total Pod count. `running` never exceeds `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PodSummary {
    running: usize,
    total: usize,
}

impl PodSummary {
    /// Counts the Pods in the Running phase.
    pub fn from_pods(pods: &[Pod]) -> Self {
        let running = pods
            .iter()
            .filter(|pod| {
                pod.status
                    .as_ref()
                    .and_then(|status| status.phase.as_deref())
                    .eq(&Some(RUNNING_PHASE))
            })
            .count();

        Self {
            running,
            total: pods.len(),
        }
    }

    pub fn running(&self) -> usize {
        self.running
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// True if every Pod is running.
    pub fn all_running(&self) -> bool {
        self.running == self.total
    }
}
