use clap::Parser;

/// These are the supported cli configuration options for the deployment. Everything else about
/// the deployment is fixed.
#[derive(Debug, Parser)]
#[command(name = "deploy-langfuse", about = "Deploys Langfuse onto Kubernetes using Helm")]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
pub(crate) struct CliArgs {
    /// Forward localhost:3000 to the Langfuse web Service once the deployment is done.
    #[arg(long, default_value_t = false)]
    port_forward: bool,
}

impl CliArgs {
    /// This returns true if the port-forward should run at the end.
    pub(crate) fn port_forward(&self) -> bool {
        self.port_forward
    }
}
