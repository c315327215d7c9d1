use snafu::Snafu;
use std::path::PathBuf;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a required binary could not be spawned from $PATH.
    #[snafu(display(
        "'{}' is not installed or not present in $PATH: {}",
        command,
        source
    ))]
    MissingPrerequisite {
        source: std::io::Error,
        command: String,
    },

    /// Error for when an input manifest is not present in the working directory.
    #[snafu(display(
        "'{}' not found in {}, please create it before deploying",
        filepath.display(),
        directory.display()
    ))]
    MissingInputFile { filepath: PathBuf, directory: PathBuf },

    /// Error for when the HelmClient is built without a Namespace.
    #[snafu(display("No input for HelmClient's Namespace"))]
    HelmClientNs,

    /// Error for when the KubectlClient is built without a Namespace.
    #[snafu(display("No input for KubectlClient's Namespace"))]
    KubectlClientNs,

    /// Error for when a Helm command could not be executed.
    #[snafu(display(
        "Failed to run Helm command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    HelmCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when a kubectl command could not be executed.
    #[snafu(display(
        "Failed to run kubectl command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    KubectlCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when a `helm repo add` command execution succeeds, but with an error.
    #[snafu(display(
        "`helm repo add` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmRepoAddCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `helm repo update` command execution succeeds, but with an error.
    #[snafu(display(
        "`helm repo update` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmRepoUpdateCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `helm list` command execution succeeds, but with an error.
    #[snafu(display(
        "`helm list` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmListCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `helm install` command execution succeeds, but with an error.
    #[snafu(display(
        "`helm install` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmInstallCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `helm upgrade` command execution succeeds, but with an error.
    #[snafu(display(
        "`helm upgrade` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmUpgradeCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `kubectl create namespace` command execution succeeds, but with an error.
    #[snafu(display(
        "`kubectl create namespace` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    KubectlCreateNamespaceCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `kubectl apply` command execution succeeds, but with an error.
    #[snafu(display(
        "`kubectl apply` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    KubectlApplyCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a `kubectl get` command execution succeeds, but with an error.
    #[snafu(display(
        "`kubectl get` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    KubectlGetCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when `kubectl port-forward` exits on its own with an error.
    #[snafu(display(
        "`kubectl port-forward` command exited with an error,\ncommand: {},\nargs: {:?}",
        command,
        args,
    ))]
    KubectlPortForwardCommand { command: String, args: Vec<String> },

    /// Error for when a command's output could not be read as UTF-8.
    #[snafu(display("Failed to convert Vec<u8> to UTF-8 formatted String: {}", source))]
    U8VectorToString { source: std::str::Utf8Error },

    /// Error for when yaml could not be parsed from a slice.
    #[snafu(display("Failed to parse YAML {}: {}", input_yaml, source))]
    YamlParseFromSlice {
        source: serde_yaml::Error,
        input_yaml: String,
    },

    /// Error for when json could not be parsed from a slice.
    #[snafu(display("Failed to parse JSON {}: {}", input_json, source))]
    JsonParseFromSlice {
        source: serde_json::Error,
        input_json: String,
    },

    /// Error for when the operator's answer could not be read.
    #[snafu(display("Failed to read confirmation from standard input: {}", source))]
    ReadConfirmation { source: std::io::Error },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
