/// Constants, error handling and macros shared across the crate.
pub mod common;
/// Deployment configuration.
pub mod config;
/// The deployment step sequence.
pub mod deploy;
/// Execution of external commands.
pub mod exec;
/// Wrapper around the helm CLI.
pub mod helm;
/// Wrapper around the kubectl CLI.
pub mod kubectl;
/// Operator confirmation and user messages.
pub mod prompt;
/// Pod status summary.
pub mod status;
