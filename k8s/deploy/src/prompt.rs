use crate::common::{
    constants::PRODUCT,
    error::{ReadConfirmation, Result},
};
use snafu::ResultExt;
use std::io::{self, BufRead, Write};

/// Notice for when the operator declines to upgrade an existing release.
pub const UPGRADE_DECLINED: &str = "Upgrade cancelled, the existing release was left untouched.";

/// Warning for when the Pods are not ready before the wait times out.
pub const PODS_NOT_READY_WARNING: &str =
    "Some pods are not ready yet, they may still be pulling images or running migrations.";

/// Warning for when the release step fails after the secrets were applied.
pub const SECRETS_LEFT_APPLIED_WARNING: &str =
    "The secrets manifest was applied, but the release was not deployed. The secrets stay in the cluster, remove them with:";

/// Hint for when the input manifests are missing.
pub const MISSING_MANIFEST_HINT: &str =
    "Both secrets.yaml and values.yaml must be present in the directory the deployment is run from.";

/// The question asked when the release already exists.
pub(crate) fn upgrade_question(release_name: &str, namespace: &str) -> String {
    format!("Release '{release_name}' already exists in namespace '{namespace}'. Upgrade it?")
}

/// Message printed once the release is installed.
pub(crate) fn deployed_message(upgraded: bool) -> String {
    let verb = if upgraded { "upgraded" } else { "installed" };
    format!("{PRODUCT} {verb} successfully!")
}

/// Asks the operator a yes/no question.
pub trait Confirm: Send + Sync {
    /// Returns true only on an explicit yes.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Asks on the terminal: the question goes to stdout, the answer is read from stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} [y/N] ").context(ReadConfirmation)?;
        stdout.flush().context(ReadConfirmation)?;

        let mut answer = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut answer)
            .context(ReadConfirmation)?;

        // EOF, e.g. stdin is not a terminal.
        if read == 0 {
            return Ok(false);
        }
        Ok(parse_answer(answer.as_str()))
    }
}

/// 'y' or 'yes', in any case, is a yes. Anything else is a no.
pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
