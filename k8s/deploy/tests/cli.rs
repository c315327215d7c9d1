use std::process::{Command, Output};

/// Runs the deploy-langfuse binary from an empty directory, with nothing on PATH.
fn deploy_langfuse(args: &[&str]) -> Output {
    let work_dir = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    Command::new(env!("CARGO_BIN_EXE_deploy-langfuse"))
        .args(args)
        .current_dir(work_dir.path())
        .env("PATH", empty_path.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_unknown_arguments_exit_with_usage() {
    for token in ["--bogus", "--help", "--version", "install"] {
        let output = deploy_langfuse(&[token]);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert_eq!(output.status.code(), Some(1), "{token}: {stderr}");
        assert!(stderr.contains("Usage:"), "{token}: {stderr}");
        assert!(stderr.contains(token), "{token}: {stderr}");
        assert!(!stdout.contains("Checking prerequisites"), "{token}: {stdout}");
    }
}

#[test]
fn test_repeated_port_forward_is_accepted() {
    let output = deploy_langfuse(&["--port-forward", "--port-forward"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // Parsing succeeds, so the run gets as far as the prerequisite check.
    assert_eq!(output.status.code(), Some(1), "{stderr}");
    assert!(!stderr.contains("Usage:"), "{stderr}");
    assert!(stderr.contains("not installed"), "{stderr}");
}

#[test]
fn test_missing_kubectl_exits_with_error() {
    let output = deploy_langfuse(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "{stderr}");
    assert!(stderr.contains("not installed"), "{stderr}");
    assert!(stderr.contains("kubectl"), "{stderr}");
    assert!(!stderr.contains("Usage:"), "{stderr}");
}
