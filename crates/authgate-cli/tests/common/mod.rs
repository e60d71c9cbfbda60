use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use wiremock::MockServer;

/// Base URL of the mock backend as the CLI sees it.
pub fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}/api", server.address().port())
}

/// Session file inside an isolated home directory.
pub fn session_file(home: &Path) -> PathBuf {
    home.join("session.json")
}

/// Run the CLI with a custom HOME directory for isolated session storage.
///
/// The process runs on a blocking thread so the mock server keeps serving.
pub async fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_authgate"));
    cmd.args(args);
    cmd.arg("--session-file").arg(session_file(home));
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("AUTHGATE_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("AUTHGATE_CONFIG");
    cmd.env_remove("AUTHGATE_SESSION_FILE");
    cmd.env_remove("AUTHGATE_PASSWORD");
    cmd.env_remove("RUST_LOG");

    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
        .await
        .expect("CLI thread panicked")
}

/// Run the CLI with a custom HOME and expect success.
pub async fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}
