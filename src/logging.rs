use tracing_subscriber::EnvFilter;

/// Picks the filter directive: `RUST_LOG` first, then the CLI flag, then the
/// configured level.
pub fn filter_directive(env: Option<String>, flag: Option<&str>, configured: &str) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| flag.map(str::to_string))
        .unwrap_or_else(|| configured.to_string())
}

/// Installs the global subscriber. Logs go to stderr so stdout stays clean
/// for `--json` output.
pub fn init(flag: Option<&str>, configured: &str) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), flag, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    } else {
        tracing::debug!(%directive, "logging initialised");
    }
}
