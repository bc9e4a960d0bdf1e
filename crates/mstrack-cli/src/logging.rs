use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(default_filter: &str, json: bool) -> eyre::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        // Structured JSON logging for log shippers
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!(json, "tracing initialised");
    Ok(())
}
