use crate::cli::LogFormat;

/// Logs go to stderr so that command output on stdout stays machine readable.
pub fn init_logging(log_format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    match log_format {
        LogFormat::Plain => builder.try_init().ok(),
        LogFormat::Json => builder.json().try_init().ok(),
    };
}
