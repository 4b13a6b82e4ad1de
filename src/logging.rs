use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// Console output goes to stderr so stdout stays free for progress lines.
/// With `debug_log`, debug events are also appended to that file.
pub fn init(verbose: bool, debug_log: Option<&Path>) -> std::io::Result<()> {
    let console_filter = if verbose {
        EnvFilter::new("reviewclash=debug")
    } else {
        EnvFilter::new("reviewclash=warn")
    };
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file_layer = match debug_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("reviewclash=debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_debug_log_is_an_error() {
        let result = init(false, Some(Path::new("/nonexistent/dir/agent_debug.log")));
        assert!(result.is_err());
    }
}
