use std::backtrace::Backtrace;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, fmt::MakeWriter, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.rust_log));
    subscriber(filter, cfg.format, std::io::stdout).init();
    set_panic_hook();
}

/// Targets stay visible so `access` lines can be told apart from application events.
fn subscriber<W>(
    filter: EnvFilter,
    format: LogFormat,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt().with_env_filter(filter).with_writer(writer);
    match format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    }
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
            *message
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic"
        };

        let backtrace = Backtrace::capture();

        if let Some(location) = info.location() {
            tracing::error!(
                panic = %message,
                location = %location,
                backtrace = %backtrace,
                "panic"
            );
        } else {
            tracing::error!(panic = %message, backtrace = %backtrace, "panic");
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::LogCapture;

    fn captured(format: LogFormat) -> String {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = subscriber(EnvFilter::new("info"), format, move || writer.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "access", "127.0.0.1 - \"GET / HTTP/1.1\" 200 -");
        });
        capture.contents()
    }

    #[test]
    fn json_lines_carry_the_access_target() {
        let output = captured(LogFormat::Json);
        let line: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(line["target"], "access");
    }

    #[test]
    fn text_lines_carry_the_access_target() {
        let output = captured(LogFormat::Text);
        assert!(output.contains("access"), "unexpected output: {output}");
    }
}
