use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self as tracing_fmt, time::UtcTime, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    filter::{Directive, ParseError},
    EnvFilter, Layer,
};

use walrus_sample_util::{AppConfig, LogFormat};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
    #[error("invalid log filter directive: {0}")]
    Filter(#[from] ParseError),
}

static TRACING_INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> Result<EnvFilter, TelemetryError> {
    let base =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    with_sighting_directive(base)
}

/// Pins the sighting target at `info` regardless of `RUST_LOG`.
fn with_sighting_directive(filter: EnvFilter) -> Result<EnvFilter, TelemetryError> {
    let directive: Directive = format!("{}=info", crate::sighting::TARGET).parse()?;
    Ok(filter.add_directive(directive))
}

/// Builds the formatting layer for `format`, writing records to `writer`.
pub fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Installs the global subscriber. Records go to stderr.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    if TRACING_INIT.get().is_some() {
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt_layer(config.log_format, std::io::stderr))
        .try_init()?;

    TRACING_INIT.set(()).ok();
    Ok(())
}

/// In-memory sink for asserting on formatted records.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureWriter {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("capture buffer poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .expect("capture buffer poisoned")
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
