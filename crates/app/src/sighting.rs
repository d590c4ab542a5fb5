use tracing::info;

/// Message carried by every sighting record.
pub const MESSAGE: &str = "A walrus appears";

/// Event target for sighting records, kept enabled by the telemetry filter.
pub const TARGET: &str = "sighting";

/// Fields attached to a sighting record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    pub animal: &'static str,
    pub number: i64,
    pub size: i64,
}

/// The one sighting this program reports.
pub const WALRUS: Sighting = Sighting {
    animal: "walrus",
    number: 1,
    size: 10,
};

impl Sighting {
    /// Emits a single `INFO` record carrying the sighting as typed fields.
    pub fn emit(&self) {
        info!(
            target: TARGET,
            animal = self.animal,
            number = self.number,
            size = self.size,
            "{MESSAGE}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{fmt_layer, CaptureWriter};
    use serde_json::{json, Value};
    use tracing_subscriber::layer::SubscriberExt;
    use walrus_sample_util::LogFormat;

    fn capture(format: LogFormat) -> String {
        let writer = CaptureWriter::default();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(format, writer.clone()));
        tracing::subscriber::with_default(subscriber, || WALRUS.emit());
        writer.contents()
    }

    #[test]
    fn walrus_constants_match_fixture() {
        assert_eq!(WALRUS.animal, "walrus");
        assert_eq!(WALRUS.number, 1);
        assert_eq!(WALRUS.size, 10);
        assert_eq!(MESSAGE, "A walrus appears");
    }

    #[test]
    fn json_record_carries_typed_fields() {
        let output = capture(LogFormat::Json);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1, "expected exactly one record, got {output:?}");

        let record: Value = serde_json::from_str(lines[0]).expect("record should be valid json");
        assert_eq!(record["level"], "INFO");
        assert_eq!(
            record["fields"],
            json!({
                "message": "A walrus appears",
                "animal": "walrus",
                "number": 1,
                "size": 10,
            })
        );
        assert!(record["timestamp"].is_string());
    }

    #[test]
    fn text_record_is_a_single_line() {
        let output = capture(LogFormat::Text);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1, "expected exactly one record, got {output:?}");

        let line = lines[0];
        assert!(line.contains("INFO"));
        assert!(line.contains("A walrus appears"));
        assert!(line.contains(r#"animal="walrus""#));
        assert!(line.contains("number=1"));
        assert!(line.ends_with("size=10"));
    }

    #[test]
    fn record_uses_sighting_target() {
        let writer = CaptureWriter::default();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(format!("off,{TARGET}=info")))
            .with(fmt_layer(LogFormat::Json, writer.clone()));
        tracing::subscriber::with_default(subscriber, || WALRUS.emit());

        assert_eq!(writer.contents().lines().count(), 1);
    }
}
