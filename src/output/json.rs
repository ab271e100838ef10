use serde::Serialize;

use super::{ConversionReport, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    ts: String,
    #[serde(flatten)]
    report: &'a ConversionReport,
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &ConversionReport) -> String {
        let line = JsonLine {
            ts: iso8601_timestamp(),
            report,
        };
        // Fails only for non-UTF-8 paths
        serde_json::to_string(&line).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
