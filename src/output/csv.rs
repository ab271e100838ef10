use super::{ConversionReport, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &ConversionReport) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.3},{},{}",
            iso8601_timestamp(),
            report.input.display(),
            report.output.display(),
            report.source_format,
            report.sample_rate,
            report.channels,
            report.frames,
            report.duration_secs,
            report.bytes,
            report.clipped_samples
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,input,output,source_format,sample_rate,channels,frames,duration_secs,bytes,clipped_samples",
        )
    }
}
