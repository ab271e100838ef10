use super::{ConversionReport, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &ConversionReport) -> String {
        let summary = format!(
            "{} -> {}: {} ch, {} Hz, {:.2} s, {} bytes",
            report.input.display(),
            report.output.display(),
            report.channels,
            report.sample_rate,
            report.duration_secs,
            report.bytes
        );
        if self.verbose {
            format!(
                "{} [source: {}, frames: {}, clipped: {}]",
                summary, report.source_format, report.frames, report.clipped_samples
            )
        } else {
            summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_report;

    #[test]
    fn test_text_summary() {
        let line = TextFormatter::new(false).format(&sample_report());
        assert_eq!(
            line,
            "in/clip.raw -> out/clip.wav: 2 ch, 48000 Hz, 0.50 s, 96044 bytes"
        );
    }

    #[test]
    fn test_text_verbose_includes_clipping() {
        let line = TextFormatter::new(true).format(&sample_report());
        assert!(line.contains("clipped: 3"));
        assert!(line.contains("frames: 24000"));
    }
}
