use crate::core::Severity;
use crate::report::{AnalysisReport, Finding};
use colored::*;
use serde_json;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header()?;
        self.write_summary(report)?;
        self.write_findings(report)?;
        self.write_errors(report)?;
        self.write_status(report)?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Reactive Pass-Through Report".bold().blue())?;
        writeln!(self.writer, "{}", "============================".blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let stats = &report.stats;
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Units analyzed: {}", stats.units)?;
        writeln!(self.writer, "  UI functions: {}", stats.ui_functions)?;
        writeln!(
            self.writer,
            "  Call sites: {} ({} unresolved)",
            stats.call_sites, stats.unresolved_call_sites
        )?;
        writeln!(
            self.writer,
            "  Chains: {} ({} reported)",
            stats.chains, stats.reported_chains
        )?;
        if report.suppressed > 0 {
            writeln!(self.writer, "  Suppressed findings: {}", report.suppressed)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_findings(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.findings.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{} ({}):",
            "Findings".bold(),
            report.findings.len()
        )?;
        for (i, finding) in report.findings.iter().enumerate() {
            self.write_finding(i + 1, finding)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_finding(&mut self, index: usize, finding: &Finding) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "  {}. {} {}",
            index,
            format_severity(finding.severity),
            finding.location.to_string().dimmed()
        )?;
        writeln!(self.writer, "     {}", finding.message)?;
        writeln!(
            self.writer,
            "     {} {}",
            "chain:".dimmed(),
            finding.chain.join(" -> ").cyan()
        )?;
        Ok(())
    }

    fn write_errors(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.errors.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{} ({}):",
            "Analysis errors".yellow().bold(),
            report.errors.len()
        )?;
        for error in &report.errors {
            writeln!(self.writer, "  - {error}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_status(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.has_findings() {
            writeln!(
                self.writer,
                "{} {} unnecessary relay layer(s) found",
                "✗".red().bold(),
                report.findings.len()
            )?;
        } else {
            writeln!(
                self.writer,
                "{} No reactive pass-through chains found",
                "✓".green().bold()
            )?;
        }
        Ok(())
    }
}

fn format_severity(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.to_string().to_uppercase());
    match severity {
        Severity::Error => label.red().bold(),
        Severity::Warning => label.yellow().bold(),
        Severity::Info => label.normal(),
    }
}

pub fn create_writer<'w>(format: OutputFormat, sink: Box<dyn Write + 'w>) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::call_graph::FunctionId;
    use crate::model::SourceLocation;
    use crate::report::{AnalysisStats, FindingKind};
    use crate::analysis::reactive_types::ReactiveKind;

    fn report_with_finding() -> AnalysisReport {
        AnalysisReport {
            findings: vec![Finding {
                kind: FindingKind::ReactivePassThrough,
                severity: Severity::Warning,
                location: SourceLocation::new("Screen.kt", 12, 5),
                parameter: "count".to_string(),
                parameter_kind: ReactiveKind::ValueHolder,
                function: "Middle".to_string(),
                function_id: FunctionId::new("Middle", vec!["State<Int>".to_string()]),
                forwarded_to: "Leaf".to_string(),
                chain: vec!["Middle".to_string(), "Leaf".to_string()],
                origin: None,
                message: "Reactive parameter 'count' of 'Middle' is passed through".to_string(),
            }],
            suppressed: 1,
            errors: vec![],
            stats: AnalysisStats {
                units: 1,
                ui_functions: 2,
                call_sites: 1,
                unresolved_call_sites: 0,
                chains: 1,
                reported_chains: 1,
            },
        }
    }

    #[test]
    fn test_json_writer_emits_report() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&report_with_finding())
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["suppressed"], 1);
        assert_eq!(value["findings"][0]["kind"], "ReactivePassThrough");
        assert_eq!(value["findings"][0]["severity"], "warning");
        assert_eq!(value["findings"][0]["chain"][1], "Leaf");
        assert_eq!(value["stats"]["reported_chains"], 1);
    }

    #[test]
    fn test_terminal_writer_lists_findings() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_report(&report_with_finding())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Reactive Pass-Through Report"));
        assert!(text.contains("[WARNING] Screen.kt:12:5"));
        assert!(text.contains("chain: Middle -> Leaf"));
        assert!(text.contains("Suppressed findings: 1"));
        assert!(text.contains("1 unnecessary relay layer(s) found"));
    }

    #[test]
    fn test_terminal_writer_clean_report() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_report(&AnalysisReport::default())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("No reactive pass-through chains found"));
        assert!(!text.contains("Findings"));
    }
}
