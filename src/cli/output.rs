use std::fmt::Write as FmtWrite;

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::{EmbedReport, ExtractReport, ItemFailure, OutputFormat};

pub trait Formatter {
    fn format_extract_report(&self, report: &ExtractReport) -> String;
    fn format_embed_report(&self, report: &EmbedReport, target: &EmbedTarget) -> String;
    fn format_message(&self, message: &str) -> String;
}

/// Where an embed run wrote its records.
#[derive(Debug, Clone)]
pub struct EmbedTarget {
    pub driver: String,
    pub index: String,
    pub namespace: String,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_extract_report(&self, report: &ExtractReport) -> String {
        let mut output = String::new();
        writeln!(output, "Extraction complete").unwrap();
        writeln!(output, "  PDFs found:    {}", report.discovered).unwrap();
        writeln!(output, "  Texts written: {}", report.written.len()).unwrap();
        writeln!(output, "  Failed:        {}", report.failures.len()).unwrap();
        write_failures_text(&mut output, &report.failures);
        output
    }

    fn format_embed_report(&self, report: &EmbedReport, target: &EmbedTarget) -> String {
        let mut output = String::new();
        writeln!(output, "Embedding complete").unwrap();
        writeln!(
            output,
            "  Target:          {} {}/{}",
            target.driver, target.index, target.namespace
        )
        .unwrap();
        writeln!(output, "  Files found:     {}", report.documents).unwrap();
        writeln!(output, "  Files embedded:  {}", report.embedded).unwrap();
        writeln!(output, "  Chunks uploaded: {}", report.chunks_uploaded).unwrap();
        if report.files_truncated > 0 {
            writeln!(output, "  Files truncated: {}", report.files_truncated).unwrap();
        }
        writeln!(output, "  Failed:          {}", report.failures.len()).unwrap();
        write_failures_text(&mut output, &report.failures);
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

fn write_failures_text(output: &mut String, failures: &[ItemFailure]) {
    for failure in failures {
        writeln!(output, "    {}: {}", failure.path.display(), failure.error).unwrap();
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl Formatter for JsonFormatter {
    fn format_extract_report(&self, report: &ExtractReport) -> String {
        self.render(&serde_json::json!({ "extract": report }))
    }

    fn format_embed_report(&self, report: &EmbedReport, target: &EmbedTarget) -> String {
        self.render(&serde_json::json!({
            "embed": report,
            "target": {
                "driver": target.driver,
                "index": target.index,
                "namespace": target.namespace,
            }
        }))
    }

    fn format_message(&self, message: &str) -> String {
        self.render(&serde_json::json!({ "message": message }))
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_extract_report(&self, report: &ExtractReport) -> String {
        let mut output = String::new();
        writeln!(output, "## Extraction\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| PDFs found | {} |", report.discovered).unwrap();
        writeln!(output, "| Texts written | {} |", report.written.len()).unwrap();
        writeln!(output, "| Failed | {} |", report.failures.len()).unwrap();
        write_failures_markdown(&mut output, &report.failures);
        output
    }

    fn format_embed_report(&self, report: &EmbedReport, target: &EmbedTarget) -> String {
        let mut output = String::new();
        writeln!(output, "## Embedding\n").unwrap();
        writeln!(
            output,
            "Target: `{}` index `{}`, namespace `{}`\n",
            target.driver, target.index, target.namespace
        )
        .unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Files found | {} |", report.documents).unwrap();
        writeln!(output, "| Files embedded | {} |", report.embedded).unwrap();
        writeln!(output, "| Chunks uploaded | {} |", report.chunks_uploaded).unwrap();
        writeln!(output, "| Files truncated | {} |", report.files_truncated).unwrap();
        writeln!(output, "| Failed | {} |", report.failures.len()).unwrap();
        write_failures_markdown(&mut output, &report.failures);
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}", message)
    }
}

fn write_failures_markdown(output: &mut String, failures: &[ItemFailure]) {
    if failures.is_empty() {
        return;
    }
    writeln!(output, "\n### Failures\n").unwrap();
    for failure in failures {
        writeln!(output, "- `{}`: {}", failure.path.display(), failure.error).unwrap();
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

/// Progress bar for text output; hidden for machine formats and verbose runs,
/// where per-file log lines take its place.
pub fn progress_bar(format: OutputFormat, verbose: bool) -> ProgressBar {
    if format != OutputFormat::Text || verbose {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_embed_report() -> EmbedReport {
        EmbedReport {
            documents: 3,
            embedded: 2,
            chunks_uploaded: 5,
            files_truncated: 0,
            failures: vec![ItemFailure {
                path: PathBuf::from("output/bad.txt"),
                error: "chunk 2: embedding server error: status 500".to_string(),
            }],
        }
    }

    fn target() -> EmbedTarget {
        EmbedTarget {
            driver: "pinecone".to_string(),
            index: "discorddemo".to_string(),
            namespace: "shoe".to_string(),
        }
    }

    #[test]
    fn test_text_embed_report_lists_failures() {
        let out = TextFormatter.format_embed_report(&sample_embed_report(), &target());
        assert!(out.contains("Chunks uploaded: 5"));
        assert!(out.contains("output/bad.txt: chunk 2"));
        assert!(out.contains("pinecone discorddemo/shoe"));
    }

    #[test]
    fn test_json_extract_report() {
        let report = ExtractReport {
            discovered: 2,
            written: vec![PathBuf::from("output/a_output.txt")],
            failures: vec![],
        };
        let out = JsonFormatter::new(false).format_extract_report(&report);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["extract"]["discovered"], 2);
        assert_eq!(value["extract"]["written"][0], "output/a_output.txt");
    }

    #[test]
    fn test_json_embed_report_counts_truncated_files() {
        let report = EmbedReport {
            files_truncated: 1,
            ..sample_embed_report()
        };
        let out = JsonFormatter::new(false).format_embed_report(&report, &target());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["embed"]["files_truncated"], 1);
        assert!(value["embed"].get("chunks_truncated").is_none());
        assert_eq!(value["target"]["namespace"], "shoe");
    }

    #[test]
    fn test_markdown_message() {
        assert_eq!(MarkdownFormatter.format_message("done"), "> done");
    }

    #[test]
    fn test_progress_bar_hidden_for_json() {
        assert!(progress_bar(OutputFormat::Json, false).is_hidden());
        assert!(progress_bar(OutputFormat::Text, true).is_hidden());
    }
}
