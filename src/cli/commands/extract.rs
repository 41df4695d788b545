use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{get_formatter, progress_bar};
use crate::models::{Config, ExtractConfig, ExtractReport, OutputFormat};
use crate::services::PdfExtractor;

#[derive(Debug, Clone, Default, Args)]
pub struct ExtractArgs {
    #[arg(long, short = 'i', help = "Directory searched recursively for PDFs")]
    pub input: Option<PathBuf>,

    #[arg(long, short = 'o', help = "Directory the text files are written to")]
    pub output: Option<PathBuf>,
}

impl ExtractArgs {
    pub fn apply(&self, config: &mut ExtractConfig) {
        if let Some(ref input) = self.input {
            config.input_dir = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = output.clone();
        }
    }
}

pub async fn handle_extract(
    args: ExtractArgs,
    mut config: Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    args.apply(&mut config.extract);

    let input_dir = config.extract.input_dir.clone();
    let report = run_extract(config.extract, format, verbose).await?;

    let formatter = get_formatter(format);
    if report.discovered == 0 {
        println!(
            "{}",
            formatter.format_message(&format!("No PDF files found in {}", input_dir.display()))
        );
        return Ok(());
    }
    println!("{}", formatter.format_extract_report(&report));

    Ok(())
}

/// Run the extractor off the async runtime; PDF decoding is CPU bound.
pub(crate) async fn run_extract(
    config: ExtractConfig,
    format: OutputFormat,
    verbose: bool,
) -> Result<ExtractReport> {
    let pb = progress_bar(format, verbose);
    let extractor = PdfExtractor::new().with_progress(pb.clone());

    let report = tokio::task::spawn_blocking(move || {
        extractor.run(&config.input_dir, &config.output_dir)
    })
    .await
    .context("extraction task failed")?
    .context("extraction failed")?;

    pb.finish_and_clear();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_only_given_paths() {
        let mut config = ExtractConfig::default();
        let args = ExtractArgs {
            input: Some(PathBuf::from("pdfs")),
            output: None,
        };
        args.apply(&mut config);

        assert_eq!(config.input_dir, PathBuf::from("pdfs"));
        assert_eq!(config.output_dir, ExtractConfig::default().output_dir);
    }

    #[tokio::test]
    async fn test_run_extract_missing_input_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ExtractConfig {
            input_dir: dir.path().join("source"),
            output_dir: dir.path().join("output"),
        };

        let err = run_extract(config, OutputFormat::Json, false)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("input directory not found"));
    }
}
