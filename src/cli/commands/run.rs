use anyhow::Result;
use clap::Args;

use super::embed::{EmbedOverrides, check_embed_config, run_embed};
use super::extract::{ExtractArgs, run_extract};
use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub paths: ExtractArgs,

    #[command(flatten)]
    pub overrides: EmbedOverrides,
}

/// Extract, then embed the extractor's output directory. Embed settings and
/// secrets are checked before any PDF is read.
pub async fn handle_run(
    args: RunArgs,
    mut config: Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    args.paths.apply(&mut config.extract);
    args.overrides.apply(&mut config);
    check_embed_config(&config)?;

    let formatter = get_formatter(format);

    let extract_report = run_extract(config.extract.clone(), format, verbose).await?;
    println!("{}", formatter.format_extract_report(&extract_report));

    let (embed_report, target) = run_embed(&config, format, verbose).await?;
    println!("{}", formatter.format_embed_report(&embed_report, &target));

    Ok(())
}
