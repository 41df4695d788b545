use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{
    Config, ConfigSource, OPENAI_API_KEY_VAR, OutputFormat, PINECONE_API_KEY_VAR,
    PINECONE_ENVIRONMENT_VAR, QDRANT_API_KEY_VAR,
};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize configuration file")]
    Init {
        #[arg(
            long,
            short = 'g',
            help = "Create global config instead of project config"
        )]
        global: bool,
        #[arg(long, help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Show configuration file paths")]
    Path,
}

/// `init` and `path` never parse the existing config file, so they keep
/// working when it is malformed.
pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { global, force } => handle_init(global, force, formatter.as_ref()),
        ConfigCommand::Show => {
            let (config, source) = Config::load().context("failed to load configuration")?;
            handle_show(&config, &source, format)
        }
        ConfigCommand::Path => handle_path(&Config::locate()),
    }
}

fn handle_init(global: bool, force: bool, formatter: &dyn Formatter) -> Result<()> {
    let config_path = if global {
        Config::global_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?
    } else {
        Config::project_path()
    };

    write_default_config(&config_path, force)?;
    println!(
        "{}",
        formatter.format_message(&format!("Created config at: {}", config_path.display()))
    );

    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    Config::default()
        .save(path)
        .context("failed to write config")?;
    Ok(())
}

/// Secrets read from the environment, paired with whether each is set.
fn secret_status(config: &Config) -> [(&'static str, bool); 4] {
    [
        (OPENAI_API_KEY_VAR, config.embedding.api_key.is_some()),
        (PINECONE_API_KEY_VAR, config.vector_store.api_key.is_some()),
        (
            PINECONE_ENVIRONMENT_VAR,
            config.vector_store.environment.is_some(),
        ),
        (
            QDRANT_API_KEY_VAR,
            config.vector_store.qdrant_api_key.is_some(),
        ),
    ]
}

fn handle_show(config: &Config, source: &ConfigSource, format: OutputFormat) -> Result<()> {
    let secrets = secret_status(config);

    if format == OutputFormat::Json {
        let secrets: serde_json::Map<String, serde_json::Value> = secrets
            .iter()
            .map(|(name, set)| (name.to_string(), serde_json::Value::Bool(*set)))
            .collect();
        let output = serde_json::json!({
            "source": source.to_string(),
            "config": config,
            "secrets": secrets,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("# Loaded from: {}", source);
    println!();
    print!(
        "{}",
        toml::to_string_pretty(config).context("failed to render config")?
    );
    println!();
    println!("# Environment");
    for (name, set) in secrets {
        let value = if set { "********" } else { "(not set)" };
        println!("# {} = {}", name, value);
    }

    Ok(())
}

fn handle_path(source: &ConfigSource) -> Result<()> {
    println!("Configuration paths:");
    println!();

    let project = Config::project_path();
    let marker = |active: bool| if active { "active" } else { "would be" };

    println!(
        "Project config ({}): {}",
        marker(matches!(source, ConfigSource::Project(_))),
        project.display()
    );
    if let Some(global) = Config::global_path() {
        println!(
            "Global config ({}): {}",
            marker(matches!(source, ConfigSource::Global(_))),
            global.display()
        );
    }

    if let Ok(cwd) = std::env::current_dir() {
        let env_path = cwd.join(".env");
        println!(
            ".env file ({}): {}",
            marker(env_path.exists()),
            env_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_NAMESPACE;

    #[test]
    fn test_secret_status_reports_presence_only() {
        let mut config = Config::default();
        config.embedding.api_key = Some("sk-secret".to_string());

        let status = secret_status(&config);
        assert_eq!(status[0], (OPENAI_API_KEY_VAR, true));
        assert_eq!(status[1], (PINECONE_API_KEY_VAR, false));
        assert!(!format!("{:?}", status).contains("sk-secret"));
    }

    #[test]
    fn test_force_init_replaces_malformed_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pdf2vec.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(Config::from_file(&path).is_err());

        write_default_config(&path, true).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.vector_store.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_init_without_force_keeps_existing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pdf2vec.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "this is = = not toml"
        );
    }

    #[tokio::test]
    async fn test_path_command_succeeds() {
        assert!(handle_config(ConfigCommand::Path, OutputFormat::Text).await.is_ok());
    }
}
