// src/main.rs

use anyhow::Context;
use clap::Parser;
use confluence_query::{
    connect, describe_language, page_schema, ClientConfig, CommandLineInput, ConfigManager,
    CredentialStore, EnvCredentialStore, Executor, LocalConfig, EMAIL_VAR, TOKEN_VAR,
};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::Value;
use std::fs;

/// Sets up logging configuration.
///
/// Console output goes to stderr; stdout carries nothing but the JSON result.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("confluence_query.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn print_json(value: &Value, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}

/// OS keyring first, environment variables second.
#[cfg(feature = "keyring")]
fn credential_store() -> Box<dyn CredentialStore> {
    use confluence_query::{FallbackStore, KeyringStore};
    Box::new(FallbackStore::new(KeyringStore::new(), EnvCredentialStore::new()))
}

#[cfg(not(feature = "keyring"))]
fn credential_store() -> Box<dyn CredentialStore> {
    Box::new(EnvCredentialStore::new())
}

fn load_local_config(cli: &CommandLineInput) -> anyhow::Result<LocalConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let local = manager
        .get_config()
        .with_context(|| format!("loading {}", manager.path().display()))?;
    Ok(local)
}

/// Handles `--login` and `--logout`.
fn manage_credentials(cli: &CommandLineInput, store: &dyn CredentialStore) -> anyhow::Result<()> {
    let local = load_local_config(cli)?;
    let url = ClientConfig::instance_url(cli, &local)?;

    if cli.logout {
        store
            .delete(url.as_str())
            .with_context(|| format!("removing credentials for {}", url))?;
        eprintln!("Removed credentials for {}", url);
        return Ok(());
    }

    let credentials = EnvCredentialStore::new().load(url.as_str()).with_context(|| {
        format!(
            "reading {} and {} from the environment",
            EMAIL_VAR, TOKEN_VAR
        )
    })?;
    store
        .save(&credentials)
        .with_context(|| format!("saving credentials for {}", url))?;
    eprintln!("Saved credentials for {}", url);
    Ok(())
}

/// Resolves configuration, connects and runs the query.
async fn run_query(
    cli: &CommandLineInput,
    store: &dyn CredentialStore,
    query: &str,
) -> anyhow::Result<Value> {
    let local = load_local_config(cli)?;
    let config = ClientConfig::resolve(cli, &local, store)?;
    log::debug!("Resolved client configuration: {:?}", config);

    let executor = Executor::new(connect(&config)?);
    let result = executor.run(query).await?;
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    if cli.schema {
        print_json(&describe_language(&page_schema()), cli.compact)?;
        return Ok(());
    }

    let store = credential_store();
    if cli.login || cli.logout {
        manage_credentials(&cli, store.as_ref())?;
        return Ok(());
    }

    let query = cli.query.as_deref().unwrap_or_default();
    let result = run_query(&cli, store.as_ref(), query).await?;
    print_json(&result, cli.compact)?;

    Ok(())
}
