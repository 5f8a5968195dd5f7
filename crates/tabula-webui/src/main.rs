// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tabula Master Web UI
//!
//! Serves the master status pages and the entity export over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Serve the catalog in ./sys_catalog.db on port 8051
//! tabula-webui
//!
//! # Custom port and catalog file
//! tabula-webui --port 9051 --catalog /var/lib/tabula/sys_catalog.db
//!
//! # Using a configuration file
//! tabula-webui --config tabula.toml
//!
//! # Generate an example configuration
//! tabula-webui gen-config --output tabula.toml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabula_webui::{Collaborators, MasterWebUi, WebUiConfig, WebUiOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tabula master web UI
#[derive(Parser, Debug)]
#[command(name = "tabula-webui")]
#[command(about = "Tabula master status pages and entity export")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Persisted catalog file (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "tabula.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::GenConfig { output } => cmd_gen_config(output),
            Commands::Validate { config } => cmd_validate(config),
        };
    }

    let config = build_config(&args)?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Tabula Web UI v{}", env!("CARGO_PKG_VERSION"));
    info!("Master: {} (rpc {})", config.instance_uuid, config.rpc_address);

    let collaborators =
        Collaborators::from_config(&config).context("failed to initialize master state")?;
    let ui = MasterWebUi::new(collaborators, WebUiOptions::from(&config));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    ui.serve(listener, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutting down...");
    })
    .await?;

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<WebUiConfig> {
    let mut config = match &args.config {
        Some(path) => WebUiConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => WebUiConfig::default(),
    };

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = &args.bind {
        config.bind_address = bind.clone();
    }
    if let Some(catalog) = &args.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn cmd_gen_config(output: PathBuf) -> anyhow::Result<()> {
    let toml_str = toml::to_string_pretty(&WebUiConfig::example())?;

    let content = format!(
        r#"# Tabula Master Web UI Configuration
# Generated by tabula-webui gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    match WebUiConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Instance: {}", config.instance_uuid);
            println!("HTTP: {}:{}", config.bind_address, config.port);
            println!("Catalog: {}", config.catalog_path.display());
            println!(
                "Masters: {} ({})",
                config.master_addresses.len().max(1),
                if config.master_addresses.len() > 1 {
                    "distributed"
                } else {
                    "standalone"
                }
            );
            println!("Tablet servers: {}", config.tablet_servers.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}
