//! CLI commands and handlers
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::MonitorConfig;
use crate::domain::interfaces::InvocationContext;
use crate::domain::price::SnapshotStore;
use crate::infrastructure::FsObjectStore;
use super::handler::{CheckPricesHandler, TriggerEvent};

#[derive(Parser, Debug)]
#[command(name = "petrolwatch", version)]
#[command(about = "Watches fuel prices around a location and alerts on sharp increases")]
pub struct Cli {
    /// TOML config file; environment variables are used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the snapshot buckets
    #[arg(long, global = true, env = "PETROLWATCH_STORE_ROOT", default_value = ".")]
    pub store_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one price check cycle
    Check {
        /// Fetch this URL instead of building the upstream query
        #[arg(long)]
        url: Option<String>,

        /// Trigger event as JSON, e.g. '{"url": "..."}'
        #[arg(long)]
        event: Option<String>,

        /// Function name used for cold start reconfiguration
        #[arg(long, env = "AWS_LAMBDA_FUNCTION_NAME", default_value = "checkPrices")]
        function_name: String,

        /// Current memory size of the function in MB
        #[arg(long, env = "AWS_LAMBDA_FUNCTION_MEMORY_SIZE", default_value_t = 128)]
        memory_mb: u32,
    },

    /// Print the stored snapshot for the configured center
    Snapshot,
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub async fn execute(cli: Cli) -> Result<()> {
        let config = load_config(cli.config.as_ref())?;

        match cli.command {
            Commands::Check {
                url,
                event,
                function_name,
                memory_mb,
            } => {
                let mut trigger = match event {
                    Some(raw) => TriggerEvent::from_json(&raw)?,
                    None => TriggerEvent::default(),
                };
                if url.is_some() {
                    trigger.url = url;
                }

                let context = InvocationContext {
                    function_name,
                    memory_limit_mb: memory_mb,
                };
                let handler = CheckPricesHandler::from_config(&config, &cli.store_root, context)?;
                handler.handle(&trigger).await?;
            }
            Commands::Snapshot => {
                let key = config.center().snapshot_key();
                let store = SnapshotStore::new(
                    Arc::new(FsObjectStore::new(&cli.store_root)),
                    config.prices_bucket.clone(),
                );

                match store.load(&key).await? {
                    Some(snapshot) => {
                        info!("Snapshot {} holds {} stations", key, snapshot.len());
                        println!("{}", serde_json::to_string_pretty(&snapshot)?);
                    }
                    None => println!("No snapshot stored for {}", key),
                }
            }
        }

        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => MonitorConfig::from_env().context("loading configuration from environment"),
    }
}
