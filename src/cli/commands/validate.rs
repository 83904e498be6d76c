//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the xmlsync configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use crate::core::import::join_sync_path;
use crate::domain::EntityKind;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Sync Path: {}", config.sync.sync_path);
        println!("  Stale Threshold: {}s", config.sync.stale_threshold_secs);
        if config.sync.import_count_threshold == 0 {
            println!("  Import Count Threshold: disabled");
        } else {
            println!("  Import Count Threshold: {}", config.sync.import_count_threshold);
        }

        match config.database_target {
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        pg_config
                            .connection_string
                            .expose_secret()
                            .split('@')
                            .next_back()
                            .unwrap_or("***")
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
            DatabaseTarget::Memory => {
                println!("  Database Target: in-memory (nothing is persisted)");
            }
        }

        println!(
            "  Alerts: {}",
            if config.alert.webhook_enabled {
                "webhook"
            } else {
                "log only"
            }
        );
        println!();

        println!("Extract Files:");
        for kind in EntityKind::ALL {
            let filename = kind.spec().filename;
            match join_sync_path(&config.sync.sync_path, filename) {
                Ok(path) if Path::new(&path).is_file() => println!("  ✅ {kind}: {path}"),
                Ok(path) => println!("  ⚠️  {kind}: {path} (not found)"),
                Err(e) => println!("  ❌ {kind}: {e}"),
            }
        }
        println!();

        Ok(EXIT_OK)
    }
}
