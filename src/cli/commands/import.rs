//! Import command implementation
//!
//! This module implements the `import` command, the entry point a scheduler
//! calls to load one entity's extract.

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::core::import::{ImportCoordinator, ImportOutcome};
use crate::domain::EntityKind;
use clap::Args;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Entity to import (course, enrol, user)
    pub entity: EntityKind,

    /// Read and validate the extract without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Keep existing rows in the target replica instead of emptying it first
    #[arg(long)]
    pub no_flush: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(entity = %self.entity, "Starting import command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let coordinator = match ImportCoordinator::new(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create import coordinator");
                eprintln!("Failed to initialize import: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let result = if dry_run {
            coordinator.dry_run(self.entity).await
        } else {
            coordinator.run_task(self.entity, !self.no_flush).await
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                crate::log_error_with_context!(&e, "Import failed");
                eprintln!("❌ Import failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match &outcome {
            ImportOutcome::Completed { replica, metadata } => {
                println!("{} rows imported.", metadata.import_count);
                println!("Setting replica as active: {replica}");
                println!("✅ Import complete.");
            }
            ImportOutcome::DryRun { metadata } => {
                println!("Dry run complete.");
                println!("Metadata: {}", metadata.to_json()?);
            }
            ImportOutcome::Skipped { source_timestamp } => {
                println!(
                    "⏭️  Source timestamp {source_timestamp} matches the previous import, nothing to do."
                );
            }
        }

        Ok(EXIT_OK)
    }
}
