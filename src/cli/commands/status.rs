//! Status command implementation
//!
//! This module implements the `status` command for displaying the active
//! replica and import metadata of each entity.

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::alert::LogAlertSink;
use crate::adapters::database::create_storage;
use crate::config::load_config;
use crate::core::import::{ImportCoordinator, ReplicaStatus};
use crate::core::state::ImportMetadata;
use crate::domain::EntityKind;
use chrono::{TimeZone, Utc};
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show this entity (course, enrol, user)
    pub entity: Option<EntityKind>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking import status");

        println!("📊 Import Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let storage = match create_storage(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        let coordinator =
            ImportCoordinator::with_backends(config.sync.clone(), storage, Arc::new(LogAlertSink));

        let kinds: Vec<EntityKind> = match self.entity {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        println!(
            "{:<8} {:<16} {:<8} {:>8} {:>8} {:>8} {:<22} {:<22} {:<20}",
            "Entity", "Replica", "State", "Rows", "Imported", "Declared", "Source Time", "Imported At", "Source File"
        );
        println!("{}", "-".repeat(129));

        for kind in kinds {
            let status = match coordinator.status(kind).await {
                Ok(s) => s,
                Err(e) => {
                    println!("❌ Failed to load status for {kind}");
                    println!("   Error: {e}");
                    return Ok(exit_code_for(&e));
                }
            };
            print_status(&status);
        }

        println!();
        Ok(EXIT_OK)
    }
}

fn print_status(status: &ReplicaStatus) {
    print_replica(
        status.kind,
        status.active,
        "active",
        status.active_rows,
        status.active_metadata.as_ref(),
    );
    print_replica(
        status.kind,
        status.inactive,
        "standby",
        status.inactive_rows,
        status.inactive_metadata.as_ref(),
    );
}

fn print_replica(
    kind: EntityKind,
    replica: &str,
    state: &str,
    rows: u64,
    metadata: Option<&ImportMetadata>,
) {
    match metadata {
        Some(m) => println!(
            "{:<8} {:<16} {:<8} {:>8} {:>8} {:>8} {:<22} {:<22} {:<20}",
            kind.as_str(),
            replica,
            state,
            rows,
            m.import_count,
            m.row_count.map_or_else(|| "-".to_string(), |c| c.to_string()),
            format_unix(m.source_timestamp),
            format_unix(m.imported_time),
            m.source_file
        ),
        None => println!(
            "{:<8} {:<16} {:<8} {:>8} {:>8} {:>8} {:<22} {:<22} {:<20}",
            kind.as_str(),
            replica,
            state,
            rows,
            "-",
            "-",
            "Never",
            "Never",
            ""
        ),
    }
}

fn format_unix(seconds: i64) -> String {
    match Utc.timestamp_opt(seconds, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => seconds.to_string(),
    }
}
