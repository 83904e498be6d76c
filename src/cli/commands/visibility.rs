//! Visibility command implementation

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::database::create_storage;
use crate::config::load_config;
use crate::core::replica::ReplicaManager;
use crate::core::visibility::{CourseVisibilityLookup, ReplicaVisibilityLookup};
use clap::Args;

/// Arguments for the visibility command
#[derive(Args, Debug)]
pub struct VisibilityArgs {
    /// Course idnumber to look up (case-insensitive)
    pub course_idnumber: String,
}

impl VisibilityArgs {
    /// Execute the visibility command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let storage = match create_storage(&config).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to connect to database: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let lookup = ReplicaVisibilityLookup::new(
            ReplicaManager::new(storage.settings.clone()),
            storage.reader.clone(),
        );

        match lookup.lookup_visibility(&self.course_idnumber).await {
            Ok(Some(visibility)) => println!("{}: {visibility}", self.course_idnumber),
            Ok(None) => println!("{}: no imported course matches", self.course_idnumber),
            Err(e) => {
                eprintln!("Lookup failed: {e}");
                return Ok(exit_code_for(&e));
            }
        }
        Ok(EXIT_OK)
    }
}
