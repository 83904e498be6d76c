//! Activate command implementation
//!
//! Points readers at a named replica. Operators use it to roll back to the
//! previous import when a newly activated one turns out to be bad.

use super::{exit_code_for, EXIT_CONFIG, EXIT_IMPORT_REJECTED, EXIT_OK};
use crate::adapters::database::create_storage;
use crate::config::load_config;
use crate::core::replica::ReplicaManager;
use crate::core::state::MetadataStore;
use crate::domain::EntityKind;
use clap::Args;

/// Arguments for the activate command
#[derive(Args, Debug)]
pub struct ActivateArgs {
    /// Entity whose replica to switch (course, enrol, user)
    pub entity: EntityKind,

    /// Replica to make active, e.g. `userimport_a`
    pub replica: String,

    /// Activate even if the replica has never completed an import
    #[arg(long)]
    pub force: bool,
}

impl ActivateArgs {
    /// Execute the activate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        if let Err(e) = ReplicaManager::validate(self.entity, &self.replica) {
            println!("❌ {e}");
            println!(
                "   Valid replicas for {}: {}",
                self.entity,
                self.entity.spec().replicas.join(", ")
            );
            return Ok(EXIT_IMPORT_REJECTED);
        }

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

        let metadata = MetadataStore::new(storage.settings.clone());
        let loaded = match metadata.load(self.entity, &self.replica).await {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Failed to read replica metadata");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        if loaded.is_none() && !self.force {
            println!("❌ {} has never completed an import", self.replica);
            println!("   Use --force to activate it anyway");
            return Ok(EXIT_IMPORT_REJECTED);
        }

        let replicas = ReplicaManager::new(storage.settings);
        if let Err(e) = replicas.set_active(self.entity, &self.replica).await {
            println!("❌ Failed to switch replica");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        println!("✅ Setting replica as active: {}", self.replica);
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_foreign_replica_is_rejected_before_loading_config() {
        let args = ActivateArgs {
            entity: EntityKind::User,
            replica: "courseimport_a".to_string(),
            force: false,
        };

        let code = args.execute("/nonexistent/xmlsync.toml").await.unwrap();
        assert_eq!(code, EXIT_IMPORT_REJECTED);
    }
}
