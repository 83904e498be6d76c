//! Blue/green replica selection
//!
//! Each entity has two replica tables. Readers use the active one; imports
//! load the inactive one and then flip the active pointer with a single
//! settings write.

use crate::adapters::database::traits::SettingsStore;
use crate::domain::{EntityKind, ImportError, Result};
use std::sync::Arc;

/// Reads and flips the active replica per entity
#[derive(Clone)]
pub struct ReplicaManager {
    settings: Arc<dyn SettingsStore + Send + Sync>,
}

impl ReplicaManager {
    pub fn new(settings: Arc<dyn SettingsStore + Send + Sync>) -> Self {
        Self { settings }
    }

    /// The replica readers should use
    ///
    /// Falls back to the entity's first slot when nothing is stored or the
    /// stored value is not one of the two slot names.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings read fails.
    pub async fn active_replica(&self, kind: EntityKind) -> Result<&'static str> {
        let spec = kind.spec();
        let stored = self.settings.get_setting(spec.active_setting_key).await?;

        match stored.as_deref() {
            Some(name) => match spec.replicas.iter().find(|r| **r == name) {
                Some(replica) => Ok(*replica),
                None => {
                    tracing::warn!(
                        entity = %kind,
                        stored = %name,
                        fallback = %spec.replicas[0],
                        "Stored active replica is not a valid slot"
                    );
                    Ok(spec.replicas[0])
                }
            },
            None => Ok(spec.replicas[0]),
        }
    }

    /// The replica the next import should load
    ///
    /// # Errors
    ///
    /// Returns an error if the settings read fails.
    pub async fn inactive_replica(&self, kind: EntityKind) -> Result<&'static str> {
        let active = self.active_replica(kind).await?;
        Ok(Self::other_replica(kind, active)?)
    }

    /// The slot paired with `name`
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` if `name` is not one of the
    /// entity's slots.
    pub fn other_replica(
        kind: EntityKind,
        name: &str,
    ) -> std::result::Result<&'static str, ImportError> {
        let [a, b] = kind.spec().replicas;
        if name == a {
            Ok(b)
        } else if name == b {
            Ok(a)
        } else {
            Err(ImportError::InvalidReplica(name.to_string()))
        }
    }

    /// Checks that `name` is one of the entity's slots
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` otherwise.
    pub fn validate(kind: EntityKind, name: &str) -> std::result::Result<(), ImportError> {
        Self::resolve(kind, name).map(|_| ())
    }

    /// The entity's slot named `name`
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` if there is no such slot.
    pub fn resolve(kind: EntityKind, name: &str) -> std::result::Result<&'static str, ImportError> {
        kind.spec()
            .replicas
            .iter()
            .copied()
            .find(|replica| *replica == name)
            .ok_or_else(|| ImportError::InvalidReplica(name.to_string()))
    }

    /// Makes `name` the active replica
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` for an unknown slot (nothing is
    /// written), or an error if the settings write fails.
    pub async fn set_active(&self, kind: EntityKind, name: &str) -> Result<()> {
        Self::validate(kind, name)?;

        self.settings
            .set_setting(kind.spec().active_setting_key, name)
            .await?;

        tracing::info!(entity = %kind, replica = %name, "Active replica switched");
        Ok(())
    }
}
