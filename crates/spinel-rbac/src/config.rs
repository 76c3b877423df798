//! Engine construction configuration.
//!
//! Everything the engine consumes at construction: the ordered list of
//! recognized integrity levels and the permission kinds subject to the
//! mandatory rules. Callers typically deserialize this from a config file
//! section; defaults mirror the classic three-level setup.

use serde::{Deserialize, Serialize};
use spinel_types::{IntegrityLattice, LatticeError};

use crate::control::AccessControl;
use crate::engine::AccessDecisionEngine;
use crate::permissions::Permission;
use crate::store::PolicyStore;

/// Construction-time configuration for an access control instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recognized integrity levels, lowest first. Must be non-empty and
    /// strictly ordered (no duplicates).
    pub levels: Vec<String>,

    /// Permission kinds checked against the no-read-down rule.
    pub mandatory_read: Vec<String>,

    /// Permission kinds checked against the no-write-up rule.
    pub mandatory_write: Vec<String>,

    /// Whether decisions emit audit events.
    pub audit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            levels: vec!["Low".to_string(), "Medium".to_string(), "High".to_string()],
            mandatory_read: vec!["read".to_string()],
            mandatory_write: vec!["write".to_string()],
            audit: true,
        }
    }
}

impl EngineConfig {
    /// Builds a shared [`AccessControl`] handle from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`LatticeError`] if the level list is empty, contains
    /// duplicates, or exceeds the supported size.
    pub fn build(&self) -> Result<AccessControl, LatticeError> {
        let lattice = IntegrityLattice::new(self.levels.iter().cloned())?;

        let mut engine = AccessDecisionEngine::new().with_mandatory_kinds(
            self.mandatory_read.iter().cloned().map(Permission::from),
            self.mandatory_write.iter().cloned().map(Permission::from),
        );
        if !self.audit {
            engine = engine.without_audit();
        }

        Ok(AccessControl::new(PolicyStore::new(lattice), engine))
    }
}
