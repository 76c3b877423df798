//! The authoritative policy state.
//!
//! [`PolicyStore`] owns roles, objects, user bindings, and per-(role,
//! object) discretionary permission sets. Every mutation validates its
//! preconditions before touching state; read accessors are pure. Decisions
//! are derived by the engine reading a store — nothing writes back through
//! the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use spinel_types::{IntegrityLattice, IntegrityLevel, LatticeError};
use thiserror::Error;
use tracing::info;

use crate::permissions::{Permission, PermissionSet};

/// Error type for policy mutations.
///
/// All variants are recoverable; a failed mutation leaves the store
/// untouched. Decision outcomes are a separate channel — see
/// [`Decision`](crate::engine::Decision).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The level name is not part of the configured lattice.
    #[error("invalid integrity level '{level}'")]
    InvalidIntegrityLevel { level: String },

    /// A role with this name already exists. Registration is not an
    /// overwrite: the existing role and its grants are untouched.
    #[error("role '{name}' already exists")]
    DuplicateRole { name: String },

    /// An object with this name already exists.
    #[error("object '{name}' already exists")]
    DuplicateObject { name: String },

    /// No role with this name is registered.
    #[error("role '{name}' does not exist")]
    UnknownRole { name: String },

    /// No object with this name is registered.
    #[error("object '{name}' does not exist")]
    UnknownObject { name: String },

    /// The permission was not present in the role's grant set for the
    /// object. Distinct from `UnknownRole`/`UnknownObject` so callers can
    /// detect no-op revokes on otherwise valid identifiers.
    #[error("permission '{permission}' does not exist for role '{role}' on '{object}'")]
    PermissionNotFound {
        role: String,
        object: String,
        permission: Permission,
    },

    /// Invariant violation inside the shared handle (lock poisoned).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

impl From<LatticeError> for PolicyError {
    fn from(err: LatticeError) -> Self {
        match err {
            LatticeError::UnknownLevel(level) => PolicyError::InvalidIntegrityLevel { level },
            other => PolicyError::Internal(other.to_string()),
        }
    }
}

/// A role: one integrity level (immutable after creation) plus the
/// discretionary grants it holds per object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    level: IntegrityLevel,
    grants: HashMap<String, PermissionSet>,
}

impl Role {
    fn new(level: IntegrityLevel) -> Self {
        Self {
            level,
            grants: HashMap::new(),
        }
    }

    /// The role's integrity level, assigned at creation.
    pub fn level(&self) -> IntegrityLevel {
        self.level
    }

    /// Iterates over this role's grant sets by object name.
    pub fn grants(&self) -> impl Iterator<Item = (&str, &PermissionSet)> {
        self.grants.iter().map(|(obj, set)| (obj.as_str(), set))
    }
}

/// The policy store.
///
/// Construction fixes the integrity lattice for the store's lifetime.
/// Roles and objects are registered once and live for the session; user
/// bindings may be replaced. See [`AccessControl`](crate::control::AccessControl)
/// for the shared concurrent handle.
///
/// # Examples
///
/// ```
/// use spinel_rbac::{Permission, PolicyStore};
///
/// let mut store = PolicyStore::default(); // Low < Medium < High
/// store.add_role("Admin", "High")?;
/// store.add_object("Server1", "High")?;
/// store.bind_user("Alice", "Admin")?;
/// store.grant("Admin", "Server1", Permission::read())?;
///
/// assert!(store.is_granted("Admin", "Server1", &Permission::read()));
/// assert_eq!(store.user_role("Alice"), Some("Admin"));
/// # Ok::<(), spinel_rbac::PolicyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStore {
    lattice: IntegrityLattice,
    roles: HashMap<String, Role>,
    objects: HashMap<String, IntegrityLevel>,
    users: HashMap<String, String>,
}

impl PolicyStore {
    /// Creates an empty store over the given lattice.
    pub fn new(lattice: IntegrityLattice) -> Self {
        Self {
            lattice,
            roles: HashMap::new(),
            objects: HashMap::new(),
            users: HashMap::new(),
        }
    }

    /// The lattice this store validates levels against.
    pub fn lattice(&self) -> &IntegrityLattice {
        &self.lattice
    }

    /// Creates a role with the given integrity level and an empty grant map.
    ///
    /// # Errors
    ///
    /// [`PolicyError::InvalidIntegrityLevel`] if the level is unrecognized,
    /// [`PolicyError::DuplicateRole`] if the name is taken.
    pub fn add_role(&mut self, name: impl Into<String>, level: &str) -> Result<()> {
        let name = name.into();
        let level = self.lattice.level(level)?;
        if self.roles.contains_key(&name) {
            return Err(PolicyError::DuplicateRole { name });
        }

        info!(
            role = %name,
            level = self.lattice.name_of(level),
            "role created"
        );
        self.roles.insert(name, Role::new(level));
        Ok(())
    }

    /// Registers an object with the given integrity level.
    ///
    /// # Errors
    ///
    /// [`PolicyError::InvalidIntegrityLevel`] if the level is unrecognized,
    /// [`PolicyError::DuplicateObject`] if the name is taken.
    pub fn add_object(&mut self, name: impl Into<String>, level: &str) -> Result<()> {
        let name = name.into();
        let level = self.lattice.level(level)?;
        if self.objects.contains_key(&name) {
            return Err(PolicyError::DuplicateObject { name });
        }

        info!(
            object = %name,
            level = self.lattice.name_of(level),
            "object registered"
        );
        self.objects.insert(name, level);
        Ok(())
    }

    /// Binds a user to a role, replacing any previous binding atomically.
    ///
    /// A user's effective integrity level is always its role's level;
    /// nothing user-specific is stored beyond the binding itself.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownRole`] if the role is not registered.
    pub fn bind_user(&mut self, user: impl Into<String>, role: &str) -> Result<()> {
        let user = user.into();
        if !self.roles.contains_key(role) {
            return Err(PolicyError::UnknownRole {
                name: role.to_string(),
            });
        }

        info!(user = %user, role = %role, "user bound to role");
        self.users.insert(user, role.to_string());
        Ok(())
    }

    /// Removes a user's role binding, if any.
    ///
    /// Returns whether a binding existed. An unbound user is simply an
    /// unknown subject to the decision engine.
    pub fn unbind_user(&mut self, user: &str) -> bool {
        let removed = self.users.remove(user).is_some();
        if removed {
            info!(user = %user, "user binding removed");
        }
        removed
    }

    /// Adds `permission` to the role's grant set for the object.
    ///
    /// Granting an already-granted permission is a no-op success.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownRole`] / [`PolicyError::UnknownObject`] if
    /// either identifier is not registered (grants validate at grant time).
    pub fn grant(&mut self, role: &str, object: &str, permission: Permission) -> Result<()> {
        if !self.objects.contains_key(object) {
            return Err(PolicyError::UnknownObject {
                name: object.to_string(),
            });
        }
        let entry = self.roles.get_mut(role).ok_or_else(|| PolicyError::UnknownRole {
            name: role.to_string(),
        })?;

        info!(role = %role, object = %object, permission = %permission, "permission granted");
        entry.grants.entry(object.to_string()).or_default().grant(permission);
        Ok(())
    }

    /// Removes `permission` from the role's grant set for the object.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownRole`] / [`PolicyError::UnknownObject`] for
    /// invalid identifiers; [`PolicyError::PermissionNotFound`] if the
    /// identifiers are valid but the permission was not granted. The store
    /// is unchanged in every error case.
    pub fn revoke(&mut self, role: &str, object: &str, permission: &Permission) -> Result<()> {
        if !self.objects.contains_key(object) {
            return Err(PolicyError::UnknownObject {
                name: object.to_string(),
            });
        }
        let entry = self.roles.get_mut(role).ok_or_else(|| PolicyError::UnknownRole {
            name: role.to_string(),
        })?;

        let removed = entry
            .grants
            .get_mut(object)
            .is_some_and(|set| set.revoke(permission));

        if removed {
            info!(role = %role, object = %object, permission = %permission, "permission revoked");
            Ok(())
        } else {
            Err(PolicyError::PermissionNotFound {
                role: role.to_string(),
                object: object.to_string(),
                permission: permission.clone(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Read accessors (pure; the engine and any renderer consume these)
    // ------------------------------------------------------------------

    /// Resolves a user to its bound role name.
    pub fn user_role(&self, user: &str) -> Option<&str> {
        self.users.get(user).map(String::as_str)
    }

    /// Resolves a role's integrity level.
    pub fn role_level(&self, role: &str) -> Option<IntegrityLevel> {
        self.roles.get(role).map(Role::level)
    }

    /// Resolves an object's integrity level.
    pub fn object_level(&self, object: &str) -> Option<IntegrityLevel> {
        self.objects.get(object).copied()
    }

    /// Returns whether the role's grant set contains `permission` for the
    /// object. Unknown identifiers simply report `false`.
    pub fn is_granted(&self, role: &str, object: &str, permission: &Permission) -> bool {
        self.roles
            .get(role)
            .and_then(|r| r.grants.get(object))
            .is_some_and(|set| set.contains(permission))
    }

    /// Iterates over registered roles by name.
    pub fn roles(&self) -> impl Iterator<Item = (&str, &Role)> {
        self.roles.iter().map(|(name, role)| (name.as_str(), role))
    }

    /// Iterates over registered objects and their levels.
    pub fn objects(&self) -> impl Iterator<Item = (&str, IntegrityLevel)> {
        self.objects.iter().map(|(name, level)| (name.as_str(), *level))
    }

    /// Iterates over user bindings as (user, role) pairs.
    pub fn users(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users.iter().map(|(u, r)| (u.as_str(), r.as_str()))
    }
}

impl Default for PolicyStore {
    /// An empty store over the `Low < Medium < High` lattice.
    fn default() -> Self {
        Self::new(IntegrityLattice::default())
    }
}
