//! Permission types for access control.
//!
//! Permissions are an open tag domain: `read` and `write` are the only
//! kinds the mandatory integrity rules know about, and every other kind is
//! treated opaquely, subject only to discretionary checks.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Permission kind that can be granted to a role for an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Creates a permission from an arbitrary tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The `read` permission, subject to the no-read-down integrity rule.
    pub fn read() -> Self {
        Self("read".to_string())
    }

    /// The `write` permission, subject to the no-write-up integrity rule.
    pub fn write() -> Self {
        Self("write".to_string())
    }

    /// Returns the permission's tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Permission {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for Permission {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Set of permissions granted to a role for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    /// Returns whether this set contains the given permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Adds a permission to the set. Granting an already-granted
    /// permission is a no-op.
    pub fn grant(&mut self, permission: Permission) {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
    }

    /// Removes a permission from the set.
    ///
    /// Returns whether the permission was present, so callers can
    /// distinguish a real revoke from a no-op.
    pub fn revoke(&mut self, permission: &Permission) -> bool {
        let before = self.permissions.len();
        self.permissions.retain(|p| p != permission);
        self.permissions.len() != before
    }

    /// Returns all permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Returns whether the set holds no permissions.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns the number of permissions in the set.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        let mut set = Self::empty();
        for p in permissions {
            set.grant(p);
        }
        set
    }
}
