//! Shared concurrent handle over a policy store.
//!
//! Embedding callers (typically a server) need checks running in parallel
//! with each other while mutations stay exclusive. [`AccessControl`] wraps
//! the store in a reader-writer lock: checks and accessors take the read
//! lock, mutations the write lock. No operation blocks on I/O, so no
//! internal timeout or cancellation is needed.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::engine::{AccessDecisionEngine, Decision};
use crate::permissions::Permission;
use crate::store::{PolicyError, PolicyStore, Result};

/// A cloneable, thread-safe handle to a policy store and its engine.
///
/// Clones share the same underlying store.
///
/// # Examples
///
/// ```
/// use spinel_rbac::{AccessControl, Permission};
///
/// let acl = AccessControl::default(); // Low < Medium < High
/// acl.add_role("Manager", "Medium")?;
/// acl.add_object("Database1", "Medium")?;
/// acl.bind_user("Bob", "Manager")?;
/// acl.grant("Manager", "Database1", Permission::read())?;
///
/// let decision = acl.check_access("Bob", "Database1", &Permission::read())?;
/// assert!(decision.is_granted());
/// # Ok::<(), spinel_rbac::PolicyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AccessControl {
    inner: Arc<RwLock<PolicyStore>>,
    engine: AccessDecisionEngine,
}

impl AccessControl {
    /// Wraps a store and engine in a shared handle.
    pub fn new(store: PolicyStore, engine: AccessDecisionEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            engine,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PolicyStore>> {
        self.inner
            .read()
            .map_err(|_| PolicyError::Internal("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PolicyStore>> {
        self.inner
            .write()
            .map_err(|_| PolicyError::Internal("lock poisoned".to_string()))
    }

    /// See [`PolicyStore::add_role`].
    pub fn add_role(&self, name: impl Into<String>, level: &str) -> Result<()> {
        self.write()?.add_role(name, level)
    }

    /// See [`PolicyStore::add_object`].
    pub fn add_object(&self, name: impl Into<String>, level: &str) -> Result<()> {
        self.write()?.add_object(name, level)
    }

    /// See [`PolicyStore::bind_user`].
    pub fn bind_user(&self, user: impl Into<String>, role: &str) -> Result<()> {
        self.write()?.bind_user(user, role)
    }

    /// See [`PolicyStore::unbind_user`].
    pub fn unbind_user(&self, user: &str) -> Result<bool> {
        Ok(self.write()?.unbind_user(user))
    }

    /// See [`PolicyStore::grant`].
    pub fn grant(&self, role: &str, object: &str, permission: Permission) -> Result<()> {
        self.write()?.grant(role, object, permission)
    }

    /// See [`PolicyStore::revoke`].
    pub fn revoke(&self, role: &str, object: &str, permission: &Permission) -> Result<()> {
        self.write()?.revoke(role, object, permission)
    }

    /// Evaluates an access request against the current store state.
    ///
    /// The read lock is held for the whole evaluation, so a decision never
    /// observes a torn update. The `Err` case only reports lock poisoning;
    /// policy outcomes, including unknown identifiers, arrive as
    /// [`Decision`] values.
    pub fn check_access(
        &self,
        user: &str,
        object: &str,
        permission: &Permission,
    ) -> Result<Decision> {
        let store = self.read()?;
        Ok(self.engine.check_access(&store, user, object, permission))
    }

    /// Runs a closure against the store under the read lock.
    ///
    /// This is how a display collaborator renders policy state without the
    /// engine growing any formatting of its own.
    pub fn with_store<T>(&self, f: impl FnOnce(&PolicyStore) -> T) -> Result<T> {
        Ok(f(&*self.read()?))
    }

    /// Returns an owned snapshot of the current policy state.
    pub fn snapshot(&self) -> Result<PolicyStore> {
        Ok(self.read()?.clone())
    }
}

impl Default for AccessControl {
    /// An empty store over the default lattice with a default engine.
    fn default() -> Self {
        Self::new(PolicyStore::default(), AccessDecisionEngine::new())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::engine::DenyReason;

    use super::*;

    fn populated() -> AccessControl {
        let acl = AccessControl::new(
            PolicyStore::default(),
            AccessDecisionEngine::new().without_audit(),
        );
        acl.add_role("Admin", "High").unwrap();
        acl.add_object("Server1", "High").unwrap();
        acl.bind_user("Alice", "Admin").unwrap();
        acl.grant("Admin", "Server1", Permission::read()).unwrap();
        acl
    }

    #[test]
    fn clones_share_state() {
        let acl = populated();
        let other = acl.clone();

        other.grant("Admin", "Server1", Permission::write()).unwrap();

        let decision = acl.check_access("Alice", "Server1", &Permission::write()).unwrap();
        assert!(decision.is_granted());
    }

    #[test]
    fn concurrent_checks_and_mutations() {
        let acl = populated();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let acl = acl.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let decision = acl
                            .check_access("Alice", "Server1", &Permission::read())
                            .unwrap();
                        assert!(decision.is_granted());
                    }
                })
            })
            .collect();

        let writer = {
            let acl = acl.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    acl.add_object(format!("Obj{i}"), "Low").unwrap();
                }
            })
        };

        for handle in readers {
            handle.join().unwrap();
        }
        writer.join().unwrap();

        let snapshot = acl.snapshot().unwrap();
        assert_eq!(snapshot.objects().count(), 51);
    }

    #[test]
    fn rebinding_through_handle_changes_decisions() {
        let acl = populated();
        acl.add_role("Employee", "Low").unwrap();
        acl.bind_user("Alice", "Employee").unwrap();

        // Alice now reads up against a High object.
        let decision = acl.check_access("Alice", "Server1", &Permission::read()).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::NoReadDown));
    }

    #[test]
    fn with_store_exposes_read_accessors() {
        let acl = populated();
        let users: Vec<(String, String)> = acl
            .with_store(|store| {
                store
                    .users()
                    .map(|(u, r)| (u.to_string(), r.to_string()))
                    .collect()
            })
            .unwrap();
        assert_eq!(users, vec![("Alice".to_string(), "Admin".to_string())]);
    }
}
