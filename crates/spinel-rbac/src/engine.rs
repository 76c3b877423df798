//! Access decision evaluation.
//!
//! Evaluates a (subject, object, permission) request against a
//! [`PolicyStore`] snapshot. Mandatory integrity rules are checked before
//! discretionary grants, and the first failing check fixes the denial
//! reason. No state mutation occurs during a decision.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::permissions::Permission;
use crate::store::PolicyStore;

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenyReason {
    /// The user has no role binding in the store.
    UnknownSubject,
    /// The object is not registered in the store.
    UnknownObject,
    /// A read of higher-integrity data than the subject's level.
    ///
    /// The comparison direction is kept exactly as the system it models
    /// defined it (a "Low Water Mark"-style convention, not textbook Biba).
    NoReadDown,
    /// A write to lower-integrity data than the subject's level.
    NoWriteUp,
    /// Mandatory rules passed but no discretionary grant exists.
    NotAuthorized,
}

impl Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSubject => write!(f, "subject has no assigned role"),
            Self::UnknownObject => write!(f, "object does not exist"),
            Self::NoReadDown => write!(f, "no read down (Biba)"),
            Self::NoWriteUp => write!(f, "no write up (Biba)"),
            Self::NotAuthorized => write!(f, "permission not granted"),
        }
    }
}

/// The outcome of an access check.
///
/// A lookup failure during a check (unknown user or object) is a denial
/// with a specific reason, not an operational error: "denied because the
/// subject is unknown" is itself a security-relevant result callers must
/// be able to distinguish from "explicitly denied by policy".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Mandatory rules passed and a discretionary grant exists.
    Granted,
    /// The request was refused; the reason names the first failing check.
    Denied(DenyReason),
}

impl Decision {
    /// Returns whether access was granted.
    pub fn is_granted(self) -> bool {
        matches!(self, Decision::Granted)
    }

    /// Returns the denial reason, if the request was denied.
    pub fn deny_reason(self) -> Option<DenyReason> {
        match self {
            Decision::Granted => None,
            Decision::Denied(reason) => Some(reason),
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "access granted"),
            Self::Denied(reason) => write!(f, "access denied: {reason}"),
        }
    }
}

/// Stateless access decision engine.
///
/// Holds only configuration: which permission kinds are subject to the
/// mandatory integrity rules (defaulting to exactly `read` / `write`).
/// Evaluation reads a [`PolicyStore`] and never mutates it, so a single
/// engine is safe to share across concurrent callers.
///
/// # Examples
///
/// ```
/// use spinel_rbac::{AccessDecisionEngine, Decision, DenyReason, Permission, PolicyStore};
///
/// let mut store = PolicyStore::default();
/// store.add_role("Employee", "Low")?;
/// store.add_object("HR_Files", "Low")?;
/// store.bind_user("Charlie", "Employee")?;
/// store.grant("Employee", "HR_Files", Permission::read())?;
///
/// let engine = AccessDecisionEngine::new().without_audit();
/// let decision = engine.check_access(&store, "Charlie", "HR_Files", &Permission::read());
/// assert_eq!(decision, Decision::Granted);
///
/// let decision = engine.check_access(&store, "ghost", "HR_Files", &Permission::read());
/// assert_eq!(decision, Decision::Denied(DenyReason::UnknownSubject));
/// # Ok::<(), spinel_rbac::PolicyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecisionEngine {
    /// Permission kinds checked against the no-read-down rule.
    read_kinds: Vec<Permission>,
    /// Permission kinds checked against the no-write-up rule.
    write_kinds: Vec<Permission>,
    /// Whether to emit audit events for every decision.
    audit_enabled: bool,
}

impl AccessDecisionEngine {
    /// Creates an engine with the default mandatory kinds (`read`/`write`).
    pub fn new() -> Self {
        Self {
            read_kinds: vec![Permission::read()],
            write_kinds: vec![Permission::write()],
            audit_enabled: true,
        }
    }

    /// Replaces the permission kinds subject to the mandatory rules.
    ///
    /// Kinds in `read_kinds` are checked against no-read-down, kinds in
    /// `write_kinds` against no-write-up; all other kinds bypass the
    /// mandatory rules and face only discretionary checks.
    pub fn with_mandatory_kinds<R, W>(mut self, read_kinds: R, write_kinds: W) -> Self
    where
        R: IntoIterator<Item = Permission>,
        W: IntoIterator<Item = Permission>,
    {
        self.read_kinds = read_kinds.into_iter().collect();
        self.write_kinds = write_kinds.into_iter().collect();
        self
    }

    /// Disables per-decision audit events (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Evaluates an access request against the store.
    ///
    /// Check order is a contract: unknown subject, unknown object,
    /// no-read-down, no-write-up, then the discretionary grant set. A
    /// grant can never override steps the mandatory rules failed, and
    /// passing the mandatory rules grants nothing by itself.
    pub fn check_access(
        &self,
        store: &PolicyStore,
        user: &str,
        object: &str,
        permission: &Permission,
    ) -> Decision {
        let decision = self.evaluate(store, user, object, permission);

        if self.audit_enabled {
            match decision {
                Decision::Granted => info!(
                    user = %user,
                    object = %object,
                    permission = %permission,
                    "access granted"
                ),
                Decision::Denied(reason) => warn!(
                    user = %user,
                    object = %object,
                    permission = %permission,
                    reason = %reason,
                    "access denied"
                ),
            }
        }

        decision
    }

    fn evaluate(
        &self,
        store: &PolicyStore,
        user: &str,
        object: &str,
        permission: &Permission,
    ) -> Decision {
        let Some(role) = store.user_role(user) else {
            return Decision::Denied(DenyReason::UnknownSubject);
        };

        let Some(object_level) = store.object_level(object) else {
            return Decision::Denied(DenyReason::UnknownObject);
        };

        // Binding invariant: a bound user's role exists in the store. A
        // snapshot deserialized from untrusted input could break this, in
        // which case the subject is treated as unknown.
        let Some(subject_level) = store.role_level(role) else {
            return Decision::Denied(DenyReason::UnknownSubject);
        };

        if self.read_kinds.contains(permission) && subject_level < object_level {
            return Decision::Denied(DenyReason::NoReadDown);
        }

        if self.write_kinds.contains(permission) && subject_level > object_level {
            return Decision::Denied(DenyReason::NoWriteUp);
        }

        if store.is_granted(role, object, permission) {
            Decision::Granted
        } else {
            Decision::Denied(DenyReason::NotAuthorized)
        }
    }
}

impl Default for AccessDecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    /// Store with one role and one object per level, users named after
    /// their role's level.
    fn leveled_store() -> PolicyStore {
        let mut store = PolicyStore::default();
        for level in ["Low", "Medium", "High"] {
            store.add_role(format!("{level}Role"), level).unwrap();
            store.add_object(format!("{level}Obj"), level).unwrap();
            store.bind_user(format!("{level}User"), &format!("{level}Role")).unwrap();
        }
        store
    }

    fn engine() -> AccessDecisionEngine {
        AccessDecisionEngine::new().without_audit()
    }

    #[test]
    fn unknown_subject_short_circuits_before_object_lookup() {
        let store = leveled_store();
        // Object is unknown too; the subject check comes first.
        let decision = engine().check_access(&store, "ghost", "NoSuchObj", &Permission::read());
        assert_eq!(decision, Decision::Denied(DenyReason::UnknownSubject));
    }

    #[test]
    fn unknown_object_is_denied_with_its_own_reason() {
        let store = leveled_store();
        let decision = engine().check_access(&store, "LowUser", "NoSuchObj", &Permission::read());
        assert_eq!(decision, Decision::Denied(DenyReason::UnknownObject));
    }

    #[test]
    fn read_below_object_level_is_denied_despite_grant() {
        let mut store = leveled_store();
        store.grant("LowRole", "HighObj", Permission::read()).unwrap();

        let decision = engine().check_access(&store, "LowUser", "HighObj", &Permission::read());
        assert_eq!(decision, Decision::Denied(DenyReason::NoReadDown));
    }

    #[test]
    fn write_above_object_level_is_denied_despite_grant() {
        let mut store = leveled_store();
        store.grant("HighRole", "LowObj", Permission::write()).unwrap();

        let decision = engine().check_access(&store, "HighUser", "LowObj", &Permission::write());
        assert_eq!(decision, Decision::Denied(DenyReason::NoWriteUp));
    }

    #[test_case("read"; "read at equal levels")]
    #[test_case("write"; "write at equal levels")]
    fn equal_levels_pass_mandatory_and_fall_through_to_grants(kind: &str) {
        let mut store = leveled_store();
        let permission = Permission::new(kind);

        // No grant yet: mandatory passes, discretionary denies.
        let decision = engine().check_access(&store, "MediumUser", "MediumObj", &permission);
        assert_eq!(decision, Decision::Denied(DenyReason::NotAuthorized));

        store.grant("MediumRole", "MediumObj", permission.clone()).unwrap();
        let decision = engine().check_access(&store, "MediumUser", "MediumObj", &permission);
        assert_eq!(decision, Decision::Granted);
    }

    #[test]
    fn high_subject_may_read_down() {
        let mut store = leveled_store();
        store.grant("HighRole", "LowObj", Permission::read()).unwrap();

        let decision = engine().check_access(&store, "HighUser", "LowObj", &Permission::read());
        assert_eq!(decision, Decision::Granted);
    }

    #[test]
    fn low_subject_may_write_up() {
        let mut store = leveled_store();
        store.grant("LowRole", "HighObj", Permission::write()).unwrap();

        let decision = engine().check_access(&store, "LowUser", "HighObj", &Permission::write());
        assert_eq!(decision, Decision::Granted);
    }

    #[test]
    fn unknown_kinds_bypass_mandatory_rules() {
        let mut store = leveled_store();
        let exec = Permission::new("execute");

        // Levels that would fail both mandatory rules do not matter for
        // an unrecognized kind; only the grant set decides.
        let decision = engine().check_access(&store, "LowUser", "HighObj", &exec);
        assert_eq!(decision, Decision::Denied(DenyReason::NotAuthorized));

        store.grant("LowRole", "HighObj", exec.clone()).unwrap();
        let decision = engine().check_access(&store, "LowUser", "HighObj", &exec);
        assert_eq!(decision, Decision::Granted);
    }

    #[test]
    fn mandatory_kinds_are_configurable() {
        let mut store = leveled_store();
        let append = Permission::new("append");
        store.grant("HighRole", "LowObj", append.clone()).unwrap();

        // Default engine: "append" is opaque and the grant wins.
        let decision = engine().check_access(&store, "HighUser", "LowObj", &append);
        assert_eq!(decision, Decision::Granted);

        // Treating "append" as write-like brings it under no-write-up.
        let strict = AccessDecisionEngine::new()
            .with_mandatory_kinds([Permission::read()], [Permission::write(), append.clone()])
            .without_audit();
        let decision = strict.check_access(&store, "HighUser", "LowObj", &append);
        assert_eq!(decision, Decision::Denied(DenyReason::NoWriteUp));
    }

    #[test]
    fn decision_display_is_renderable() {
        assert_eq!(Decision::Granted.to_string(), "access granted");
        assert_eq!(
            Decision::Denied(DenyReason::NoReadDown).to_string(),
            "access denied: no read down (Biba)"
        );
        assert!(Decision::Granted.is_granted());
        assert_eq!(
            Decision::Denied(DenyReason::NotAuthorized).deny_reason(),
            Some(DenyReason::NotAuthorized)
        );
    }

    #[test]
    fn check_access_does_not_mutate_the_store() {
        let mut store = leveled_store();
        store.grant("MediumRole", "MediumObj", Permission::read()).unwrap();
        let before = store.clone();

        let _ = engine().check_access(&store, "MediumUser", "MediumObj", &Permission::read());
        let _ = engine().check_access(&store, "ghost", "MediumObj", &Permission::write());

        assert_eq!(store, before);
    }
}
