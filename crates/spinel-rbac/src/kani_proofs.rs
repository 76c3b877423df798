//! Kani bounded model checking proofs for decision correctness.
//!
//! These proofs verify the non-overridable ordering of the decision
//! algorithm:
//! - Mandatory dominance: a discretionary grant can never bypass the
//!   integrity rules
//! - Unknown identifiers short-circuit before any policy evaluation
//! - Decisions never mutate the store

use crate::engine::{AccessDecisionEngine, Decision, DenyReason};
use crate::permissions::Permission;
use crate::store::PolicyStore;

const LEVELS: [&str; 3] = ["Low", "Medium", "High"];

/// Store with one fully-granted role/object/user per level.
fn granted_store(permission: &Permission) -> PolicyStore {
    let mut store = PolicyStore::default();
    for level in LEVELS {
        store.add_role(format!("role-{level}"), level).unwrap();
        store.add_object(format!("obj-{level}"), level).unwrap();
        store
            .bind_user(format!("user-{level}"), &format!("role-{level}"))
            .unwrap();
    }
    for role_level in LEVELS {
        for obj_level in LEVELS {
            store
                .grant(
                    &format!("role-{role_level}"),
                    &format!("obj-{obj_level}"),
                    permission.clone(),
                )
                .unwrap();
        }
    }
    store
}

//=============================================================================
// Proof: Mandatory dominance for reads
//=============================================================================

/// Verifies that no grant combination lets a lower-integrity subject read
/// higher-integrity data.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_read_rule_dominates_grants() {
    let subject: usize = kani::any();
    let object: usize = kani::any();
    kani::assume(subject < LEVELS.len() && object < LEVELS.len());

    let store = granted_store(&Permission::read());
    let engine = AccessDecisionEngine::new().without_audit();

    let decision = engine.check_access(
        &store,
        &format!("user-{}", LEVELS[subject]),
        &format!("obj-{}", LEVELS[object]),
        &Permission::read(),
    );

    if subject < object {
        assert_eq!(decision, Decision::Denied(DenyReason::NoReadDown));
    } else {
        assert_eq!(decision, Decision::Granted);
    }
}

//=============================================================================
// Proof: Mandatory dominance for writes
//=============================================================================

/// Verifies that no grant combination lets a higher-integrity subject write
/// lower-integrity data.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_write_rule_dominates_grants() {
    let subject: usize = kani::any();
    let object: usize = kani::any();
    kani::assume(subject < LEVELS.len() && object < LEVELS.len());

    let store = granted_store(&Permission::write());
    let engine = AccessDecisionEngine::new().without_audit();

    let decision = engine.check_access(
        &store,
        &format!("user-{}", LEVELS[subject]),
        &format!("obj-{}", LEVELS[object]),
        &Permission::write(),
    );

    if subject > object {
        assert_eq!(decision, Decision::Denied(DenyReason::NoWriteUp));
    } else {
        assert_eq!(decision, Decision::Granted);
    }
}

//=============================================================================
// Proof: Unknown subjects short-circuit
//=============================================================================

/// Verifies that an unbound user is denied as an unknown subject before
/// the object or any policy is consulted, and that the check mutates
/// nothing.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_unknown_subject_short_circuits() {
    let store = granted_store(&Permission::read());
    let before = store.clone();
    let engine = AccessDecisionEngine::new().without_audit();

    let decision = engine.check_access(&store, "ghost", "obj-Low", &Permission::read());
    assert_eq!(decision, Decision::Denied(DenyReason::UnknownSubject));
    assert_eq!(store, before);
}
