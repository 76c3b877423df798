//! # spinel-rbac: Role-Based Access Control with Biba integrity
//!
//! Policy-decision engine answering, for a (subject, object, action)
//! triple, whether the action is permitted:
//! - **Mandatory integrity rules** (Biba-style no-read-down / no-write-up)
//! - **Discretionary grants** (per-role, per-object permission sets)
//! - **Integrity lattice** (configurable total order over levels)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                              │
//! │  (user, object, permission)                  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AccessDecisionEngine                        │
//! │  ├─ Resolve subject and object               │
//! │  ├─ Mandatory integrity rules (Biba)         │
//! │  └─ Discretionary grant lookup               │
//! └─────────────────┬───────────────────────────┘
//!                   │ reads
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  PolicyStore                                 │
//! │  ├─ Roles (integrity level + grant map)      │
//! │  ├─ Objects (integrity level)                │
//! │  └─ User → role bindings                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: mutations go into the [`PolicyStore`]; decisions
//! are derived by the engine reading it. Mandatory rules are evaluated
//! before discretionary grants, so a grant can never bypass them.
//!
//! ## Evaluation order
//!
//! | Step | Check                          | Denial reason      |
//! |------|--------------------------------|--------------------|
//! | 1    | Subject has a role binding     | `UnknownSubject`   |
//! | 2    | Object is registered           | `UnknownObject`    |
//! | 3    | `read` and subject < object    | `NoReadDown`       |
//! | 4    | `write` and subject > object   | `NoWriteUp`        |
//! | 5    | Permission in grant set        | `NotAuthorized`    |
//!
//! ## Examples
//!
//! ```
//! use spinel_rbac::{
//!     AccessDecisionEngine, Decision, DenyReason, Permission, PolicyStore,
//! };
//!
//! let mut store = PolicyStore::default(); // Low < Medium < High
//!
//! store.add_role("Admin", "High")?;
//! store.add_role("Employee", "Low")?;
//! store.add_object("Server1", "High")?;
//! store.add_object("HR_Files", "Low")?;
//! store.bind_user("Alice", "Admin")?;
//! store.grant("Admin", "Server1", Permission::read())?;
//!
//! let engine = AccessDecisionEngine::new();
//!
//! // Discretionary grant, integrity levels agree.
//! let decision = engine.check_access(&store, "Alice", "Server1", &Permission::read());
//! assert_eq!(decision, Decision::Granted);
//!
//! // A Low subject reading High data trips no-read-down, grants or not.
//! store.bind_user("Charlie", "Employee")?;
//! store.grant("Employee", "Server1", Permission::read())?;
//! let decision = engine.check_access(&store, "Charlie", "Server1", &Permission::read());
//! assert_eq!(decision, Decision::Denied(DenyReason::NoReadDown));
//! # Ok::<(), spinel_rbac::PolicyError>(())
//! ```
//!
//! For concurrent embedding, wrap the store in an [`AccessControl`]
//! handle: checks run in parallel under a read lock, mutations take the
//! write lock. Construction config (levels, mandatory kinds) is a
//! serde-friendly [`EngineConfig`].

pub mod config;
pub mod control;
pub mod engine;
pub mod permissions;
pub mod store;

// Re-export commonly used types
pub use config::EngineConfig;
pub use control::AccessControl;
pub use engine::{AccessDecisionEngine, Decision, DenyReason};
pub use permissions::{Permission, PermissionSet};
pub use spinel_types::{IntegrityLattice, IntegrityLevel, LatticeError};
pub use store::{PolicyError, PolicyStore, Result, Role};

// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;
