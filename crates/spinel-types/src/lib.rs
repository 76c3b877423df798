//! # spinel-types: Core types for `Spinel`
//!
//! This crate contains the shared value types used across the `Spinel`
//! policy engine:
//! - Integrity ordering ([`IntegrityLevel`], [`IntegrityLattice`])
//! - Lattice construction/lookup failures ([`LatticeError`])
//!
//! The lattice is configured once at system start and is immutable
//! afterward. Every [`IntegrityLevel`] in circulation was issued by a
//! lattice lookup, so any two levels from the same lattice compare with
//! plain `<` / `>` / `==`.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

// ============================================================================
// IntegrityLevel - Copy (cheap 1-byte rank)
// ============================================================================

/// A validated integrity level, identified by its rank within a lattice.
///
/// Levels are totally ordered: rank 0 is the lowest integrity in the
/// lattice, and higher ranks are higher integrity. Comparison is the sole
/// operation; the level's human-readable name lives in the issuing
/// [`IntegrityLattice`] (see [`IntegrityLattice::name_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntegrityLevel(u8);

impl IntegrityLevel {
    /// Returns the rank of this level within its lattice (0 = lowest).
    pub fn rank(self) -> u8 {
        self.0
    }
}

impl From<IntegrityLevel> for u8 {
    fn from(level: IntegrityLevel) -> Self {
        level.0
    }
}

// ============================================================================
// IntegrityLattice
// ============================================================================

/// Maximum number of levels a lattice can hold (ranks fit in a `u8`).
pub const MAX_LEVELS: usize = 256;

/// A total order over named integrity levels.
///
/// The lattice owns the ordered list of recognized level names; position in
/// the list is the level's rank. Construction validates the configuration
/// and the lattice never changes afterward — it is not an external input
/// per request.
///
/// # Examples
///
/// ```
/// use spinel_types::IntegrityLattice;
///
/// let lattice = IntegrityLattice::new(["Low", "Medium", "High"])?;
///
/// let low = lattice.level("Low")?;
/// let high = lattice.level("High")?;
/// assert!(low < high);
/// assert_eq!(lattice.name_of(low), Some("Low"));
///
/// // Unrecognized names are rejected, not defaulted.
/// assert!(lattice.level("Unvetted").is_err());
/// # Ok::<(), spinel_types::LatticeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityLattice {
    levels: Vec<String>,
}

impl IntegrityLattice {
    /// Creates a lattice from an ordered list of level names, lowest first.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::EmptyLattice`] if no names are given.
    /// - [`LatticeError::DuplicateLevel`] if a name appears twice (the
    ///   order must be strict, so names are unique).
    /// - [`LatticeError::TooManyLevels`] if more than [`MAX_LEVELS`] names
    ///   are given.
    pub fn new<I, S>(levels: I) -> Result<Self, LatticeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();

        if levels.is_empty() {
            return Err(LatticeError::EmptyLattice);
        }
        if levels.len() > MAX_LEVELS {
            return Err(LatticeError::TooManyLevels(levels.len()));
        }
        for (i, name) in levels.iter().enumerate() {
            if levels[..i].contains(name) {
                return Err(LatticeError::DuplicateLevel(name.clone()));
            }
        }

        Ok(Self { levels })
    }

    /// Looks up a level by name, issuing its validated handle.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UnknownLevel`] if the name is not part of
    /// the configured lattice.
    pub fn level(&self, name: &str) -> Result<IntegrityLevel, LatticeError> {
        match self.levels.iter().position(|l| l == name) {
            // new() caps the lattice at MAX_LEVELS, so the rank fits.
            Some(rank) => u8::try_from(rank)
                .map(IntegrityLevel)
                .map_err(|_| LatticeError::TooManyLevels(self.levels.len())),
            None => Err(LatticeError::UnknownLevel(name.to_string())),
        }
    }

    /// Returns whether the given name is a recognized level.
    pub fn contains(&self, name: &str) -> bool {
        self.levels.iter().any(|l| l == name)
    }

    /// Resolves a level back to its configured name.
    ///
    /// Returns `None` if the level's rank is out of range for this lattice
    /// (i.e. it was issued by a different, larger lattice).
    pub fn name_of(&self, level: IntegrityLevel) -> Option<&str> {
        self.levels.get(usize::from(level.rank())).map(String::as_str)
    }

    /// Returns the number of levels in the lattice (always >= 1).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// A constructed lattice is never empty; present for API completeness.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over level names in ascending integrity order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(String::as_str)
    }
}

impl Default for IntegrityLattice {
    /// The three-level `Low < Medium < High` lattice.
    fn default() -> Self {
        Self {
            levels: vec!["Low".to_string(), "Medium".to_string(), "High".to_string()],
        }
    }
}

// ============================================================================
// LatticeError
// ============================================================================

/// Failure constructing a lattice or looking up a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// A lattice must have at least one level.
    EmptyLattice,
    /// Level names must be unique for the order to be strict.
    DuplicateLevel(String),
    /// More levels than ranks can represent.
    TooManyLevels(usize),
    /// The name is not part of the configured lattice.
    UnknownLevel(String),
}

impl Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "integrity lattice must have at least one level"),
            Self::DuplicateLevel(name) => {
                write!(f, "duplicate integrity level '{name}' in lattice")
            }
            Self::TooManyLevels(n) => {
                write!(f, "lattice has {n} levels; at most {MAX_LEVELS} are supported")
            }
            Self::UnknownLevel(name) => write!(f, "invalid integrity level '{name}'"),
        }
    }
}

impl std::error::Error for LatticeError {}

// ============================================================================
// Tests
// ============================================================================
