// crates/opc-storage-testing/src/env.rs
// ============================================================================
// Module: Environment Lookup
// Description: Injectable environment variable lookups.
// Purpose: Keep configuration resolution deterministic under test.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Resolution never reads the process environment directly. It goes through
//! [`Env`], which is implemented by [`OsEnv`] for live lookups and by
//! [`StaticEnv`] for fixed maps in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Lookup from variable name to optional value.
pub trait Env: Send + Sync {
    /// Returns the value of `key`, or `None` when it is unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the live process environment.
///
/// Non-unicode values are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables; every other key is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnv {
    /// Variables visible through this lookup.
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    /// Creates an empty lookup.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
