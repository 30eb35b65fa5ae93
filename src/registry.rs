//! The process-wide instantiation flag.
//!
//! The native interpreter supports a single instance per process. The flag
//! here is the only thing enforcing that; it is checked and set under one
//! lock so that concurrent creators cannot both pass the check.

use crate::error::GsError;
use log::debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

static GLOBAL: InstanceRegistry = InstanceRegistry::new();

/// Tracks whether an interpreter instance currently exists.
///
/// The flag can only be cleared by the instance holding it. Backends that
/// stand in for the library may own a registry of their own; see
/// [`NativeApi::registry`](crate::native::NativeApi::registry).
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instantiated: Mutex<bool>,
}

impl InstanceRegistry {
    pub const fn new() -> Self {
        Self {
            instantiated: Mutex::new(false),
        }
    }

    /// The registry used unless a builder is given another one.
    pub fn global() -> &'static InstanceRegistry {
        &GLOBAL
    }

    pub fn is_instantiated(&self) -> bool {
        *self.lock()
    }

    /// Sets the flag if it is clear. The returned claim clears it again when
    /// dropped unless it is committed.
    pub(crate) fn claim(&self) -> Result<RegistryClaim<'_>, GsError> {
        let mut flag = self.lock();
        if *flag {
            return Err(GsError::AlreadyInstantiated);
        }
        *flag = true;
        Ok(RegistryClaim {
            registry: self,
            committed: false,
        })
    }

    // Only called by the instance that committed the claim, when it releases
    // its handle.
    pub(crate) fn release(&self) {
        *self.lock() = false;
    }

    // A bool cannot be observed half-written, so a poisoned lock is still
    // usable.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.instantiated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A pending claim on the instantiation flag.
#[must_use = "dropping a claim releases it"]
#[derive(Debug)]
pub(crate) struct RegistryClaim<'a> {
    registry: &'a InstanceRegistry,
    committed: bool,
}

impl RegistryClaim<'_> {
    /// Keeps the flag set after this claim is dropped.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for RegistryClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            debug!("Releasing uncommitted instance claim");
            self.registry.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_sets_flag_and_rejects_second_claim() {
        let registry = InstanceRegistry::new();
        let claim = registry.claim().unwrap();
        assert!(registry.is_instantiated());
        assert!(matches!(
            registry.claim(),
            Err(GsError::AlreadyInstantiated)
        ));
        claim.commit();
        assert!(registry.is_instantiated());
    }

    #[test]
    fn test_dropped_claim_releases_flag() {
        let registry = InstanceRegistry::new();
        {
            let _claim = registry.claim().unwrap();
            assert!(registry.is_instantiated());
        }
        assert!(!registry.is_instantiated());
        assert!(registry.claim().is_ok());
    }

    #[test]
    fn test_committed_claim_holds_until_release() {
        let registry = InstanceRegistry::new();
        registry.claim().unwrap().commit();
        assert!(registry.is_instantiated());
        registry.release();
        assert!(!registry.is_instantiated());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let registry = std::sync::Arc::new(InstanceRegistry::new());
        let clone = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.instantiated.lock().unwrap();
            panic!("poison the registry lock");
        })
        .join();
        assert!(registry.instantiated.is_poisoned());
        assert!(!registry.is_instantiated());
        registry.claim().unwrap().commit();
        assert!(registry.is_instantiated());
    }
}
