//! Client Registry
//!
//! Named factories for preconfigured clients. A registry is an ordinary
//! value: create one, share it (it is `Sync`), register configurations at
//! startup and build clients from them later.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, TycoonError};

type Factory<T> = Arc<dyn Fn() -> Result<T> + Send + Sync>;

/// Name → factory map
pub struct ClientRegistry<T> {
    factories: RwLock<HashMap<String, Factory<T>>>,
}

impl<T> ClientRegistry<T> {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register a factory under `name`
    ///
    /// Fails with [`TycoonError::DuplicateRegistration`] if the name is taken.
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(TycoonError::DuplicateRegistration(name));
        }
        tracing::debug!("registered client configuration '{}'", name);
        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Build a new instance from the factory registered as `name`
    ///
    /// Fails with [`TycoonError::UnknownRegistration`] for unknown names.
    /// The factory runs without the registry lock held, so it may itself
    /// register or create.
    pub fn create(&self, name: &str) -> Result<T> {
        let factory = self
            .factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TycoonError::UnknownRegistration(name.to_string()))?;
        factory()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T> Default for ClientRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ClientRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("names", &self.names())
            .finish()
    }
}
