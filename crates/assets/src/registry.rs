use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use skyline_common::ConfigError;

use crate::factory::AssetFactory;
use crate::generators::{ColorCity, Empty, FootprintBlocks, MovingCity};

/// Named asset factories.
///
/// Worlds resolve their factory here once, at construction, and keep the
/// shared handle; the registry is not consulted per cell.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Arc<dyn AssetFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in generator.
    pub fn with_builtins() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.register(ColorCity);
        registry.register(MovingCity::new()?);
        registry.register(FootprintBlocks);
        registry.register(Empty);
        Ok(registry)
    }

    /// Register a factory under its own name. Returns the one it replaced.
    pub fn register<F: AssetFactory + 'static>(&mut self, factory: F) -> Option<Arc<dyn AssetFactory>> {
        self.register_shared(Arc::new(factory))
    }

    pub fn register_shared(&mut self, factory: Arc<dyn AssetFactory>) -> Option<Arc<dyn AssetFactory>> {
        let name = factory.name().to_string();
        let previous = self.factories.insert(name.clone(), factory);
        if previous.is_some() {
            tracing::debug!(%name, "asset factory replaced");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AssetFactory>> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.names())
            .finish()
    }
}
