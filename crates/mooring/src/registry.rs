//! Shared handle to the resolved schema.

use mooring_core::obs::{MetricsEvent, record};
use mooring_schema::{
    SchemaError,
    build::{ResolveOptions, resolve},
    load::RawCollection,
    node::SchemaDictionary,
};
use std::sync::{Arc, PoisonError, RwLock};

///
/// SchemaRegistry
///
/// Readers take an `Arc` snapshot and keep using it for as long as they
/// like. `reload` resolves a complete new dictionary before swapping it in,
/// so a failed reload leaves the current snapshot untouched.
///

#[derive(Debug)]
pub struct SchemaRegistry {
    current: RwLock<Arc<SchemaDictionary>>,
    options: ResolveOptions,
}

impl SchemaRegistry {
    /// Resolve `definitions` and build a registry around the result.
    pub fn new(definitions: &[RawCollection], options: ResolveOptions) -> Result<Self, SchemaError> {
        let dictionary = Self::resolve(definitions, &options)?;

        Ok(Self {
            current: RwLock::new(Arc::new(dictionary)),
            options,
        })
    }

    /// Wrap an already resolved dictionary.
    #[must_use]
    pub fn from_dictionary(dictionary: SchemaDictionary, options: ResolveOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(dictionary)),
            options,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<SchemaDictionary> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(&guard)
    }

    #[must_use]
    pub const fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `definitions` and swap the result in. Returns the new snapshot.
    pub fn reload(&self, definitions: &[RawCollection]) -> Result<Arc<SchemaDictionary>, SchemaError> {
        let dictionary = match Self::resolve(definitions, &self.options) {
            Ok(dictionary) => Arc::new(dictionary),
            Err(err) => {
                tracing::warn!(error = %err, "schema reload rejected; keeping current snapshot");
                return Err(err);
            }
        };

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&dictionary);
        drop(guard);

        tracing::info!(collections = dictionary.len(), "schema reloaded");

        Ok(dictionary)
    }

    fn resolve(
        definitions: &[RawCollection],
        options: &ResolveOptions,
    ) -> Result<SchemaDictionary, SchemaError> {
        let dictionary = resolve(definitions, options)?;

        record(MetricsEvent::SchemaResolve {
            collections: dictionary.len() as u64,
            junctions: dictionary.junctions().count() as u64,
        });

        Ok(dictionary)
    }
}
