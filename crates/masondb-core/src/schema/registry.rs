use crate::{error::Error, schema::catalog::SchemaCatalog};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

///
/// CatalogRegistry
///
/// Per-table catalog cache owned by an application context. Catalogs are
/// built lazily, exactly once per table, under the registry lock; the lock
/// is held across the build so concurrent first callers cannot race a
/// duplicate introspection.
///

#[derive(Debug, Default)]
pub struct CatalogRegistry {
    inner: Mutex<BTreeMap<String, Arc<SchemaCatalog>>>,
}

impl CatalogRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an already-built catalog.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<Arc<SchemaCatalog>> {
        self.inner
            .lock()
            .expect("catalog registry lock poisoned")
            .get(table)
            .cloned()
    }

    /// Fetch the catalog for `table`, building it on first use.
    ///
    /// A failed build caches nothing; the next caller retries.
    pub fn get_or_build<F>(&self, table: &str, build: F) -> Result<Arc<SchemaCatalog>, Error>
    where
        F: FnOnce() -> Result<SchemaCatalog, Error>,
    {
        let mut inner = self
            .inner
            .lock()
            .expect("catalog registry lock poisoned");

        if let Some(catalog) = inner.get(table) {
            return Ok(catalog.clone());
        }

        let catalog = Arc::new(build()?);
        inner.insert(table.to_string(), catalog.clone());

        Ok(catalog)
    }

    /// Drop a cached catalog, forcing a rebuild on next use.
    pub fn invalidate(&self, table: &str) {
        self.inner
            .lock()
            .expect("catalog registry lock poisoned")
            .remove(table);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, SchemaError};
    use crate::schema::catalog::SchemaProvider;

    fn empty_catalog(table: &str) -> SchemaCatalog {
        SchemaCatalog::build(table, "", vec![])
    }

    #[test]
    fn builds_once_and_shares() {
        let registry = CatalogRegistry::new();
        let mut builds = 0;

        let first = registry
            .get_or_build("post", || {
                builds += 1;
                Ok(empty_catalog("post"))
            })
            .unwrap();

        let second = registry
            .get_or_build("post", || {
                builds += 1;
                Ok(empty_catalog("post"))
            })
            .unwrap();

        assert_eq!(builds, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_builds_cache_nothing() {
        let registry = CatalogRegistry::new();

        let err = registry.get_or_build("post", || {
            Err(ExecutionError::new("connection refused").into())
        });
        assert!(err.is_err());
        assert!(registry.get("post").is_none());

        // Retry succeeds.
        let catalog = registry
            .get_or_build("post", || Ok(empty_catalog("post")))
            .unwrap();
        assert!(matches!(
            catalog.primary_key(),
            Err(SchemaError::NoPrimaryKey { .. })
        ));
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let registry = CatalogRegistry::new();

        let first = registry
            .get_or_build("post", || Ok(empty_catalog("post")))
            .unwrap();
        registry.invalidate("post");

        let second = registry
            .get_or_build("post", || Ok(empty_catalog("post")))
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
    }
}
