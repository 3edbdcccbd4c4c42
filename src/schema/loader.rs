//! Schema loading from the schema directory
//!
//! - Schemas are stored at `<schema_dir>/<name>.json`
//! - One file per request type
//! - Missing or malformed schema files are FATAL configuration faults
//!
//! [`SchemaLoader::load`] is a pure read-and-parse; [`SchemaCache`] keeps
//! one shared copy of each schema for the process lifetime.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaDefinition;
use super::RequestSchema;
use crate::observability::Event;

/// Reads schema resources from a directory.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Reads and parses the named schema.
    ///
    /// # Errors
    ///
    /// - `GOODS_SCHEMA_NOT_FOUND` if no resource exists under `name` (names
    ///   outside `[A-Za-z0-9_-]` never resolve to a file)
    /// - `GOODS_SCHEMA_MALFORMED` if the resource is not JSON or not a
    ///   well-formed schema
    pub fn load(&self, name: &str) -> SchemaResult<SchemaDefinition> {
        if !is_valid_name(name) {
            return Err(SchemaError::not_found(name));
        }
        let path = self.schema_dir.join(format!("{}.json", name));

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SchemaError::not_found(name),
            _ => SchemaError::malformed(name, format!("Failed to read {}: {}", path.display(), e)),
        })?;

        let document: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed(name, format!("Invalid JSON: {}", e)))?;

        let schema = SchemaDefinition::from_value(name, &document)
            .map_err(|reason| SchemaError::malformed(name, reason))?;

        tracing::debug!(event = %Event::SchemaLoaded, schema = name, path = %path.display());
        Ok(schema)
    }
}

/// Process-wide cache of loaded schemas.
///
/// Concurrent first loads of one name may both parse the file; the second
/// insert simply replaces an identical value.
#[derive(Debug)]
pub struct SchemaCache {
    loader: SchemaLoader,
    schemas: RwLock<HashMap<String, Arc<SchemaDefinition>>>,
}

impl SchemaCache {
    pub fn new(loader: SchemaLoader) -> Self {
        Self {
            loader,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &SchemaLoader {
        &self.loader
    }

    /// Returns the named schema, loading it on first use.
    pub fn get(&self, name: &str) -> SchemaResult<Arc<SchemaDefinition>> {
        // Entries are immutable once inserted, so a poisoned lock still
        // guards consistent data.
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(self.loader.load(name)?);
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Returns the schema for a request type.
    pub fn request(&self, request: RequestSchema) -> SchemaResult<Arc<SchemaDefinition>> {
        self.get(request.name())
    }

    /// Loads every request schema so that a misconfigured deployment fails
    /// at startup instead of on its first request.
    pub fn preload(&self) -> SchemaResult<()> {
        for request in RequestSchema::ALL {
            self.request(request)?;
        }
        tracing::info!(
            event = %Event::SchemasLoaded,
            count = self.schema_count(),
            dir = %self.loader.schema_dir().display()
        );
        Ok(())
    }

    /// Returns the number of cached schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
