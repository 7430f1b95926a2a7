//! Schema loader for declarative entity descriptors
//!
//! Descriptors are JSON documents, one entity per document. A directory is
//! loaded file by file in file-name order so registration is deterministic.
//! Any unreadable or invalid descriptor fails the whole load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::observability::{log_event, Event};

use super::errors::{SchemaError, SchemaResult};
use super::key_schema::KeySchema;
use super::types::{AttributeType, IndexDefinition};

/// Per-property section of a descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub attribute_type: Option<AttributeType>,
}

/// JSON shape of one entity declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDescriptor {
    pub entity: String,
    #[serde(default)]
    pub table: Option<String>,
    /// Optional here so a missing key surfaces as a schema error
    #[serde(default)]
    pub partition_key: Option<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeDescriptor>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
    #[serde(default)]
    pub query: QueryConfig,
}

impl EntityDescriptor {
    /// Validates the descriptor into a usable definition
    pub fn into_definition(self) -> SchemaResult<EntityDefinition> {
        let mut builder = KeySchema::builder(self.entity);
        if let Some(table) = self.table {
            builder = builder.table(table);
        }
        if let Some(partition) = self.partition_key {
            builder = builder.partition_key(partition);
        }
        if let Some(sort) = self.sort_key {
            builder = builder.sort_key(sort);
        }
        for (property, attribute) in self.attributes {
            if let Some(name) = attribute.name {
                builder = builder.attribute_name(property.clone(), name);
            }
            if let Some(attribute_type) = attribute.attribute_type {
                builder = builder.attribute_type(property, attribute_type);
            }
        }
        for index in self.indexes {
            builder = builder.index(index);
        }

        Ok(EntityDefinition {
            schema: builder.build()?,
            config: self.query,
        })
    }
}

/// A validated key schema plus its query configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    pub schema: KeySchema,
    pub config: QueryConfig,
}

/// Registry of entity definitions loaded from descriptors
#[derive(Debug, Default)]
pub struct SchemaLoader {
    entities: BTreeMap<String, EntityDefinition>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and registers one descriptor, returning the entity name.
    pub fn load_str(&mut self, source_name: &str, content: &str) -> SchemaResult<String> {
        let descriptor: EntityDescriptor = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(source_name, format!("Invalid JSON: {}", e)))?;
        let definition = descriptor.into_definition()?;
        let entity = definition.schema.entity().to_string();
        self.register(definition)?;

        log_event(
            Event::SchemaLoaded,
            &[("entity", entity.as_str()), ("source", source_name)],
        );
        Ok(entity)
    }

    /// Loads a single descriptor file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<String> {
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::malformed(&source_name, format!("Failed to read file: {}", e)))?;
        self.load_str(&source_name, &content)
    }

    /// Loads every `*.json` file in a directory, in file-name order.
    ///
    /// Returns the number of entities registered.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let source_name = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(&source_name, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(&source_name, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }
        Ok(paths.len())
    }

    /// Registers an already validated definition
    pub fn register(&mut self, definition: EntityDefinition) -> SchemaResult<()> {
        let entity = definition.schema.entity().to_string();
        if self.entities.contains_key(&entity) {
            return Err(SchemaError::DuplicateEntity { entity });
        }
        self.entities.insert(entity, definition);
        Ok(())
    }

    pub fn get(&self, entity: &str) -> Option<&EntityDefinition> {
        self.entities.get(entity)
    }

    pub fn schema(&self, entity: &str) -> Option<&KeySchema> {
        self.entities.get(entity).map(|def| &def.schema)
    }

    /// Registered entity names, sorted
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsistencyMode;
    use crate::schema::KeyRole;

    const CUSTOMER: &str = r#"{
        "entity": "Customer",
        "table": "customers",
        "partition_key": "id",
        "attributes": {
            "postCode": { "name": "post_code", "type": "string" },
            "joined": { "type": "temporal" }
        },
        "indexes": [
            { "name": "Name-PostCode-index", "partition": "name", "sort": "postCode" }
        ],
        "query": { "scan": { "enabled": true, "count_enabled": true }, "consistency": "consistent" }
    }"#;

    #[test]
    fn test_load_str() {
        let mut loader = SchemaLoader::new();
        let entity = loader.load_str("customer.json", CUSTOMER).unwrap();
        assert_eq!(entity, "Customer");

        let def = loader.get("Customer").unwrap();
        assert_eq!(def.schema.table_name(), "customers");
        assert_eq!(def.schema.attribute_name("postCode"), "post_code");
        assert_eq!(def.schema.attribute_type("joined"), Some(AttributeType::Temporal));
        assert_eq!(
            def.schema.index_role("Name-PostCode-index", "name"),
            Some(KeyRole::Partition)
        );
        assert!(def.config.scan.count_enabled);
        assert_eq!(def.config.consistency, ConsistencyMode::Consistent);
    }

    #[test]
    fn test_missing_partition_key_is_schema_error() {
        let mut loader = SchemaLoader::new();
        let err = loader
            .load_str("bad.json", r#"{ "entity": "Orphan" }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingPartitionKey { .. }));
        assert!(loader.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let mut loader = SchemaLoader::new();
        let err = loader.load_str("broken.json", "{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_field_is_malformed() {
        let mut loader = SchemaLoader::new();
        let err = loader
            .load_str("typo.json", r#"{ "entity": "User", "partition": "id" }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut loader = SchemaLoader::new();
        loader.load_str("a.json", CUSTOMER).unwrap();
        let err = loader.load_str("b.json", CUSTOMER).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEntity { .. }));
        assert_eq!(loader.len(), 1);
    }
}
