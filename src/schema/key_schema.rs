//! Entity key schema
//!
//! A `KeySchema` is built once at startup, validated, and never mutated.
//! It answers four questions about a property: is it the partition key,
//! is it the sort key, which indexes is it a member of (and in which role),
//! and what physical attribute name does it map to.

use std::collections::{BTreeMap, HashMap};

use super::errors::{SchemaError, SchemaResult};
use super::types::{AttributeType, IndexDefinition, KeyRole, KeyShape, PropertyDef};

/// Immutable key metadata for one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    entity: String,
    table_name: String,
    shape: KeyShape,
    properties: BTreeMap<String, PropertyDef>,
    /// Indexes in declaration order
    indexes: Vec<IndexDefinition>,
    /// property -> (index name, role), in declaration order
    memberships: BTreeMap<String, Vec<(String, KeyRole)>>,
}

impl KeySchema {
    /// Starts a schema for the given entity
    pub fn builder(entity: impl Into<String>) -> KeySchemaBuilder {
        KeySchemaBuilder::new(entity)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Default table name (the store may override it)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn shape(&self) -> &KeyShape {
        &self.shape
    }

    pub fn partition_key(&self) -> &str {
        self.shape.partition()
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.shape.sort()
    }

    pub fn is_partition_key(&self, property: &str) -> bool {
        self.shape.partition() == property
    }

    pub fn is_sort_key(&self, property: &str) -> bool {
        self.shape.sort() == Some(property)
    }

    /// Resolves the physical attribute name of a property
    pub fn attribute_name<'a>(&'a self, property: &'a str) -> &'a str {
        self.properties
            .get(property)
            .and_then(|def| def.attribute_name.as_deref())
            .unwrap_or(property)
    }

    /// Declared storage type, if one was registered
    pub fn attribute_type(&self, property: &str) -> Option<AttributeType> {
        self.properties
            .get(property)
            .and_then(|def| def.attribute_type)
    }

    /// Indexes in declaration order
    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Names of the indexes a property belongs to, in declaration order
    pub fn index_names_for(&self, property: &str) -> Vec<&str> {
        self.memberships
            .get(property)
            .map(|entries| entries.iter().map(|(name, _)| name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Role of a property within a specific index
    pub fn index_role(&self, index_name: &str, property: &str) -> Option<KeyRole> {
        self.memberships.get(property).and_then(|entries| {
            entries
                .iter()
                .find(|(name, _)| name == index_name)
                .map(|(_, role)| *role)
        })
    }

    pub fn is_index_member(&self, property: &str) -> bool {
        self.memberships.contains_key(property)
    }
}

/// Fluent construction of a [`KeySchema`]
#[derive(Debug, Clone)]
pub struct KeySchemaBuilder {
    entity: String,
    table_name: Option<String>,
    partition: Option<String>,
    sort: Option<String>,
    properties: BTreeMap<String, PropertyDef>,
    indexes: Vec<IndexDefinition>,
}

impl KeySchemaBuilder {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            table_name: None,
            partition: None,
            sort: None,
            properties: BTreeMap::new(),
            indexes: Vec::new(),
        }
    }

    /// Sets the table name (defaults to the entity name)
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn partition_key(mut self, property: impl Into<String>) -> Self {
        self.partition = Some(property.into());
        self
    }

    pub fn sort_key(mut self, property: impl Into<String>) -> Self {
        self.sort = Some(property.into());
        self
    }

    /// Maps a property onto a differently named attribute
    pub fn attribute_name(mut self, property: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.properties.entry(property.into()).or_default().attribute_name = Some(attribute.into());
        self
    }

    /// Declares the storage type of a property
    pub fn attribute_type(mut self, property: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.properties.entry(property.into()).or_default().attribute_type = Some(attribute_type);
        self
    }

    /// Adds a secondary index
    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Validates the declaration and produces the schema
    pub fn build(self) -> SchemaResult<KeySchema> {
        let entity = self.entity;

        let partition = match self.partition {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(SchemaError::MissingPartitionKey { entity }),
        };

        let shape = match self.sort.filter(|s| !s.trim().is_empty()) {
            Some(sort) if sort == partition => {
                return Err(SchemaError::SortKeyIsPartitionKey {
                    entity,
                    property: sort,
                })
            }
            Some(sort) => KeyShape::PartitionAndSort { partition, sort },
            None => KeyShape::PartitionOnly { partition },
        };

        let mut memberships: BTreeMap<String, Vec<(String, KeyRole)>> = BTreeMap::new();
        let mut seen = Vec::with_capacity(self.indexes.len());
        for index in &self.indexes {
            if index.name.trim().is_empty() {
                return Err(SchemaError::EmptyIndexName { entity });
            }
            if seen.contains(&index.name.as_str()) {
                return Err(SchemaError::DuplicateIndex {
                    entity,
                    index: index.name.clone(),
                });
            }
            seen.push(index.name.as_str());

            if index.partition.trim().is_empty() {
                return Err(SchemaError::IndexWithoutPartition {
                    entity,
                    index: index.name.clone(),
                });
            }
            if index.sort.as_deref() == Some(index.partition.as_str()) {
                return Err(SchemaError::IndexKeyCollision {
                    entity,
                    index: index.name.clone(),
                    property: index.partition.clone(),
                });
            }

            for property in index.members() {
                let role = index.role_of(property).unwrap_or(KeyRole::Partition);
                memberships
                    .entry(property.to_string())
                    .or_default()
                    .push((index.name.clone(), role));
            }
        }

        // Every property maps to exactly one physical attribute, and no two
        // properties share one.
        let mut attribute_owners: HashMap<&str, &str> = HashMap::new();
        for (property, def) in &self.properties {
            let attribute = def.attribute_name.as_deref().unwrap_or(property);
            if let Some(first) = attribute_owners.insert(attribute, property) {
                return Err(SchemaError::AttributeNameCollision {
                    entity,
                    first: first.to_string(),
                    second: property.clone(),
                    attribute: attribute.to_string(),
                });
            }
        }
        for property in std::iter::once(shape.partition())
            .chain(shape.sort())
            .chain(memberships.keys().map(String::as_str))
        {
            if self.properties.contains_key(property) {
                continue;
            }
            if let Some(owner) = attribute_owners.get(property) {
                if *owner != property {
                    return Err(SchemaError::AttributeNameCollision {
                        entity,
                        first: owner.to_string(),
                        second: property.to_string(),
                        attribute: property.to_string(),
                    });
                }
            }
        }

        Ok(KeySchema {
            table_name: self.table_name.unwrap_or_else(|| entity.clone()),
            entity,
            shape,
            properties: self.properties,
            indexes: self.indexes,
            memberships,
        })
    }
}
