//! Key metadata building blocks
//!
//! Supported attribute types:
//! - string: stored as a string attribute
//! - number: stored as a numeric attribute
//! - boolean: stored as a numeric attribute (1 / 0)
//! - temporal: stored as an ISO-8601 string in UTC
//! - custom: encoded by a converter registered for the property

use serde::{Deserialize, Serialize};

/// Declared storage type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    Temporal,
    Custom,
}

impl AttributeType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Boolean => "boolean",
            AttributeType::Temporal => "temporal",
            AttributeType::Custom => "custom",
        }
    }
}

/// Role a property plays inside a key (primary or index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Partition,
    Sort,
}

impl KeyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyRole::Partition => "PARTITION",
            KeyRole::Sort => "SORT",
        }
    }
}

/// Shape of an entity's primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyShape {
    /// Items are addressed by the partition key alone
    PartitionOnly { partition: String },
    /// Items are addressed by partition key plus sort key
    PartitionAndSort { partition: String, sort: String },
}

impl KeyShape {
    /// Returns the partition key property
    pub fn partition(&self) -> &str {
        match self {
            KeyShape::PartitionOnly { partition } => partition,
            KeyShape::PartitionAndSort { partition, .. } => partition,
        }
    }

    /// Returns the sort key property, if the key is composite
    pub fn sort(&self) -> Option<&str> {
        match self {
            KeyShape::PartitionOnly { .. } => None,
            KeyShape::PartitionAndSort { sort, .. } => Some(sort),
        }
    }
}

/// A secondary index over the entity's items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name as known to the store
    pub name: String,
    /// Property acting as the index partition key
    pub partition: String,
    /// Property acting as the index sort key
    #[serde(default)]
    pub sort: Option<String>,
}

impl IndexDefinition {
    /// Creates a partition-only index
    pub fn new(name: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition: partition.into(),
            sort: None,
        }
    }

    /// Creates an index with partition and sort members
    pub fn with_sort(
        name: impl Into<String>,
        partition: impl Into<String>,
        sort: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }

    /// Returns the member properties, partition first
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition.as_str()).chain(self.sort.as_deref())
    }

    /// Number of member properties (1 or 2)
    pub fn member_count(&self) -> usize {
        if self.sort.is_some() {
            2
        } else {
            1
        }
    }

    /// Returns the role a property plays in this index
    pub fn role_of(&self, property: &str) -> Option<KeyRole> {
        if self.partition == property {
            Some(KeyRole::Partition)
        } else if self.sort.as_deref() == Some(property) {
            Some(KeyRole::Sort)
        } else {
            None
        }
    }
}

/// Per-property overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDef {
    /// Physical attribute name (defaults to the property name)
    pub attribute_name: Option<String>,
    /// Declared storage type (inferred from the value when absent)
    pub attribute_type: Option<AttributeType>,
}
