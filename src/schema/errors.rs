//! Schema error types
//!
//! Every variant describes entity key metadata that cannot be used to plan
//! queries. They are raised when a schema is built or loaded, never later.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Malformed entity key metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No partition key could be identified
    #[error("entity '{entity}' declares no partition key")]
    MissingPartitionKey { entity: String },

    /// The sort key repeats the partition key
    #[error("entity '{entity}': sort key '{property}' is also the partition key")]
    SortKeyIsPartitionKey { entity: String, property: String },

    /// An index was declared without a name
    #[error("entity '{entity}': index name must not be empty")]
    EmptyIndexName { entity: String },

    /// Two indexes share a name
    #[error("entity '{entity}': index '{index}' is declared more than once")]
    DuplicateIndex { entity: String, index: String },

    /// An index has no partition member
    #[error("entity '{entity}': index '{index}' has no partition member")]
    IndexWithoutPartition { entity: String, index: String },

    /// An index uses the same property for both key roles
    #[error("entity '{entity}': index '{index}' uses '{property}' as both partition and sort member")]
    IndexKeyCollision {
        entity: String,
        index: String,
        property: String,
    },

    /// Two properties resolve to one physical attribute
    #[error("entity '{entity}': properties '{first}' and '{second}' both map to attribute '{attribute}'")]
    AttributeNameCollision {
        entity: String,
        first: String,
        second: String,
        attribute: String,
    },

    /// The same entity was registered twice
    #[error("entity '{entity}' is defined more than once")]
    DuplicateEntity { entity: String },

    /// A schema source could not be read or parsed
    #[error("malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },
}

impl SchemaError {
    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::MissingPartitionKey {
            entity: "User".into(),
        };
        assert_eq!(err.to_string(), "entity 'User' declares no partition key");

        let err = SchemaError::malformed("users.json", "Invalid JSON");
        let display = err.to_string();
        assert!(display.contains("users.json"));
        assert!(display.contains("Invalid JSON"));
    }
}
