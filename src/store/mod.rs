//! Store collaborator boundary
//!
//! The store client executes native requests. Everything that touches the
//! network (timeouts, retries, pagination tokens, cancellation) lives
//! behind this trait.

use std::error::Error as StdError;

use thiserror::Error;

use crate::criteria::{LoadRequest, QueryRequest, ScanRequest, StoreRequest};
use crate::result::LazyList;
use crate::schema::KeySchema;

/// Failure reported by the store client
#[derive(Debug, Error)]
#[error("store operation failed: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying client error
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Native operations a store client provides for entities of type `T`
pub trait StoreOperations<T> {
    /// Fetches one item by its full primary key
    fn load(&self, schema: &KeySchema, request: &LoadRequest) -> StoreResult<Option<T>>;

    /// Runs a key-condition query, returning a lazily paginated list
    fn query(&self, schema: &KeySchema, request: &QueryRequest) -> StoreResult<LazyList<T>>;

    /// Runs a filtered scan, returning a lazily paginated list
    fn scan(&self, schema: &KeySchema, request: &ScanRequest) -> StoreResult<LazyList<T>>;

    /// Counts the items a query or scan request matches
    fn count(&self, schema: &KeySchema, request: &StoreRequest) -> StoreResult<u64>;

    fn delete(&self, schema: &KeySchema, entity: &T) -> StoreResult<()>;

    /// Table name to address explicitly, consulted for index queries
    fn overridden_table_name(&self, _schema: &KeySchema, default_name: &str) -> String {
        default_name.to_string()
    }
}
