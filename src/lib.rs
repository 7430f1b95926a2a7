//! keyquery - query derivation for partitioned key-value stores
//!
//! Turns declared data-access intents into native store requests: pick the
//! cheapest legal access path for a predicate (direct load, primary-key
//! query, secondary-index query or scan), render the request, and shape the
//! store's lazy results into what the caller asked for.

pub mod condition;
pub mod config;
pub mod criteria;
pub mod error;
pub mod observability;
pub mod planner;
pub mod result;
pub mod schema;
pub mod store;

pub use criteria::{CountQuery, FilterExpression, Query, QueryCriteria};
pub use error::{ErrorCode, QueryError, QueryResult};
pub use planner::{AccessPath, AccessPathKind, AccessPathSelector, Clause, PredicateTree, ResultShape};
pub use schema::{KeySchema, SchemaLoader};
pub use store::{StoreError, StoreOperations};
