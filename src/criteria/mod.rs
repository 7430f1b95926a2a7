//! Query criteria and native request assembly
//!
//! `QueryCriteria` collects clauses, then builds a [`Query`] or
//! [`CountQuery`] holding the native request for the selected access path.

mod accumulator;
mod assemble;
mod expression;
mod filter;
mod query;
mod request;

pub use crate::config::ConsistencyMode;
pub use accumulator::QueryCriteria;
pub use filter::FilterExpression;
pub use query::{CountQuery, Query};
pub use request::{LoadRequest, QueryRequest, ScanRequest, Select, StoreRequest};
