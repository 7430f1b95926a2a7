//! Access-path planning
//!
//! Given a key schema and a set of criteria, pick exactly one way to reach
//! the data:
//!
//! 1. Direct load by full primary key
//! 2. Key-condition query on the primary key
//! 3. Key-condition query on a secondary index
//! 4. Filtered scan
//!
//! Selection is deterministic. Index candidates are ordered exact match
//! first, then partial matches by index name.

mod ast;
mod candidates;
mod explain;
mod path;
mod selector;

pub use ast::{Arity, Clause, Operator, PredicateTree, ResultShape, SortDirective};
pub use explain::ExplainPlan;
pub use path::{AccessPath, AccessPathKind};
pub use selector::AccessPathSelector;
