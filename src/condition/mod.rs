//! Condition construction
//!
//! Turns (property, operator, values) clauses into native comparison
//! conditions. Pure value transformation: no I/O, no state beyond the
//! schema and converter registry it reads.

mod builder;
mod converter;
mod operator;
mod value;

pub use builder::{encode_value, ConditionBuilder};
pub use converter::{AttributeConverter, ConverterRegistry};
pub use operator::{AttributeCondition, ComparisonOperator, Condition};
pub use value::{AttributeValue, ClauseValue};
