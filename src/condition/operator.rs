//! Native comparison conditions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::AttributeValue;

/// Comparison operators understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    NotNull,
    Null,
    Contains,
    NotContains,
    BeginsWith,
    In,
    Between,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "EQ",
            ComparisonOperator::Ne => "NE",
            ComparisonOperator::Le => "LE",
            ComparisonOperator::Lt => "LT",
            ComparisonOperator::Ge => "GE",
            ComparisonOperator::Gt => "GT",
            ComparisonOperator::NotNull => "NOT_NULL",
            ComparisonOperator::Null => "NULL",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::NotContains => "NOT_CONTAINS",
            ComparisonOperator::BeginsWith => "BEGINS_WITH",
            ComparisonOperator::In => "IN",
            ComparisonOperator::Between => "BETWEEN",
        }
    }

    /// Operators a key condition may use. Everything else needs a scan
    /// filter.
    pub fn is_query_legal(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::Eq
                | ComparisonOperator::Le
                | ComparisonOperator::Lt
                | ComparisonOperator::Ge
                | ComparisonOperator::Gt
                | ComparisonOperator::BeginsWith
                | ComparisonOperator::Between
        )
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded comparison against one attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    pub comparison_operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}

impl Condition {
    pub fn new(comparison_operator: ComparisonOperator, attribute_value_list: Vec<AttributeValue>) -> Self {
        Self {
            comparison_operator,
            attribute_value_list,
        }
    }

    pub fn is_equality(&self) -> bool {
        self.comparison_operator == ComparisonOperator::Eq
    }

    pub fn is_query_legal(&self) -> bool {
        self.comparison_operator.is_query_legal()
    }

    /// The single compared value, for operators that take exactly one
    pub fn single_value(&self) -> Option<&AttributeValue> {
        match self.attribute_value_list.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

/// A condition bound to a property and its physical attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeCondition {
    pub property: String,
    pub attribute_name: String,
    pub condition: Condition,
}

impl AttributeCondition {
    pub fn operator(&self) -> ComparisonOperator {
        self.condition.comparison_operator
    }
}

impl fmt::Display for AttributeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.condition.comparison_operator)?;
        for value in &self.condition.attribute_value_list {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
