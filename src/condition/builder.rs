//! Clause-to-condition translation
//!
//! Encoding rules, in priority order:
//! 1. a converter registered for the property
//! 2. the clause's type hint
//! 3. the type declared in the key schema
//! 4. the value's own kind
//!
//! Booleans are stored as numbers (1 / 0); timestamps as ISO-8601 UTC
//! strings with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{QueryError, QueryResult};
use crate::planner::{Arity, Clause, Operator};
use crate::schema::{AttributeType, KeySchema};

use super::converter::ConverterRegistry;
use super::operator::{ComparisonOperator, Condition};
use super::value::{AttributeValue, ClauseValue};

/// Builds native conditions for one entity
#[derive(Debug, Clone, Copy)]
pub struct ConditionBuilder<'a> {
    schema: &'a KeySchema,
    converters: &'a ConverterRegistry,
}

impl<'a> ConditionBuilder<'a> {
    pub fn new(schema: &'a KeySchema, converters: &'a ConverterRegistry) -> Self {
        Self { schema, converters }
    }

    /// Translates a whole clause
    pub fn build(&self, clause: &Clause) -> QueryResult<Condition> {
        let property = clause.property.as_str();
        let ty = clause.value_type;
        check_arity(clause)?;

        match clause.operator {
            Operator::Eq => self.build_equality(property, &clause.values[0], ty),
            Operator::Ne => self.build_range(property, ComparisonOperator::Ne, &clause.values[0], ty),
            Operator::Gt => self.build_range(property, ComparisonOperator::Gt, &clause.values[0], ty),
            Operator::Ge => self.build_range(property, ComparisonOperator::Ge, &clause.values[0], ty),
            Operator::Lt => self.build_range(property, ComparisonOperator::Lt, &clause.values[0], ty),
            Operator::Le => self.build_range(property, ComparisonOperator::Le, &clause.values[0], ty),
            Operator::BeginsWith => {
                self.build_range(property, ComparisonOperator::BeginsWith, &clause.values[0], ty)
            }
            Operator::Between => {
                self.build_between(property, &clause.values[0], &clause.values[1], ty)
            }
            Operator::In => self.build_membership(property, &clause.values, ty),
            Operator::Contains => self.build_contains(property, &clause.values[0], false, ty),
            Operator::NotContains => self.build_contains(property, &clause.values[0], true, ty),
            Operator::IsNull => Ok(self.build_null_check(property, true)),
            Operator::IsNotNull => Ok(self.build_null_check(property, false)),
            Operator::True => self.build_equality(property, &ClauseValue::Boolean(true), ty),
            Operator::False => self.build_equality(property, &ClauseValue::Boolean(false), ty),
        }
    }

    pub fn build_equality(
        &self,
        property: &str,
        value: &ClauseValue,
        ty: Option<AttributeType>,
    ) -> QueryResult<Condition> {
        let encoded = self.encode(property, value, ty)?;
        Ok(Condition::new(ComparisonOperator::Eq, vec![encoded]))
    }

    /// Single-value comparison (LT, LE, GT, GE, NE, BEGINS_WITH)
    pub fn build_range(
        &self,
        property: &str,
        operator: ComparisonOperator,
        value: &ClauseValue,
        ty: Option<AttributeType>,
    ) -> QueryResult<Condition> {
        match operator {
            ComparisonOperator::Between
            | ComparisonOperator::In
            | ComparisonOperator::Null
            | ComparisonOperator::NotNull => {
                return Err(QueryError::unsupported_value(
                    property,
                    format!("{} does not take a single value", operator),
                ))
            }
            _ => {}
        }
        let encoded = self.encode(property, value, ty)?;
        Ok(Condition::new(operator, vec![encoded]))
    }

    pub fn build_between(
        &self,
        property: &str,
        low: &ClauseValue,
        high: &ClauseValue,
        ty: Option<AttributeType>,
    ) -> QueryResult<Condition> {
        let low = self.encode(property, low, ty)?;
        let high = self.encode(property, high, ty)?;
        Ok(Condition::new(ComparisonOperator::Between, vec![low, high]))
    }

    /// IN over the given values; list values are flattened one level
    pub fn build_membership(
        &self,
        property: &str,
        values: &[ClauseValue],
        ty: Option<AttributeType>,
    ) -> QueryResult<Condition> {
        let mut encoded = Vec::with_capacity(values.len());
        for value in values {
            match value {
                ClauseValue::List(items) => {
                    for item in items {
                        encoded.push(self.encode(property, item, ty)?);
                    }
                }
                other => encoded.push(self.encode(property, other, ty)?),
            }
        }
        if encoded.is_empty() {
            return Err(QueryError::unsupported_value(property, "IN requires at least one value"));
        }
        Ok(Condition::new(ComparisonOperator::In, encoded))
    }

    /// CONTAINS / NOT_CONTAINS accept a bare scalar or a one-element list
    pub fn build_contains(
        &self,
        property: &str,
        value: &ClauseValue,
        negated: bool,
        ty: Option<AttributeType>,
    ) -> QueryResult<Condition> {
        let element = match value {
            ClauseValue::List(items) if items.len() == 1 => &items[0],
            ClauseValue::List(items) => {
                return Err(QueryError::unsupported_value(
                    property,
                    format!(
                        "{} takes a single element, got a collection of {}",
                        if negated { "NOT_CONTAINS" } else { "CONTAINS" },
                        items.len()
                    ),
                ))
            }
            scalar => scalar,
        };
        let operator = if negated {
            ComparisonOperator::NotContains
        } else {
            ComparisonOperator::Contains
        };
        let encoded = self.encode(property, element, ty)?;
        Ok(Condition::new(operator, vec![encoded]))
    }

    pub fn build_null_check(&self, _property: &str, is_null: bool) -> Condition {
        let operator = if is_null {
            ComparisonOperator::Null
        } else {
            ComparisonOperator::NotNull
        };
        Condition::new(operator, Vec::new())
    }

    /// Encodes one value for a property
    pub fn encode(
        &self,
        property: &str,
        value: &ClauseValue,
        ty: Option<AttributeType>,
    ) -> QueryResult<AttributeValue> {
        if let Some(converter) = self.converters.get(property) {
            return converter
                .convert(value)
                .map_err(|reason| QueryError::unsupported_value(property, reason));
        }
        let declared = ty.or_else(|| self.schema.attribute_type(property));
        encode_value(value, declared).map_err(|reason| QueryError::unsupported_value(property, reason))
    }
}

fn check_arity(clause: &Clause) -> QueryResult<()> {
    let count = clause.values.len();
    let ok = match clause.operator.arity() {
        Arity::None => count == 0,
        Arity::One => count == 1,
        Arity::Two => count == 2,
        Arity::AtLeastOne => count >= 1,
    };
    if ok {
        Ok(())
    } else {
        Err(QueryError::unsupported_value(
            &clause.property,
            format!("{} does not accept {} value(s)", clause.operator, count),
        ))
    }
}

/// Encodes a value without property context (declared type or inference)
pub fn encode_value(value: &ClauseValue, declared: Option<AttributeType>) -> Result<AttributeValue, String> {
    match declared {
        None => infer(value),
        Some(AttributeType::String) => match value {
            ClauseValue::String(s) => Ok(AttributeValue::S(s.clone())),
            ClauseValue::Uuid(u) => Ok(AttributeValue::S(u.to_string())),
            ClauseValue::Timestamp(t) => Ok(AttributeValue::S(iso8601(t))),
            ClauseValue::Integer(i) => Ok(AttributeValue::S(i.to_string())),
            ClauseValue::Float(f) => finite(*f).map(|f| AttributeValue::S(f.to_string())),
            other => Err(mismatch(other, AttributeType::String)),
        },
        Some(AttributeType::Number) => match value {
            ClauseValue::Integer(i) => Ok(AttributeValue::number(i)),
            ClauseValue::Float(f) => finite(*f).map(AttributeValue::number),
            ClauseValue::Boolean(b) => Ok(boolean(*b)),
            ClauseValue::Timestamp(t) => Ok(AttributeValue::number(t.timestamp_millis())),
            ClauseValue::String(s) => parse_number(s),
            other => Err(mismatch(other, AttributeType::Number)),
        },
        Some(AttributeType::Boolean) => match value {
            ClauseValue::Boolean(b) => Ok(boolean(*b)),
            ClauseValue::Integer(0) => Ok(boolean(false)),
            ClauseValue::Integer(1) => Ok(boolean(true)),
            other => Err(mismatch(other, AttributeType::Boolean)),
        },
        Some(AttributeType::Temporal) => match value {
            ClauseValue::Timestamp(t) => Ok(AttributeValue::S(iso8601(t))),
            ClauseValue::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|t| AttributeValue::S(iso8601(&t.with_timezone(&Utc))))
                .map_err(|e| format!("'{}' is not an ISO-8601 timestamp: {}", s, e)),
            other => Err(mismatch(other, AttributeType::Temporal)),
        },
        Some(AttributeType::Custom) => Err("custom attribute type has no registered converter".to_string()),
    }
}

fn infer(value: &ClauseValue) -> Result<AttributeValue, String> {
    match value {
        ClauseValue::String(s) => Ok(AttributeValue::S(s.clone())),
        ClauseValue::Integer(i) => Ok(AttributeValue::number(i)),
        ClauseValue::Float(f) => finite(*f).map(AttributeValue::number),
        ClauseValue::Boolean(b) => Ok(boolean(*b)),
        ClauseValue::Timestamp(t) => Ok(AttributeValue::S(iso8601(t))),
        ClauseValue::Uuid(u) => Ok(AttributeValue::S(u.to_string())),
        ClauseValue::List(_) => Err("a collection cannot be compared as a single value".to_string()),
        ClauseValue::Null => Err("null cannot be compared; use a null check".to_string()),
    }
}

fn boolean(value: bool) -> AttributeValue {
    AttributeValue::N(if value { "1" } else { "0" }.to_string())
}

fn iso8601(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn finite(value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{} is not a finite number", value))
    }
}

fn parse_number(text: &str) -> Result<AttributeValue, String> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(AttributeValue::number(i));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(AttributeValue::number(f)),
        _ => Err(format!("'{}' is not a number", text)),
    }
}

fn mismatch(value: &ClauseValue, declared: AttributeType) -> String {
    format!("a {} value cannot be stored as {}", value.kind(), declared.type_name())
}
