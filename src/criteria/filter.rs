//! Caller-supplied filter expressions
//!
//! Filters are additive: they never influence which access path is chosen,
//! they are AND-combined onto whichever request that path produces.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::condition::{AttributeValue, ClauseValue, ConditionBuilder};
use crate::error::{QueryError, QueryResult};

use super::expression::{NAME_PREFIX, VALUE_PREFIX};

const PLACEHOLDER_PATTERN: &str = r"[#:][A-Za-z0-9_]+";

/// Raw filter expression with its placeholder bindings
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    expression: String,
    names: BTreeMap<String, String>,
    values: BTreeMap<String, ClauseValue>,
    value_properties: BTreeMap<String, String>,
}

impl FilterExpression {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            names: BTreeMap::new(),
            values: BTreeMap::new(),
            value_properties: BTreeMap::new(),
        }
    }

    /// Binds a `#name` placeholder to an attribute name
    pub fn name(mut self, placeholder: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.names.insert(placeholder.into(), attribute.into());
        self
    }

    /// Binds a `:value` placeholder to a value
    ///
    /// The value is encoded by inference from its own type. Use
    /// [`FilterExpression::value_for`] to encode it as a property.
    pub fn value(mut self, placeholder: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        let placeholder = placeholder.into();
        self.value_properties.remove(&placeholder);
        self.values.insert(placeholder, value.into());
        self
    }

    /// Binds a `:value` placeholder to a value encoded as `property`:
    /// its converter or declared attribute type applies
    pub fn value_for(
        mut self,
        placeholder: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<ClauseValue>,
    ) -> Self {
        let placeholder = placeholder.into();
        self.value_properties.insert(placeholder.clone(), property.into());
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Checks the bindings and encodes the values
    pub(crate) fn bind(&self, builder: &ConditionBuilder<'_>) -> QueryResult<BoundFilter> {
        if self.expression.trim().is_empty() {
            return Err(QueryError::InvalidFilterExpression(
                "filter expression is empty".to_string(),
            ));
        }

        let pattern = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| QueryError::InvalidFilterExpression(e.to_string()))?;
        let used: BTreeSet<&str> = pattern
            .find_iter(&self.expression)
            .map(|m| m.as_str())
            .collect();

        for placeholder in &used {
            if placeholder.starts_with(NAME_PREFIX) || placeholder.starts_with(VALUE_PREFIX) {
                return Err(QueryError::InvalidFilterExpression(format!(
                    "placeholder '{}' uses a reserved prefix",
                    placeholder
                )));
            }
            let bound = if placeholder.starts_with('#') {
                self.names.contains_key(*placeholder)
            } else {
                self.values.contains_key(*placeholder)
            };
            if !bound {
                return Err(QueryError::InvalidFilterExpression(format!(
                    "placeholder '{}' is not bound",
                    placeholder
                )));
            }
        }

        for (placeholder, sigil) in self
            .names
            .keys()
            .map(|k| (k, '#'))
            .chain(self.values.keys().map(|k| (k, ':')))
        {
            if !placeholder.starts_with(sigil) {
                return Err(QueryError::InvalidFilterExpression(format!(
                    "placeholder '{}' must start with '{}'",
                    placeholder, sigil
                )));
            }
            if !used.contains(placeholder.as_str()) {
                return Err(QueryError::InvalidFilterExpression(format!(
                    "placeholder '{}' is bound but not used",
                    placeholder
                )));
            }
        }

        let mut values = BTreeMap::new();
        for (placeholder, value) in &self.values {
            let encoded = match self.value_properties.get(placeholder) {
                Some(property) => builder.encode(property, value, None)?,
                None => builder.encode(placeholder, value, None)?,
            };
            values.insert(placeholder.clone(), encoded);
        }

        Ok(BoundFilter {
            expression: self.expression.clone(),
            names: self.names.clone(),
            values,
        })
    }
}

/// A validated filter with encoded values
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoundFilter {
    pub(crate) expression: String,
    pub(crate) names: BTreeMap<String, String>,
    pub(crate) values: BTreeMap<String, AttributeValue>,
}
