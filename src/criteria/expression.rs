//! Condition rendering in the store's expression syntax
//!
//! Attribute names and values never appear inline: each attribute gets a
//! `#kq_n<i>` placeholder (reused when the attribute recurs) and each value
//! a `:kq_v<i>` placeholder, numbered in rendering order.

use std::collections::BTreeMap;

use crate::condition::{AttributeCondition, AttributeValue, ComparisonOperator};

/// Prefix reserved for generated name placeholders
pub(crate) const NAME_PREFIX: &str = "#kq_";
/// Prefix reserved for generated value placeholders
pub(crate) const VALUE_PREFIX: &str = ":kq_";

#[derive(Debug, Default)]
pub(crate) struct ExpressionWriter {
    names: BTreeMap<String, String>,
    values: BTreeMap<String, AttributeValue>,
    name_slots: BTreeMap<String, String>,
    next_value: usize,
}

impl ExpressionWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn name(&mut self, attribute: &str) -> String {
        if let Some(placeholder) = self.name_slots.get(attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("{}n{}", NAME_PREFIX, self.name_slots.len());
        self.name_slots.insert(attribute.to_string(), placeholder.clone());
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    fn value(&mut self, value: &AttributeValue) -> String {
        let placeholder = format!("{}v{}", VALUE_PREFIX, self.next_value);
        self.next_value += 1;
        self.values.insert(placeholder.clone(), value.clone());
        placeholder
    }

    /// Renders one condition
    pub(crate) fn condition(&mut self, condition: &AttributeCondition) -> String {
        let name = self.name(&condition.attribute_name);
        let values: Vec<String> = condition
            .condition
            .attribute_value_list
            .iter()
            .map(|v| self.value(v))
            .collect();

        match condition.operator() {
            ComparisonOperator::Eq => format!("{} = {}", name, values.join(", ")),
            ComparisonOperator::Ne => format!("{} <> {}", name, values.join(", ")),
            ComparisonOperator::Lt => format!("{} < {}", name, values.join(", ")),
            ComparisonOperator::Le => format!("{} <= {}", name, values.join(", ")),
            ComparisonOperator::Gt => format!("{} > {}", name, values.join(", ")),
            ComparisonOperator::Ge => format!("{} >= {}", name, values.join(", ")),
            ComparisonOperator::Between => format!("{} BETWEEN {}", name, values.join(" AND ")),
            ComparisonOperator::In => format!("{} IN ({})", name, values.join(", ")),
            ComparisonOperator::BeginsWith => format!("begins_with({}, {})", name, values.join(", ")),
            ComparisonOperator::Contains => format!("contains({}, {})", name, values.join(", ")),
            ComparisonOperator::NotContains => {
                format!("NOT contains({}, {})", name, values.join(", "))
            }
            ComparisonOperator::Null => format!("attribute_not_exists({})", name),
            ComparisonOperator::NotNull => format!("attribute_exists({})", name),
        }
    }

    /// AND-joins the rendered conditions; `None` when there are none
    pub(crate) fn conjunction<'c, I>(&mut self, conditions: I) -> Option<String>
    where
        I: IntoIterator<Item = &'c AttributeCondition>,
    {
        let rendered: Vec<String> = conditions.into_iter().map(|c| self.condition(c)).collect();
        if rendered.is_empty() {
            None
        } else {
            Some(rendered.join(" AND "))
        }
    }

    /// Adds caller-bound placeholders alongside the generated ones
    pub(crate) fn merge(
        &mut self,
        names: &BTreeMap<String, String>,
        values: &BTreeMap<String, AttributeValue>,
    ) {
        self.names.extend(names.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.values.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, AttributeValue>) {
        (self.names, self.values)
    }
}
