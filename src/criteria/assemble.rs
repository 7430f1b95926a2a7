//! Access path to native request translation

use crate::condition::{AttributeCondition, AttributeValue, ComparisonOperator, Condition};
use crate::planner::{AccessPath, SortDirective};
use crate::schema::KeySchema;

use super::accumulator::QueryCriteria;
use super::expression::ExpressionWriter;
use super::filter::BoundFilter;
use super::request::{LoadRequest, QueryRequest, ScanRequest, Select, StoreRequest};

/// Whether the request fetches items or counts them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestMode {
    Items,
    Count,
}

/// Builds the native request for a selected path
///
/// `index_table` resolves the explicit table name for index queries and is
/// only called for them.
pub(crate) fn assemble<F>(
    criteria: &QueryCriteria<'_>,
    path: &AccessPath,
    mode: RequestMode,
    index_table: F,
) -> StoreRequest
where
    F: FnOnce(&KeySchema) -> String,
{
    let schema = criteria.schema();

    match path {
        AccessPath::DirectLoad {
            partition_value,
            sort_value,
        } => match criteria.bound_filter() {
            None => StoreRequest::Load(LoadRequest {
                partition_value: partition_value.clone(),
                sort_value: sort_value.clone(),
                consistent_read: criteria.consistency().consistent_read(),
                projection_expression: criteria.projection().map(str::to_string),
            }),
            // a load cannot carry a filter, so ask for the same key as a query
            Some(_) => {
                let mut key = vec![key_equality(schema, schema.partition_key(), partition_value)];
                if let (Some(sort_key), Some(sort_value)) = (schema.sort_key(), sort_value) {
                    key.push(key_equality(schema, sort_key, sort_value));
                }
                StoreRequest::Query(query_request(criteria, mode, &key, None, None, None))
            }
        },
        AccessPath::PrimaryQuery {
            partition_value,
            sort_condition,
            sort_directive,
        } => {
            let mut key = vec![key_equality(schema, schema.partition_key(), partition_value)];
            key.extend(sort_condition.iter().cloned());
            StoreRequest::Query(query_request(
                criteria,
                mode,
                &key,
                None,
                None,
                sort_directive.as_ref(),
            ))
        }
        AccessPath::IndexQuery {
            index_name,
            partition_condition,
            sort_condition,
            sort_directive,
        } => {
            let mut key = vec![partition_condition.clone()];
            key.extend(sort_condition.iter().cloned());
            StoreRequest::Query(query_request(
                criteria,
                mode,
                &key,
                Some(index_table(schema)),
                Some(index_name.clone()),
                sort_directive.as_ref(),
            ))
        }
        AccessPath::Scan { filter_conditions } => {
            StoreRequest::Scan(scan_request(criteria, mode, filter_conditions))
        }
    }
}

fn key_equality(schema: &KeySchema, property: &str, value: &AttributeValue) -> AttributeCondition {
    AttributeCondition {
        property: property.to_string(),
        attribute_name: schema.attribute_name(property).to_string(),
        condition: Condition::new(ComparisonOperator::Eq, vec![value.clone()]),
    }
}

fn query_request(
    criteria: &QueryCriteria<'_>,
    mode: RequestMode,
    key: &[AttributeCondition],
    table_name: Option<String>,
    index_name: Option<String>,
    sort: Option<&SortDirective>,
) -> QueryRequest {
    let mut writer = ExpressionWriter::new();
    let key_condition_expression = writer.conjunction(key).unwrap_or_default();
    let filter_expression = user_filter(&mut writer, None, criteria.bound_filter());
    let select = select(criteria, mode, index_name.is_some());
    let (names, values) = writer.into_parts();

    QueryRequest {
        table_name,
        index_name,
        key_condition_expression,
        filter_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        scan_index_forward: sort.map_or(true, |s| s.ascending),
        limit: limit(criteria, mode),
        consistent_read: criteria.consistency().consistent_read(),
        projection_expression: projection(criteria, mode),
        select,
    }
}

fn scan_request(
    criteria: &QueryCriteria<'_>,
    mode: RequestMode,
    filters: &[AttributeCondition],
) -> ScanRequest {
    let mut writer = ExpressionWriter::new();
    let generated = writer.conjunction(filters);
    let filter_expression = user_filter(&mut writer, generated, criteria.bound_filter());
    let (names, values) = writer.into_parts();

    ScanRequest {
        filter_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        limit: limit(criteria, mode),
        consistent_read: criteria.consistency().consistent_read(),
        projection_expression: projection(criteria, mode),
        select: select(criteria, mode, false),
    }
}

/// AND-combines generated filters with the caller's raw filter
fn user_filter(
    writer: &mut ExpressionWriter,
    generated: Option<String>,
    user: Option<&BoundFilter>,
) -> Option<String> {
    let user = match user {
        Some(user) => user,
        None => return generated,
    };
    writer.merge(&user.names, &user.values);
    match generated {
        Some(generated) => Some(format!("{} AND ({})", generated, user.expression)),
        None => Some(user.expression.clone()),
    }
}

fn select(criteria: &QueryCriteria<'_>, mode: RequestMode, index: bool) -> Select {
    match mode {
        RequestMode::Count => Select::Count,
        RequestMode::Items if criteria.projection().is_some() => Select::SpecificAttributes,
        RequestMode::Items if index => Select::AllProjectedAttributes,
        RequestMode::Items => Select::AllAttributes,
    }
}

fn projection(criteria: &QueryCriteria<'_>, mode: RequestMode) -> Option<String> {
    match mode {
        RequestMode::Count => None,
        RequestMode::Items => criteria.projection().map(str::to_string),
    }
}

fn limit(criteria: &QueryCriteria<'_>, mode: RequestMode) -> Option<u32> {
    match mode {
        RequestMode::Count => None,
        RequestMode::Items => criteria.limit(),
    }
}
