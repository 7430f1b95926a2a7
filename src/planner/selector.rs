//! Access-path selection
//!
//! Decision order (each step short-circuits):
//! 1. Direct load: only key equalities, and the full primary key is known
//! 2. Primary query: partition equality plus at most a key-legal condition
//!    on the sort key
//! 3. Index query: the first candidate index whose partition member has an
//!    equality and whose remaining member (if conditioned) uses a key-legal
//!    comparator
//! 4. Scan: everything else, all conditions become filters
//!
//! Selection is a pure function of the schema and the criteria.

use std::collections::{BTreeMap, BTreeSet};

use crate::condition::AttributeCondition;
use crate::criteria::QueryCriteria;
use crate::error::{QueryError, QueryResult};
use crate::observability::{log_event, Event};
use crate::schema::{IndexDefinition, KeySchema, KeyShape};

use super::ast::SortDirective;
use super::candidates::resolve_candidates;
use super::path::AccessPath;

/// Chooses the cheapest legal access path for a set of criteria
#[derive(Debug, Clone, Copy)]
pub struct AccessPathSelector<'a> {
    schema: &'a KeySchema,
}

impl<'a> AccessPathSelector<'a> {
    pub fn new(schema: &'a KeySchema) -> Self {
        Self { schema }
    }

    /// Selects the access path, or explains why none is legal
    pub fn select(&self, criteria: &QueryCriteria<'_>) -> QueryResult<AccessPath> {
        if criteria.sort().len() > 1 {
            return Err(QueryError::unsupported(format!(
                "sorting by more than one property is not supported ({} requested)",
                criteria.sort().len()
            )));
        }

        let path = if let Some(path) = self.direct_load(criteria) {
            path
        } else if let Some(path) = self.primary_query(criteria)? {
            path
        } else if let Some(path) = self.index_query(criteria)? {
            path
        } else {
            self.scan(criteria)?
        };

        log_event(
            Event::AccessPathSelected,
            &[
                ("entity", self.schema.entity()),
                ("index", path.index_name().unwrap_or("-")),
                ("path", path.kind().as_str()),
            ],
        );
        Ok(path)
    }

    fn direct_load(&self, criteria: &QueryCriteria<'_>) -> Option<AccessPath> {
        if !criteria.other_conditions().is_empty() {
            return None;
        }
        let partition_value = criteria.partition_equality()?.condition.single_value()?.clone();

        match self.schema.shape() {
            KeyShape::PartitionOnly { .. } => Some(AccessPath::DirectLoad {
                partition_value,
                sort_value: None,
            }),
            KeyShape::PartitionAndSort { .. } => {
                let sort = criteria.sort_condition()?;
                if !sort.condition.is_equality() {
                    return None;
                }
                Some(AccessPath::DirectLoad {
                    partition_value,
                    sort_value: Some(sort.condition.single_value()?.clone()),
                })
            }
        }
    }

    fn primary_query(&self, criteria: &QueryCriteria<'_>) -> QueryResult<Option<AccessPath>> {
        let sort_key = match self.schema.shape() {
            KeyShape::PartitionOnly { .. } => return Ok(None),
            KeyShape::PartitionAndSort { sort, .. } => sort.as_str(),
        };
        let partition = match criteria.partition_equality() {
            Some(partition) => partition,
            None => return Ok(None),
        };
        if !criteria.other_conditions().is_empty() {
            return Ok(None);
        }
        if let Some(sort) = criteria.sort_condition() {
            if !sort.condition.is_query_legal() {
                return Ok(None);
            }
        }
        let partition_value = match partition.condition.single_value() {
            Some(value) => value.clone(),
            None => return Ok(None),
        };

        let sort_directive = match criteria.sort().first() {
            Some(directive) if directive.property == sort_key => Some(directive.clone()),
            Some(_) => {
                return Err(QueryError::unsupported(format!(
                    "sorting only possible by [{}] for the criteria specified",
                    sort_key
                )))
            }
            None => None,
        };

        Ok(Some(AccessPath::PrimaryQuery {
            partition_value,
            sort_condition: criteria.sort_condition().cloned(),
            sort_directive,
        }))
    }

    fn index_query(&self, criteria: &QueryCriteria<'_>) -> QueryResult<Option<AccessPath>> {
        let by_property = criteria.conditions_by_property();
        let properties: BTreeSet<&str> = by_property.keys().copied().collect();

        // first sort rejection, reported only if no candidate serves the sort
        let mut sort_rejection = None;
        for candidate in resolve_candidates(self.schema, &properties)? {
            let (partition_condition, sort_condition) =
                match key_conditions(candidate.index, &by_property) {
                    Some(conditions) => conditions,
                    None => continue,
                };
            let sort_directive =
                match index_sort(criteria.sort(), candidate.index, sort_condition.as_ref()) {
                    Ok(directive) => directive,
                    Err(err) => {
                        sort_rejection.get_or_insert(err);
                        continue;
                    }
                };

            return Ok(Some(AccessPath::IndexQuery {
                index_name: candidate.index.name.clone(),
                partition_condition,
                sort_condition,
                sort_directive,
            }));
        }
        match sort_rejection {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    fn scan(&self, criteria: &QueryCriteria<'_>) -> QueryResult<AccessPath> {
        if let Some(directive) = criteria.sort().first() {
            return Err(QueryError::unsupported(format!(
                "sorting by '{}' is not possible: the criteria require a scan",
                directive.property
            )));
        }
        if !criteria.scan_policy().enabled {
            return Err(QueryError::unsupported(format!(
                "scanning is not enabled for entity '{}' and the criteria cannot be served by a key condition",
                self.schema.entity()
            )));
        }

        let filter_conditions: Vec<AttributeCondition> = criteria.all_conditions().cloned().collect();
        if !filter_conditions.is_empty() {
            let count = filter_conditions.len().to_string();
            log_event(
                Event::ScanFallback,
                &[("entity", self.schema.entity()), ("filters", count.as_str())],
            );
        }
        Ok(AccessPath::Scan { filter_conditions })
    }
}

/// Key conditions for an index, if the conditioned properties can be
/// served by it: equality on the partition member, at most one key-legal
/// condition on the sort member, nothing else.
fn key_conditions(
    index: &IndexDefinition,
    by_property: &BTreeMap<&str, Vec<&AttributeCondition>>,
) -> Option<(AttributeCondition, Option<AttributeCondition>)> {
    let partition = match by_property.get(index.partition.as_str()) {
        Some(conditions) if conditions.len() == 1 && conditions[0].condition.is_equality() => {
            conditions[0].clone()
        }
        _ => return None,
    };

    let sort = match index.sort.as_deref().and_then(|sort| by_property.get(sort)) {
        None => None,
        Some(conditions) if conditions.len() == 1 && conditions[0].condition.is_query_legal() => {
            Some(conditions[0].clone())
        }
        Some(_) => return None,
    };

    let used = 1 + usize::from(sort.is_some());
    if used != by_property.len() {
        return None;
    }
    Some((partition, sort))
}

/// Sort legality on an index query: only the index sort member, and not
/// when both key members are pinned by equality.
fn index_sort(
    sort: &[SortDirective],
    index: &IndexDefinition,
    sort_condition: Option<&AttributeCondition>,
) -> QueryResult<Option<SortDirective>> {
    let directive = match sort.first() {
        Some(directive) => directive,
        None => return Ok(None),
    };
    let range = match index.sort.as_deref() {
        Some(range) => range,
        None => {
            return Err(QueryError::unsupported(format!(
                "index '{}' has no sort key; sorting by '{}' is not possible",
                index.name, directive.property
            )))
        }
    };
    if directive.property != range {
        return Err(QueryError::unsupported(format!(
            "sorting only possible by [{}] for the criteria specified",
            range
        )));
    }
    if sort_condition.map_or(false, |c| c.condition.is_equality()) {
        return Err(QueryError::unsupported(format!(
            "sorting for index '{}' with equality criteria on both partition and sort attributes is not possible",
            index.name
        )));
    }
    Ok(Some(directive.clone()))
}
