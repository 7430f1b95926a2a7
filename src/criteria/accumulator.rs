//! Criteria accumulation
//!
//! Clauses are routed into three buckets as they arrive:
//! - partition equality: an EQ on the partition key (at most one)
//! - sort condition: the first clause on the sort key
//! - other conditions: everything else, per property in arrival order
//!
//! Nothing is executed until a query is built and consumed.

use std::collections::BTreeMap;

use crate::condition::{AttributeCondition, ClauseValue, Condition, ConditionBuilder, ConverterRegistry};
use crate::config::{ConsistencyMode, QueryConfig, ScanPolicy};
use crate::error::{QueryError, QueryResult};
use crate::observability::{log_event, Event};
use crate::planner::{
    AccessPath, AccessPathSelector, Arity, Clause, ExplainPlan, Operator, PredicateTree,
    ResultShape, SortDirective,
};
use crate::schema::{EntityDefinition, KeySchema};
use crate::store::StoreOperations;

use super::assemble::{assemble, RequestMode};
use super::filter::{BoundFilter, FilterExpression};
use super::query::{CountQuery, Query};

/// Accumulated predicate for one logical query
#[derive(Debug, Clone)]
pub struct QueryCriteria<'s> {
    schema: &'s KeySchema,
    converters: ConverterRegistry,
    config: QueryConfig,
    partition_equality: Option<AttributeCondition>,
    sort_condition: Option<AttributeCondition>,
    other_conditions: BTreeMap<String, Vec<AttributeCondition>>,
    sort: Vec<SortDirective>,
    limit: Option<u32>,
    projection: Option<String>,
    consistency: Option<ConsistencyMode>,
    filter: Option<BoundFilter>,
    shape: ResultShape,
}

impl<'s> QueryCriteria<'s> {
    /// Creates empty criteria with the default query configuration
    pub fn new(schema: &'s KeySchema) -> Self {
        Self {
            schema,
            converters: ConverterRegistry::new(),
            config: QueryConfig::default(),
            partition_equality: None,
            sort_condition: None,
            other_conditions: BTreeMap::new(),
            sort: Vec::new(),
            limit: None,
            projection: None,
            consistency: None,
            filter: None,
            shape: ResultShape::default(),
        }
    }

    /// Creates empty criteria for a loaded entity, carrying its configuration
    pub fn for_entity(definition: &'s EntityDefinition) -> Self {
        Self::new(&definition.schema).with_config(definition.config)
    }

    /// Folds a parsed predicate into new criteria
    pub fn from_predicate(schema: &'s KeySchema, tree: &PredicateTree) -> QueryResult<Self> {
        Self::new(schema).with_predicate(tree)
    }

    /// Folds a parsed predicate in; OR is not supported
    pub fn with_predicate(mut self, tree: &PredicateTree) -> QueryResult<Self> {
        if tree.has_or() {
            return Err(QueryError::unsupported("OR queries are not supported"));
        }
        for clause in tree.or_parts.iter().flatten() {
            self = self.with_clause(clause.clone())?;
        }
        self.sort.extend(tree.sort.iter().cloned());
        if let Some(limit) = tree.limit {
            self.limit = Some(limit);
        }
        self.shape = tree.shape;
        Ok(self)
    }

    /// Adds one clause
    pub fn with_clause(mut self, clause: Clause) -> QueryResult<Self> {
        let condition = ConditionBuilder::new(self.schema, &self.converters).build(&clause)?;
        self.route(&clause.property, condition)?;
        Ok(self)
    }

    pub fn with_equality(self, property: &str, value: impl Into<ClauseValue>) -> QueryResult<Self> {
        self.with_clause(Clause::eq(property, value))
    }

    /// Adds a single-value comparison (NE, GT, GE, LT, LE, BEGINS_WITH,
    /// CONTAINS, NOT_CONTAINS)
    pub fn with_range(
        self,
        property: &str,
        operator: Operator,
        value: impl Into<ClauseValue>,
    ) -> QueryResult<Self> {
        if operator.arity() != Arity::One {
            return Err(QueryError::unsupported(format!(
                "{} is not a single-value comparison",
                operator
            )));
        }
        self.with_clause(Clause::new(property, operator, vec![value.into()]))
    }

    pub fn with_between(
        self,
        property: &str,
        low: impl Into<ClauseValue>,
        high: impl Into<ClauseValue>,
    ) -> QueryResult<Self> {
        self.with_clause(Clause::between(property, low, high))
    }

    pub fn with_membership<V: Into<ClauseValue>>(
        self,
        property: &str,
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<Self> {
        self.with_clause(Clause::is_in(property, values))
    }

    pub fn with_null_check(self, property: &str, is_null: bool) -> QueryResult<Self> {
        let clause = if is_null {
            Clause::is_null(property)
        } else {
            Clause::is_not_null(property)
        };
        self.with_clause(clause)
    }

    /// Adds a raw filter, validated and encoded now
    pub fn with_filter_expression(mut self, filter: FilterExpression) -> QueryResult<Self> {
        if self.filter.is_some() {
            return Err(QueryError::InvalidFilterExpression(
                "a filter expression is already set".to_string(),
            ));
        }
        let bound = filter.bind(&ConditionBuilder::new(self.schema, &self.converters))?;
        self.filter = Some(bound);
        Ok(self)
    }

    pub fn with_sort(mut self, sort: SortDirective) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Overrides the configured read consistency
    pub fn with_consistency(mut self, consistency: ConsistencyMode) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scan_policy(mut self, scan: ScanPolicy) -> Self {
        self.config.scan = scan;
        self
    }

    /// Replaces the converters; affects clauses added afterwards
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    pub fn with_shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }

    fn route(&mut self, property: &str, condition: Condition) -> QueryResult<()> {
        let condition = AttributeCondition {
            property: property.to_string(),
            attribute_name: self.schema.attribute_name(property).to_string(),
            condition,
        };

        if self.schema.is_partition_key(property) && condition.condition.is_equality() {
            if self.partition_equality.is_some() {
                return Err(QueryError::unsupported(format!(
                    "partition key '{}' already has an equality condition",
                    property
                )));
            }
            self.partition_equality = Some(condition);
        } else if self.schema.is_sort_key(property) && self.sort_condition.is_none() {
            self.sort_condition = Some(condition);
        } else {
            self.other_conditions
                .entry(property.to_string())
                .or_default()
                .push(condition);
        }
        Ok(())
    }

    pub fn schema(&self) -> &'s KeySchema {
        self.schema
    }

    pub fn partition_equality(&self) -> Option<&AttributeCondition> {
        self.partition_equality.as_ref()
    }

    pub fn sort_condition(&self) -> Option<&AttributeCondition> {
        self.sort_condition.as_ref()
    }

    pub fn other_conditions(&self) -> &BTreeMap<String, Vec<AttributeCondition>> {
        &self.other_conditions
    }

    /// Every condition: partition equality, sort condition, then the rest
    pub fn all_conditions(&self) -> impl Iterator<Item = &AttributeCondition> {
        self.partition_equality
            .iter()
            .chain(self.sort_condition.iter())
            .chain(self.other_conditions.values().flatten())
    }

    /// Conditions grouped by property, sort slot included
    pub(crate) fn conditions_by_property(&self) -> BTreeMap<&str, Vec<&AttributeCondition>> {
        let mut grouped: BTreeMap<&str, Vec<&AttributeCondition>> = BTreeMap::new();
        for condition in self.all_conditions() {
            grouped.entry(condition.property.as_str()).or_default().push(condition);
        }
        grouped
    }

    pub fn sort(&self) -> &[SortDirective] {
        &self.sort
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn projection(&self) -> Option<&str> {
        self.projection.as_deref()
    }

    /// Effective read consistency
    pub fn consistency(&self) -> ConsistencyMode {
        self.consistency.unwrap_or(self.config.consistency)
    }

    pub fn scan_policy(&self) -> ScanPolicy {
        self.config.scan
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    pub(crate) fn bound_filter(&self) -> Option<&BoundFilter> {
        self.filter.as_ref()
    }

    /// Selects the access path without building a request
    pub fn access_path(&self) -> QueryResult<AccessPath> {
        AccessPathSelector::new(self.schema).select(self)
    }

    pub fn explain(&self) -> ExplainPlan {
        match self.access_path() {
            Ok(path) => ExplainPlan::from_path(&path),
            Err(err) => ExplainPlan::from_error(&err),
        }
    }

    /// Builds the item query; the store is called when the query is consumed
    pub fn build_query<'a, T, S>(&self, store: &'a S) -> QueryResult<Query<'a, T, S>>
    where
        's: 'a,
        T: Clone + 'static,
        S: StoreOperations<T> + ?Sized,
    {
        let path = self.access_path()?;
        let request = assemble(self, &path, RequestMode::Items, |schema| {
            store.overridden_table_name(schema, schema.table_name())
        });
        Ok(Query::new(store, self.schema, path, request, self.shape))
    }

    /// Builds the count query
    ///
    /// A paged count that would need a scan requires scan counting to be
    /// enabled.
    pub fn build_count_query<'a, T, S>(&self, store: &'a S, paged: bool) -> QueryResult<CountQuery<'a, T, S>>
    where
        's: 'a,
        S: StoreOperations<T> + ?Sized,
    {
        let path = self.access_path()?;
        let serves_pages = !path.is_scan() || self.config.scan.count_enabled;
        if path.is_scan() {
            if paged && !serves_pages {
                return Err(QueryError::unsupported(format!(
                    "counting '{}' for a page requires a scan and scan counting is not enabled",
                    self.schema.entity()
                )));
            }
            log_event(Event::CountViaScan, &[("entity", self.schema.entity())]);
        }
        let request = assemble(self, &path, RequestMode::Count, |schema| {
            store.overridden_table_name(schema, schema.table_name())
        });
        Ok(CountQuery::new(store, self.schema, request, serves_pages))
    }
}
