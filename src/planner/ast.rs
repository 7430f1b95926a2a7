//! Predicate structures consumed by the planner
//!
//! A predicate source (method-name parser, declarative annotation, hand
//! written code) hands over a [`PredicateTree`]: clauses joined by AND,
//! an optional sort, an optional limit, and the shape of result the caller
//! expects.

use std::fmt;

use crate::condition::ClauseValue;
use crate::schema::AttributeType;

/// Clause operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Between,
    In,
    BeginsWith,
    Contains,
    NotContains,
    IsNull,
    IsNotNull,
    True,
    False,
}

/// Number of values an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
    Two,
    AtLeastOne,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Ne => "NE",
            Operator::Gt => "GT",
            Operator::Ge => "GE",
            Operator::Lt => "LT",
            Operator::Le => "LE",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
            Operator::BeginsWith => "BEGINS_WITH",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::IsNull => "IS_NULL",
            Operator::IsNotNull => "IS_NOT_NULL",
            Operator::True => "TRUE",
            Operator::False => "FALSE",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull | Operator::True | Operator::False => Arity::None,
            Operator::Between => Arity::Two,
            Operator::In => Arity::AtLeastOne,
            _ => Arity::One,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (property, operator, values) predicate leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub property: String,
    pub operator: Operator,
    pub values: Vec<ClauseValue>,
    /// Type hint from the predicate source; overrides the schema declaration
    pub value_type: Option<AttributeType>,
}

impl Clause {
    pub fn new(property: impl Into<String>, operator: Operator, values: Vec<ClauseValue>) -> Self {
        Self {
            property: property.into(),
            operator,
            values,
            value_type: None,
        }
    }

    fn single(property: impl Into<String>, operator: Operator, value: impl Into<ClauseValue>) -> Self {
        Self::new(property, operator, vec![value.into()])
    }

    pub fn eq(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Eq, value)
    }

    pub fn ne(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Ne, value)
    }

    pub fn gt(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Gt, value)
    }

    pub fn ge(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Ge, value)
    }

    pub fn lt(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Lt, value)
    }

    pub fn le(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Le, value)
    }

    pub fn between(
        property: impl Into<String>,
        low: impl Into<ClauseValue>,
        high: impl Into<ClauseValue>,
    ) -> Self {
        Self::new(property, Operator::Between, vec![low.into(), high.into()])
    }

    pub fn is_in<V: Into<ClauseValue>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(property, Operator::In, values.into_iter().map(Into::into).collect())
    }

    pub fn begins_with(property: impl Into<String>, prefix: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::BeginsWith, prefix)
    }

    pub fn contains(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::Contains, value)
    }

    pub fn not_contains(property: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Self::single(property, Operator::NotContains, value)
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Self::new(property, Operator::IsNull, Vec::new())
    }

    pub fn is_not_null(property: impl Into<String>) -> Self {
        Self::new(property, Operator::IsNotNull, Vec::new())
    }

    pub fn is_true(property: impl Into<String>) -> Self {
        Self::new(property, Operator::True, Vec::new())
    }

    pub fn is_false(property: impl Into<String>) -> Self {
        Self::new(property, Operator::False, Vec::new())
    }

    /// Sets the type hint
    pub fn with_type(mut self, value_type: AttributeType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

/// Sort directive on one property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortDirective {
    pub property: String,
    pub ascending: bool,
}

impl SortDirective {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }

    pub fn direction(&self) -> &'static str {
        if self.ascending {
            "asc"
        } else {
            "desc"
        }
    }
}

/// Shape of result the caller expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultShape {
    /// Zero or one entity
    Single,
    /// Any number of entities, iterated lazily
    #[default]
    List,
    /// One page of entities plus the total count
    Page,
    /// Number of matches
    Count,
    /// Whether anything matches
    Exists,
    /// Delete the single match
    Delete,
}

impl ResultShape {
    /// Shapes that reduce the result to at most one entity
    pub fn is_single_entity(&self) -> bool {
        matches!(self, ResultShape::Single | ResultShape::Delete)
    }
}

/// Parsed predicate: OR-separated parts of AND-joined clauses
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateTree {
    pub or_parts: Vec<Vec<Clause>>,
    pub sort: Vec<SortDirective>,
    pub limit: Option<u32>,
    pub shape: ResultShape,
}

impl PredicateTree {
    pub fn new(shape: ResultShape) -> Self {
        Self {
            or_parts: vec![Vec::new()],
            sort: Vec::new(),
            limit: None,
            shape,
        }
    }

    /// AND-joins a clause onto the current part
    pub fn and(mut self, clause: Clause) -> Self {
        match self.or_parts.last_mut() {
            Some(part) => part.push(clause),
            None => self.or_parts.push(vec![clause]),
        }
        self
    }

    /// Starts a new OR part
    pub fn or(mut self) -> Self {
        self.or_parts.push(Vec::new());
        self
    }

    pub fn sorted_by(mut self, sort: SortDirective) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the tree contains an OR
    pub fn has_or(&self) -> bool {
        self.or_parts.len() > 1
    }
}
