//! Access paths
//!
//! Exactly one path is chosen per query. Cheapest first: direct load,
//! primary-key query, secondary-index query, scan.

use std::fmt;

use crate::condition::{AttributeCondition, AttributeValue};

use super::ast::SortDirective;

/// Path kind, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessPathKind {
    DirectLoad,
    PrimaryQuery,
    IndexQuery,
    Scan,
}

impl AccessPathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPathKind::DirectLoad => "DIRECT_LOAD",
            AccessPathKind::PrimaryQuery => "PRIMARY_QUERY",
            AccessPathKind::IndexQuery => "INDEX_QUERY",
            AccessPathKind::Scan => "SCAN",
        }
    }
}

impl fmt::Display for AccessPathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The strategy chosen to satisfy a predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    /// Fetch one item by its full primary key
    DirectLoad {
        partition_value: AttributeValue,
        sort_value: Option<AttributeValue>,
    },
    /// Key-condition query on the table's primary key
    PrimaryQuery {
        partition_value: AttributeValue,
        sort_condition: Option<AttributeCondition>,
        sort_directive: Option<SortDirective>,
    },
    /// Key-condition query on a secondary index
    IndexQuery {
        index_name: String,
        partition_condition: AttributeCondition,
        sort_condition: Option<AttributeCondition>,
        sort_directive: Option<SortDirective>,
    },
    /// Full scan, every condition applied as a filter
    Scan { filter_conditions: Vec<AttributeCondition> },
}

impl AccessPath {
    pub fn kind(&self) -> AccessPathKind {
        match self {
            AccessPath::DirectLoad { .. } => AccessPathKind::DirectLoad,
            AccessPath::PrimaryQuery { .. } => AccessPathKind::PrimaryQuery,
            AccessPath::IndexQuery { .. } => AccessPathKind::IndexQuery,
            AccessPath::Scan { .. } => AccessPathKind::Scan,
        }
    }

    /// Index queried, for index queries
    pub fn index_name(&self) -> Option<&str> {
        match self {
            AccessPath::IndexQuery { index_name, .. } => Some(index_name),
            _ => None,
        }
    }

    /// Sort applied by the store, if any
    pub fn sort_directive(&self) -> Option<&SortDirective> {
        match self {
            AccessPath::PrimaryQuery { sort_directive, .. }
            | AccessPath::IndexQuery { sort_directive, .. } => sort_directive.as_ref(),
            _ => None,
        }
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, AccessPath::Scan { .. })
    }
}
