//! Index-candidate resolution
//!
//! An index is a candidate when its members cover every property that
//! carries a condition: an exact match when the sets are equal, a partial
//! match when the index has members left over. Two exact matches mean two
//! indexes were declared on the same attributes, which is a schema bug.
//!
//! Order returned: the exact match (if any), then partial matches sorted
//! by index name. Declaration order plays no part.

use std::collections::BTreeSet;

use crate::error::{QueryError, QueryResult};
use crate::schema::{IndexDefinition, KeySchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchKind {
    Exact,
    Partial,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexCandidate<'s> {
    pub(crate) index: &'s IndexDefinition,
    pub(crate) kind: MatchKind,
}

/// Resolves the candidate indexes for a set of conditioned properties
pub(crate) fn resolve_candidates<'s>(
    schema: &'s KeySchema,
    properties: &BTreeSet<&str>,
) -> QueryResult<Vec<IndexCandidate<'s>>> {
    if properties.is_empty() {
        return Ok(Vec::new());
    }

    let mut exact: Vec<&IndexDefinition> = Vec::new();
    let mut partial: Vec<&IndexDefinition> = Vec::new();

    for index in schema.indexes() {
        let members: BTreeSet<&str> = index.members().collect();
        if !members.is_superset(properties) {
            continue;
        }
        if members.len() == properties.len() {
            exact.push(index);
        } else {
            partial.push(index);
        }
    }

    if exact.len() > 1 {
        let mut indexes: Vec<String> = exact.iter().map(|i| i.name.clone()).collect();
        indexes.sort();
        return Err(QueryError::AmbiguousIndex {
            indexes,
            attributes: properties.iter().map(|p| p.to_string()).collect(),
        });
    }

    partial.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(exact
        .into_iter()
        .map(|index| IndexCandidate {
            index,
            kind: MatchKind::Exact,
        })
        .chain(partial.into_iter().map(|index| IndexCandidate {
            index,
            kind: MatchKind::Partial,
        }))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<'a>(items: &[&'a str]) -> BTreeSet<&'a str> {
        items.iter().copied().collect()
    }

    fn schema() -> KeySchema {
        KeySchema::builder("Customer")
            .partition_key("id")
            .index(IndexDefinition::with_sort("zeta-index", "name", "postCode"))
            .index(IndexDefinition::with_sort("alpha-index", "name", "city"))
            .index(IndexDefinition::new("name-index", "name"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_exact_match_first() {
        let schema = schema();
        let candidates = resolve_candidates(&schema, &set(&["name"])).unwrap();
        let names: Vec<_> = candidates.iter().map(|c| c.index.name.as_str()).collect();
        assert_eq!(names, vec!["name-index", "alpha-index", "zeta-index"]);
        assert_eq!(candidates[0].kind, MatchKind::Exact);
        assert_eq!(candidates[1].kind, MatchKind::Partial);
    }

    #[test]
    fn test_partial_matches_sorted_by_name() {
        let schema = KeySchema::builder("Customer")
            .partition_key("id")
            .index(IndexDefinition::with_sort("zeta-index", "name", "postCode"))
            .index(IndexDefinition::with_sort("alpha-index", "name", "city"))
            .build()
            .unwrap();
        let candidates = resolve_candidates(&schema, &set(&["name"])).unwrap();
        let names: Vec<_> = candidates.iter().map(|c| c.index.name.as_str()).collect();
        assert_eq!(names, vec!["alpha-index", "zeta-index"]);
    }

    #[test]
    fn test_two_attribute_exact_match() {
        let schema = schema();
        let candidates = resolve_candidates(&schema, &set(&["name", "postCode"])).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index.name, "zeta-index");
        assert_eq!(candidates[0].kind, MatchKind::Exact);
    }

    #[test]
    fn test_no_candidates() {
        let schema = schema();
        assert!(resolve_candidates(&schema, &set(&["email"])).unwrap().is_empty());
        assert!(resolve_candidates(&schema, &set(&["name", "email"])).unwrap().is_empty());
        assert!(resolve_candidates(&schema, &BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn test_ambiguous_exact_matches() {
        let schema = KeySchema::builder("Customer")
            .partition_key("id")
            .index(IndexDefinition::new("PostCode-index", "postCode"))
            .index(IndexDefinition::new("PostCode-index-2", "postCode"))
            .build()
            .unwrap();
        let err = resolve_candidates(&schema, &set(&["postCode"])).unwrap_err();
        match err {
            QueryError::AmbiguousIndex { indexes, attributes } => {
                assert_eq!(indexes, vec!["PostCode-index", "PostCode-index-2"]);
                assert_eq!(attributes, vec!["postCode"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
