//! Property Tests
//!
//! Universally quantified selection properties:
//! - Partition-key equality on a partition-only key always loads directly
//! - Key-illegal comparators on the sort key never reach the primary key
//! - Selection and request building are deterministic

mod common;

use common::{playlist_schema, user_schema, Playlist, SpyStore};
use keyquery::condition::ClauseValue;
use keyquery::planner::{Clause, Operator};
use keyquery::schema::IndexDefinition;
use keyquery::{AccessPath, AccessPathKind, ErrorCode, KeySchema, QueryCriteria, QueryResult};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

const PROPERTIES: [&str; 5] = ["id", "name", "postCode", "city", "email"];

fn arb_value() -> impl Strategy<Value = ClauseValue> {
    prop_oneof![
        "[a-zA-Z0-9_]{1,12}".prop_map(ClauseValue::String),
        any::<i64>().prop_map(ClauseValue::Integer),
    ]
}

fn arb_single_value_operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Eq),
        Just(Operator::Ne),
        Just(Operator::Gt),
        Just(Operator::Ge),
        Just(Operator::Lt),
        Just(Operator::Le),
        Just(Operator::BeginsWith),
        Just(Operator::Contains),
    ]
}

fn arb_key_legal_range() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Gt),
        Just(Operator::Ge),
        Just(Operator::Lt),
        Just(Operator::Le),
        Just(Operator::BeginsWith),
    ]
}

fn arb_key_illegal() -> impl Strategy<Value = Clause> {
    prop_oneof![
        arb_value().prop_map(|v| Clause::new("playlistName", Operator::Ne, vec![v])),
        arb_value().prop_map(|v| Clause::new("playlistName", Operator::Contains, vec![v])),
        arb_value().prop_map(|v| Clause::new("playlistName", Operator::NotContains, vec![v])),
        prop::collection::vec(arb_value(), 1..4).prop_map(|vs| Clause::new("playlistName", Operator::In, vs)),
        Just(Clause::is_null("playlistName")),
        Just(Clause::is_not_null("playlistName")),
    ]
}

fn arb_clause() -> impl Strategy<Value = Clause> {
    (0..PROPERTIES.len(), arb_single_value_operator(), arb_value())
        .prop_map(|(p, op, v)| Clause::new(PROPERTIES[p], op, vec![v]))
}

// =============================================================================
// Helper Functions
// =============================================================================

fn indexed_schema() -> KeySchema {
    KeySchema::builder("Customer")
        .partition_key("id")
        .index(IndexDefinition::with_sort("Name-PostCode-index", "name", "postCode"))
        .index(IndexDefinition::with_sort("Name-City-index", "name", "city"))
        .index(IndexDefinition::new("Email-index", "email"))
        .build()
        .unwrap()
}

fn criteria_for<'s>(schema: &'s KeySchema, clauses: &[Clause]) -> QueryResult<QueryCriteria<'s>> {
    clauses
        .iter()
        .try_fold(QueryCriteria::new(schema), |criteria, clause| {
            criteria.with_clause(clause.clone())
        })
}

fn select(schema: &KeySchema, clauses: &[Clause]) -> Result<AccessPath, ErrorCode> {
    criteria_for(schema, clauses)
        .and_then(|criteria| criteria.access_path())
        .map_err(|e| e.code())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// EQ on a partition-only key is always a direct load.
    #[test]
    fn prop_partition_only_eq_loads(value in arb_value()) {
        let path = select(&user_schema(), &[Clause::new("id", Operator::Eq, vec![value])]).unwrap();
        prop_assert_eq!(path.kind(), AccessPathKind::DirectLoad);
    }

    /// EQ on both composite key members is a direct load; a key-legal range
    /// on the sort key is a primary query.
    #[test]
    fn prop_composite_key_paths(
        partition in arb_value(),
        sort in arb_value(),
        op in arb_key_legal_range(),
    ) {
        let schema = playlist_schema();
        let load = select(&schema, &[
            Clause::new("userName", Operator::Eq, vec![partition.clone()]),
            Clause::new("playlistName", Operator::Eq, vec![sort.clone()]),
        ]).unwrap();
        prop_assert_eq!(load.kind(), AccessPathKind::DirectLoad);

        let query = select(&schema, &[
            Clause::new("userName", Operator::Eq, vec![partition]),
            Clause::new("playlistName", op, vec![sort]),
        ]).unwrap();
        prop_assert_eq!(query.kind(), AccessPathKind::PrimaryQuery);
    }

    /// Key-illegal comparators on the sort key never produce a primary query.
    #[test]
    fn prop_illegal_sort_comparator_never_primary(partition in arb_value(), clause in arb_key_illegal()) {
        let schema = playlist_schema();
        let path = select(&schema, &[
            Clause::new("userName", Operator::Eq, vec![partition]),
            clause,
        ]).unwrap();
        prop_assert_ne!(path.kind(), AccessPathKind::PrimaryQuery);
    }

    /// The same clauses always select the same path or the same error.
    #[test]
    fn prop_selection_deterministic(clauses in prop::collection::vec(arb_clause(), 0..5)) {
        let schema = indexed_schema();
        let first = select(&schema, &clauses);
        for _ in 0..3 {
            prop_assert_eq!(&select(&schema, &clauses), &first);
        }
    }

    /// Building twice from the same criteria yields identical requests.
    #[test]
    fn prop_build_idempotent(clauses in prop::collection::vec(arb_clause(), 0..5)) {
        let schema = indexed_schema();
        let store = SpyStore::empty();
        if let Ok(criteria) = criteria_for(&schema, &clauses) {
            let first = criteria.build_query::<Playlist, _>(&store).map(|q| q.request().clone());
            let second = criteria.build_query::<Playlist, _>(&store).map(|q| q.request().clone());
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(a), Err(b)) => prop_assert_eq!(a.code(), b.code()),
                _ => prop_assert!(false, "builds disagree"),
            }
        }
    }
}
