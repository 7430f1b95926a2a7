//! Request Assembly Tests
//!
//! Tests for the native requests built from each access path:
//! - Key conditions and filters rendered with generated placeholders
//! - Raw filter expressions layered on top of any path
//! - Table-name resolution for index queries
//! - Identical criteria build identical requests

mod common;

use common::{customer_schema, playlist_schema, user_schema, Playlist, SpyStore};
use keyquery::condition::AttributeValue;
use keyquery::config::{ConsistencyMode, ScanPolicy};
use keyquery::criteria::{Select, StoreRequest};
use keyquery::planner::{Operator, SortDirective};
use keyquery::{ErrorCode, FilterExpression, QueryCriteria};
use std::collections::BTreeMap;

// =============================================================================
// Helper Functions
// =============================================================================

fn build(criteria: &QueryCriteria<'_>, store: &SpyStore) -> StoreRequest {
    criteria
        .build_query::<Playlist, _>(store)
        .unwrap()
        .request()
        .clone()
}

fn names(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Load Requests
// =============================================================================

/// A direct load without a filter is a load request.
#[test]
fn test_direct_load_request() {
    let schema = user_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("id", "u1")
        .unwrap()
        .with_consistency(ConsistencyMode::Consistent);

    let request = build(&criteria, &store);
    let load = request.as_load().expect("load request");
    assert_eq!(load.partition_value, AttributeValue::string("u1"));
    assert_eq!(load.sort_value, None);
    assert_eq!(load.consistent_read, Some(true));
}

/// A direct load with a filter becomes a key-equality query carrying it.
#[test]
fn test_direct_load_with_filter_becomes_query() {
    let schema = playlist_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("userName", "mike")
        .unwrap()
        .with_equality("playlistName", "p1")
        .unwrap()
        .with_filter_expression(
            FilterExpression::new("#shared = :yes")
                .name("#shared", "shared")
                .value(":yes", true),
        )
        .unwrap();

    let request = build(&criteria, &store);
    let query = request.as_query().expect("query request");
    assert_eq!(query.key_condition_expression, "#kq_n0 = :kq_v0 AND #kq_n1 = :kq_v1");
    assert_eq!(query.filter_expression.as_deref(), Some("#shared = :yes"));
    assert_eq!(query.index_name, None);
    assert_eq!(query.expression_attribute_values[":yes"], AttributeValue::N("1".into()));
    assert_eq!(query.expression_attribute_names["#kq_n0"], "user_name");
}

// =============================================================================
// Query Requests
// =============================================================================

/// Scenario C renders both key conditions on the table.
#[test]
fn test_primary_query_request() {
    let schema = playlist_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("userName", "mike")
        .unwrap()
        .with_range("playlistName", Operator::Gt, "m")
        .unwrap()
        .with_sort(SortDirective::desc("playlistName"))
        .with_limit(20);

    let request = build(&criteria, &store);
    let query = request.as_query().expect("query request");
    assert_eq!(query.table_name, None);
    assert_eq!(query.key_condition_expression, "#kq_n0 = :kq_v0 AND #kq_n1 > :kq_v1");
    assert_eq!(
        query.expression_attribute_names,
        names(&[("#kq_n0", "user_name"), ("#kq_n1", "playlistName")])
    );
    assert_eq!(query.expression_attribute_values[":kq_v1"], AttributeValue::string("m"));
    assert!(!query.scan_index_forward);
    assert_eq!(query.limit, Some(20));
    assert_eq!(query.select, Select::AllAttributes);
    assert_eq!(query.filter_expression, None);
}

/// Scenario D addresses the index and the resolved table explicitly.
#[test]
fn test_index_query_request() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("name", "X")
        .unwrap()
        .with_range("postCode", Operator::Gt, "Y")
        .unwrap();

    let request = build(&criteria, &store);
    let query = request.as_query().expect("query request");
    assert_eq!(query.index_name.as_deref(), Some("Name-PostCode-index"));
    assert_eq!(query.table_name.as_deref(), Some("customers"));
    assert_eq!(query.key_condition_expression, "#kq_n0 = :kq_v0 AND #kq_n1 > :kq_v1");
    assert_eq!(query.select, Select::AllProjectedAttributes);
    assert!(query.scan_index_forward);
}

/// The store may override the table name of index queries.
#[test]
fn test_index_query_table_override() {
    let schema = customer_schema();
    let store = SpyStore::empty().with_table_override("prod-customers");
    let criteria = QueryCriteria::new(&schema).with_equality("name", "X").unwrap();

    let request = build(&criteria, &store);
    assert_eq!(
        request.as_query().and_then(|q| q.table_name.as_deref()),
        Some("prod-customers")
    );
}

/// A projection switches the select mode.
#[test]
fn test_projection_selects_specific_attributes() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("name", "X")
        .unwrap()
        .with_projection("id, name");

    let request = build(&criteria, &store);
    let query = request.as_query().expect("query request");
    assert_eq!(query.select, Select::SpecificAttributes);
    assert_eq!(query.projection_expression.as_deref(), Some("id, name"));
}

// =============================================================================
// Scan Requests
// =============================================================================

/// Scenario E renders the NE condition as a scan filter.
#[test]
fn test_scan_request() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_range("name", Operator::Ne, "X")
        .unwrap();

    let request = build(&criteria, &store);
    let scan = request.as_scan().expect("scan request");
    assert_eq!(scan.filter_expression.as_deref(), Some("#kq_n0 <> :kq_v0"));
    assert_eq!(scan.expression_attribute_names, names(&[("#kq_n0", "name")]));
    assert_eq!(scan.expression_attribute_values[":kq_v0"], AttributeValue::string("X"));
    assert_eq!(scan.select, Select::AllAttributes);
}

/// Every scan filter and the raw filter are AND-combined.
#[test]
fn test_scan_with_raw_filter() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_membership("city", ["Oslo", "Bergen"])
        .unwrap()
        .with_null_check("deletedAt", true)
        .unwrap()
        .with_filter_expression(
            FilterExpression::new("#age BETWEEN :lo AND :hi")
                .name("#age", "age")
                .value(":lo", 18)
                .value(":hi", 30),
        )
        .unwrap();

    let request = build(&criteria, &store);
    let scan = request.as_scan().expect("scan request");
    assert_eq!(
        scan.filter_expression.as_deref(),
        Some("#kq_n0 IN (:kq_v0, :kq_v1) AND attribute_not_exists(#kq_n1) AND (#age BETWEEN :lo AND :hi)")
    );
    assert_eq!(scan.expression_attribute_names.len(), 3);
    assert_eq!(scan.expression_attribute_values.len(), 4);
}

/// A raw filter referencing an unbound placeholder is rejected.
#[test]
fn test_unbound_filter_placeholder_rejected() {
    let schema = customer_schema();
    let err = QueryCriteria::new(&schema)
        .with_filter_expression(FilterExpression::new("#age > :min").name("#age", "age"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFilterExpression);
}

// =============================================================================
// Count Requests
// =============================================================================

/// Count requests select COUNT and drop limit and projection.
#[test]
fn test_count_request() {
    let schema = playlist_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("userName", "mike")
        .unwrap()
        .with_limit(5)
        .with_projection("playlistName");

    let count = criteria.build_count_query::<Playlist, _>(&store, true).unwrap();
    let query = count.request().as_query().expect("query request");
    assert_eq!(query.select, Select::Count);
    assert_eq!(query.limit, None);
    assert_eq!(query.projection_expression, None);
}

/// A paged count through a scan needs scan counting enabled.
#[test]
fn test_paged_scan_count_requires_opt_in() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_range("name", Operator::Ne, "X")
        .unwrap();

    let err = criteria
        .build_count_query::<Playlist, _>(&store, true)
        .err()
        .expect("paged scan count rejected");
    assert_eq!(err.code(), ErrorCode::UnsupportedOperation);

    // unpaged counts only need scans
    assert!(criteria.build_count_query::<Playlist, _>(&store, false).is_ok());

    let criteria = criteria.with_scan_policy(ScanPolicy::permissive());
    let count = criteria.build_count_query::<Playlist, _>(&store, true).unwrap();
    assert_eq!(count.request().as_scan().map(|s| s.select), Some(Select::Count));
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Building twice from the same criteria yields identical requests.
#[test]
fn test_build_idempotent() {
    let schema = customer_schema();
    let store = SpyStore::empty();
    let criteria = QueryCriteria::new(&schema)
        .with_equality("name", "X")
        .unwrap()
        .with_between("postCode", "A", "M")
        .unwrap()
        .with_filter_expression(FilterExpression::new("attribute_exists(#e)").name("#e", "email"))
        .unwrap();

    let first = build(&criteria, &store);
    let second = build(&criteria, &store);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    // building never calls the store
    assert_eq!(store.request_count(), 0);
}
