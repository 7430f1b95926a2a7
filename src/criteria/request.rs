//! Native request shapes handed to the store

use std::collections::BTreeMap;

use serde::Serialize;

use crate::condition::AttributeValue;

/// Attributes a query or scan returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    AllAttributes,
    AllProjectedAttributes,
    SpecificAttributes,
    Count,
}

/// Fetch by full primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadRequest {
    pub partition_value: AttributeValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_value: Option<AttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
}

/// Key-condition query on the table or one of its indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    /// Set only when the request addresses an index explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    pub key_condition_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    pub expression_attribute_names: BTreeMap<String, String>,
    pub expression_attribute_values: BTreeMap<String, AttributeValue>,
    pub scan_index_forward: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    pub select: Select,
}

/// Filtered full scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_names: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_values: BTreeMap<String, AttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    pub select: Select,
}

/// Any request the criteria can produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StoreRequest {
    Load(LoadRequest),
    Query(QueryRequest),
    Scan(ScanRequest),
}

impl StoreRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreRequest::Load(_) => "LOAD",
            StoreRequest::Query(_) => "QUERY",
            StoreRequest::Scan(_) => "SCAN",
        }
    }

    pub fn as_query(&self) -> Option<&QueryRequest> {
        match self {
            StoreRequest::Query(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_scan(&self) -> Option<&ScanRequest> {
        match self {
            StoreRequest::Scan(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_load(&self) -> Option<&LoadRequest> {
        match self {
            StoreRequest::Load(request) => Some(request),
            _ => None,
        }
    }
}
