//! Explain output for a selection outcome
//!
//! Deterministic and human-readable: the same path renders the same text.

use std::fmt;

use crate::error::QueryError;

use super::path::AccessPath;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPlan {
    /// Whether a path was selected
    pub accepted: bool,
    pub path: Option<String>,
    pub index: Option<String>,
    /// Conditions served by the key
    pub key_conditions: Vec<String>,
    /// Conditions applied as filters
    pub filters: Vec<String>,
    pub sort: Option<String>,
    pub rejection_reason: Option<String>,
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a selected path
    pub fn from_path(path: &AccessPath) -> Self {
        let mut key_conditions = Vec::new();
        let mut filters = Vec::new();

        match path {
            AccessPath::DirectLoad {
                partition_value,
                sort_value,
            } => {
                key_conditions.push(format!("partition EQ {}", partition_value));
                if let Some(sort) = sort_value {
                    key_conditions.push(format!("sort EQ {}", sort));
                }
            }
            AccessPath::PrimaryQuery {
                partition_value,
                sort_condition,
                ..
            } => {
                key_conditions.push(format!("partition EQ {}", partition_value));
                key_conditions.extend(sort_condition.iter().map(ToString::to_string));
            }
            AccessPath::IndexQuery {
                partition_condition,
                sort_condition,
                ..
            } => {
                key_conditions.push(partition_condition.to_string());
                key_conditions.extend(sort_condition.iter().map(ToString::to_string));
            }
            AccessPath::Scan { filter_conditions } => {
                filters.extend(filter_conditions.iter().map(ToString::to_string));
            }
        }

        Self {
            accepted: true,
            path: Some(path.kind().as_str().to_string()),
            index: path.index_name().map(str::to_string),
            key_conditions,
            filters,
            sort: path
                .sort_directive()
                .map(|s| format!("{} {}", s.property, s.direction())),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a selection error
    pub fn from_error(err: &QueryError) -> Self {
        Self {
            accepted: false,
            path: None,
            index: None,
            key_conditions: Vec::new(),
            filters: Vec::new(),
            sort: None,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().as_str().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(path) = &self.path {
                writeln!(f, "Path: {}", path)?;
            }
            if let Some(index) = &self.index {
                writeln!(f, "Index: {}", index)?;
            }
            if !self.key_conditions.is_empty() {
                writeln!(f, "Key Conditions:")?;
                for condition in &self.key_conditions {
                    writeln!(f, "  - {}", condition)?;
                }
            }
            if !self.filters.is_empty() {
                writeln!(f, "Filters:")?;
                for filter in &self.filters {
                    writeln!(f, "  - {}", filter)?;
                }
            }
            if let Some(sort) = &self.sort {
                writeln!(f, "Sort: {}", sort)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
