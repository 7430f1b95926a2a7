//! Custom value converters
//!
//! Properties whose values need a non-standard encoding register a
//! converter by property name. A registered converter always wins over the
//! declared attribute type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::value::{AttributeValue, ClauseValue};

/// Encodes clause values for one property
pub trait AttributeConverter: Send + Sync {
    /// Converts a value, or explains why it cannot be converted
    fn convert(&self, value: &ClauseValue) -> Result<AttributeValue, String>;
}

impl<F> AttributeConverter for F
where
    F: Fn(&ClauseValue) -> Result<AttributeValue, String> + Send + Sync,
{
    fn convert(&self, value: &ClauseValue) -> Result<AttributeValue, String> {
        self(value)
    }
}

/// Converters keyed by property name
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_property: BTreeMap<String, Arc<dyn AttributeConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter, replacing any previous one for the property
    pub fn register(
        &mut self,
        property: impl Into<String>,
        converter: impl AttributeConverter + 'static,
    ) -> &mut Self {
        self.by_property.insert(property.into(), Arc::new(converter));
        self
    }

    pub fn get(&self, property: &str) -> Option<&dyn AttributeConverter> {
        self.by_property.get(property).map(|c| c.as_ref())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.by_property.contains_key(property)
    }

    pub fn is_empty(&self) -> bool {
        self.by_property.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_property.keys()).finish()
    }
}
