//! Conversions between attribute values and controller fields

use std::collections::HashMap;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

/// The controller omits empty strings, so an empty value reads back as null
pub fn string_or_null(value: &str) -> Dynamic {
    if value.is_empty() {
        Dynamic::Null
    } else {
        Dynamic::String(value.to_string())
    }
}

pub fn number(value: Option<i64>) -> Dynamic {
    value
        .map(|n| Dynamic::Number(n as f64))
        .unwrap_or(Dynamic::Null)
}

pub fn string_list(value: Option<&Vec<String>>) -> Dynamic {
    value
        .map(|items| Dynamic::string_list(items.iter().cloned()))
        .unwrap_or(Dynamic::Null)
}

/// Read helpers over one object of a plan, state or config.
/// Null, unknown and mistyped values all read as `None`.
pub struct Fields<'a> {
    value: &'a DynamicValue,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn get(&self, name: &str) -> Dynamic {
        self.value
            .get_attribute(&AttributePath::new(name))
            .unwrap_or(Dynamic::Null)
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).as_str().map(str::to_string)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).as_bool()
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).as_number().map(|n| n as i64)
    }

    pub fn string_list(&self, name: &str) -> Option<Vec<String>> {
        match self.get(name) {
            Dynamic::List(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Nested object as its own value, when it is a known object
    pub fn object(&self, name: &str) -> Option<DynamicValue> {
        match self.get(name) {
            object @ Dynamic::Map(_) => Some(DynamicValue::new(object)),
            _ => None,
        }
    }

    pub fn map(&self, name: &str) -> Option<HashMap<String, Dynamic>> {
        match self.get(name) {
            Dynamic::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Builds an object value field by field
#[derive(Default)]
pub struct ObjectBuilder {
    fields: HashMap<String, Dynamic>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: Dynamic) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> Dynamic {
        Dynamic::Map(self.fields)
    }
}
