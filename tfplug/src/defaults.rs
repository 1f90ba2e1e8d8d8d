//! Default value providers for attributes
//!
//! Defaults are applied during planning when an attribute is null in the
//! configuration, before plan modifiers run.

use crate::schema::{Default, DefaultRequest, DefaultResponse};
use crate::types::Dynamic;
use std::collections::HashMap;

/// StaticDefault provides a static default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn create(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn string(value: &str) -> Self {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Self {
        Self::create(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::create(Dynamic::Bool(value))
    }

    pub fn list(values: Vec<Dynamic>) -> Self {
        Self::create(Dynamic::List(values))
    }

    /// Works for both maps and single nested objects
    pub fn object(values: HashMap<String, Dynamic>) -> Self {
        Self::create(Dynamic::Map(values))
    }

    pub fn empty_map() -> Self {
        Self::object(HashMap::new())
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        DefaultResponse {
            value: self.value.clone(),
        }
    }
}
